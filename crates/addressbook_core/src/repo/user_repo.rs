//! Owner rows referenced by `people.user_id`.

use crate::model::user::{User, UserId};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for owning users.
pub trait UserRepository {
    /// Inserts the user when missing; existing rows are left untouched.
    ///
    /// Returns `true` when a new row was created.
    fn ensure_user(&self, user: &User) -> RepoResult<bool>;
    fn get_user(&self, id: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn ensure_user(&self, user: &User) -> RepoResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, name, email) VALUES (?1, ?2, ?3);",
            params![user.id.as_str(), user.name.as_deref(), user.email.as_deref()],
        )?;
        Ok(inserted > 0)
    }

    fn get_user(&self, id: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1;",
                [id],
                |row| {
                    Ok(User {
                        id: row.get::<_, UserId>("id")?,
                        name: row.get("name")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}
