//! Owner-scoped person repository and its SQLite implementation.
//!
//! # Invariants
//! - `list_people` returns rows in insertion order.
//! - `update_person`/`delete_person` only touch rows owned by `owner`; a
//!   foreign or missing ID affects zero rows and is not an error here.

use crate::model::person::{Person, PersonId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    address,
    notes
FROM people";

/// Repository interface for contact CRUD scoped to one owner.
pub trait PersonRepository {
    fn insert_person(&self, owner: &str, person: &Person) -> RepoResult<PersonId>;
    fn list_people(&self, owner: &str) -> RepoResult<Vec<Person>>;
    fn get_person(&self, owner: &str, id: PersonId) -> RepoResult<Option<Person>>;
    fn update_person(&self, owner: &str, person: &Person) -> RepoResult<usize>;
    fn delete_person(&self, owner: &str, id: PersonId) -> RepoResult<usize>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, owner: &str, person: &Person) -> RepoResult<PersonId> {
        self.conn.execute(
            "INSERT INTO people (
                id,
                user_id,
                name,
                email,
                phone,
                address,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                person.id.to_string(),
                owner,
                person.name.as_str(),
                person.email.as_str(),
                person.phone.as_str(),
                person.address.as_str(),
                person.notes.as_str(),
            ],
        )?;

        Ok(person.id)
    }

    fn list_people(&self, owner: &str) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([owner])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn get_person(&self, owner: &str, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE id = ?1 AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn update_person(&self, owner: &str, person: &Person) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE people
             SET
                name = ?1,
                email = ?2,
                phone = ?3,
                address = ?4,
                notes = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6 AND user_id = ?7;",
            params![
                person.name.as_str(),
                person.email.as_str(),
                person.phone.as_str(),
                person.address.as_str(),
                person.notes.as_str(),
                person.id.to_string(),
                owner,
            ],
        )?;

        Ok(changed)
    }

    fn delete_person(&self, owner: &str, id: PersonId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM people WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner],
        )?;

        Ok(changed)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in people.id"))
    })?;

    Ok(Person {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        notes: row.get("notes")?,
    })
}
