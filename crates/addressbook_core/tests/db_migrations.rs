use addressbook_core::db::migrations::latest_version;
use addressbook_core::db::{open_db, open_db_in_memory, DbError};
use addressbook_core::{
    Person, PersonRepository, SqlitePersonRepository, SqliteUserRepository, User, UserRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "people");
}

#[test]
fn reopening_database_keeps_stored_people() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addressbook.db");

    let mut ann = Person::new();
    ann.name = "Ann".to_string();
    ann.phone = "555-0100".to_string();
    {
        let conn = open_db(&path).unwrap();
        SqliteUserRepository::new(&conn)
            .ensure_user(&User::with_id("owner"))
            .unwrap();
        SqlitePersonRepository::new(&conn)
            .insert_person("owner", &ann)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let people = SqlitePersonRepository::new(&conn)
        .list_people("owner")
        .unwrap();
    assert_eq!(people, vec![ann]);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn people_rows_require_existing_owner() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO people (id, user_id) VALUES ('00000000-0000-4000-8000-000000000001', 'ghost');",
        [],
    );
    assert!(result.is_err(), "foreign keys must be enforced");
}

#[test]
fn deleting_user_cascades_to_people() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO users (id) VALUES ('owner');", [])
        .unwrap();
    conn.execute(
        "INSERT INTO people (id, user_id) VALUES ('00000000-0000-4000-8000-000000000002', 'owner');",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM users WHERE id = 'owner';", [])
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
