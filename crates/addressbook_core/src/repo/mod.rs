//! Repository layer for people and their owners.
//!
//! # Responsibility
//! - Define owner-scoped data access contracts for contact records.
//! - Keep SQL details out of the service and procedure layers.
//!
//! # Invariants
//! - Every people query filters by owning user; no API reads or writes a
//!   row across owners.
//! - Update/delete report affected row counts instead of raising not-found.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod person_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by person and user persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
