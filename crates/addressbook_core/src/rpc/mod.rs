//! JSON procedure surface of the people data service.
//!
//! # Responsibility
//! - Name the remote procedures and their wire input/output shapes.
//! - Map service failures onto stable procedure error codes.
//!
//! # Invariants
//! - Every procedure requires an authenticated session.
//! - Wire shapes are shared by the router and the client so both sides
//!   agree on field names (`person`, `personId`, `count`).

use crate::model::person::{NewPerson, Person, PersonId};
use crate::service::people_service::ServiceError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod people_router;

pub use people_router::PeopleRouter;

pub const PEOPLE_CREATE: &str = "people.create";
pub const PEOPLE_GET_ALL: &str = "people.getAll";
pub const PEOPLE_UPDATE: &str = "people.update";
pub const PEOPLE_DELETE: &str = "people.delete";

/// Input of `people.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePersonInput {
    pub person: NewPerson,
}

/// Input of `people.update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePersonInput {
    pub person: Person,
}

/// Input of `people.delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePersonInput {
    pub person_id: PersonId,
}

/// Output of bulk write procedures: number of affected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayload {
    pub count: u64,
}

pub type RpcResult<T> = Result<T, RpcError>;

/// Procedure-level error returned across the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// No session was supplied to a protected procedure.
    Unauthorized,
    /// The caller does not own the targeted record.
    Forbidden(PersonId),
    /// Input failed wire-shape validation.
    BadInput { procedure: String, message: String },
    /// No procedure is registered under this name.
    UnknownProcedure(String),
    /// Storage or serialization failure inside the service.
    Internal(String),
}

impl RpcError {
    /// Stable error code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadInput { .. } => "BAD_REQUEST",
            Self::UnknownProcedure(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl Display for RpcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "not authenticated"),
            Self::Forbidden(id) => write!(f, "person {id} is not owned by the current user"),
            Self::BadInput { procedure, message } => {
                write!(f, "invalid input for `{procedure}`: {message}")
            }
            Self::UnknownProcedure(name) => write!(f, "no procedure named `{name}`"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for RpcError {}

impl From<ServiceError> for RpcError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Forbidden(id) => Self::Forbidden(id),
            other => Self::Internal(other.to_string()),
        }
    }
}
