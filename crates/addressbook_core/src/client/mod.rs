//! Data service client used by the record store.
//!
//! # Responsibility
//! - Expose the four people procedures as typed calls.
//! - Be the only layer that crosses the transport boundary.
//!
//! # Invariants
//! - One call is exactly one request/response exchange: no retry, batching
//!   or caching happens here.

use crate::model::person::{Person, PersonId};
use crate::rpc::RpcError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod rpc_client;

pub use rpc_client::{LocalTransport, RpcPeopleClient, RpcTransport};

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of one data service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The remote procedure returned an error.
    Rpc(RpcError),
    /// The response did not match the expected wire shape.
    Decode { procedure: String, message: String },
}

impl ClientError {
    /// Stable error code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rpc(err) => err.code(),
            Self::Decode { .. } => "DECODE_ERROR",
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rpc(err) => write!(f, "{err}"),
            Self::Decode { procedure, message } => {
                write!(f, "malformed response from `{procedure}`: {message}")
            }
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rpc(err) => Some(err),
            Self::Decode { .. } => None,
        }
    }
}

impl From<RpcError> for ClientError {
    fn from(value: RpcError) -> Self {
        Self::Rpc(value)
    }
}

/// Typed CRUD calls against the people data service.
pub trait PeopleClient {
    /// Persists a new contact and returns the authoritative stored record.
    fn create(&self, person: &Person) -> ClientResult<Person>;
    /// Fetches every contact visible to the current session.
    fn get_all(&self) -> ClientResult<Vec<Person>>;
    /// Replaces a contact; returns affected rows (`0` on a silent no-op).
    fn update(&self, person: &Person) -> ClientResult<u64>;
    /// Deletes a contact; returns affected rows (`0` on a silent no-op).
    fn delete(&self, id: PersonId) -> ClientResult<u64>;
}

impl<T: PeopleClient + ?Sized> PeopleClient for &T {
    fn create(&self, person: &Person) -> ClientResult<Person> {
        (**self).create(person)
    }

    fn get_all(&self) -> ClientResult<Vec<Person>> {
        (**self).get_all()
    }

    fn update(&self, person: &Person) -> ClientResult<u64> {
        (**self).update(person)
    }

    fn delete(&self, id: PersonId) -> ClientResult<u64> {
        (**self).delete(id)
    }
}
