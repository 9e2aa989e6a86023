//! Core logic for the address book.
//!
//! Layers, from storage up:
//! `db` → `repo` → `service` → `rpc` (server side) and
//! `client` → `store` (client side).

pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rpc;
pub mod service;
pub mod store;

pub use client::{
    ClientError, ClientResult, LocalTransport, PeopleClient, RpcPeopleClient, RpcTransport,
};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{NewPerson, Person, PersonId};
pub use model::user::{Session, User, UserId};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use rpc::{PeopleRouter, RpcError, RpcResult};
pub use service::people_service::{OwnershipPolicy, PeopleService, ServiceError};
pub use store::{AddressBook, RecordStore, StoreChange, SubscriptionId};

/// Minimal health-check API for front-end wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
