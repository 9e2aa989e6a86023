//! Address book domain model.
//!
//! # Responsibility
//! - Define the contact record shared by store, client and service layers.
//! - Define the owner/session identity used for per-user scoping.
//!
//! # Invariants
//! - Every person is identified by a stable `PersonId` generated at creation.
//! - A persisted person belongs to exactly one owning user.

pub mod person;
pub mod user;
