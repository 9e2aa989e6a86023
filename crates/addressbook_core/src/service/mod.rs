//! Server-side people use-cases.
//!
//! # Responsibility
//! - Implement the create/list/update/delete procedures over repositories.
//! - Own the policy for writes that match no row of the caller.
//!
//! # See also
//! - `crate::rpc` for the wire-level dispatch in front of this layer.

pub mod people_service;
