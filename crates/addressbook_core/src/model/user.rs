//! Owner identity and authenticated session.
//!
//! Authentication itself happens outside core; callers hand in a `Session`
//! that names the owning user.

use serde::{Deserialize, Serialize};

/// Opaque owner ID issued by the external auth provider.
pub type UserId = String;

/// Owning user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Creates a user with only an ID set.
    pub fn with_id(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }
}

/// Authenticated request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
