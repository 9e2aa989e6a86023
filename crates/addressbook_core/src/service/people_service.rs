//! People use-case service.
//!
//! # Responsibility
//! - Scope every procedure to the session's owning user.
//! - Apply `OwnershipPolicy` to zero-row updates and deletes.
//!
//! # Invariants
//! - The service never reads or writes a row owned by another user.
//! - Under `OwnershipPolicy::SilentNoop`, a foreign or missing target is
//!   reported as `0` affected rows, never as an error.

use crate::model::person::{NewPerson, Person, PersonId};
use crate::model::user::Session;
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Handling of update/delete calls that match no row owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Zero affected rows is a successful no-op.
    ///
    /// Known defect kept for client compatibility: a caller cannot tell a
    /// foreign record from a missing one, and neither is reported.
    #[default]
    SilentNoop,
    /// Zero affected rows is rejected with `ServiceError::Forbidden`.
    Reject,
}

impl OwnershipPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SilentNoop => "silent_noop",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for OwnershipPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "silent_noop" | "noop" => Ok(Self::SilentNoop),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unsupported ownership policy `{other}`; expected silent_noop|reject"
            )),
        }
    }
}

/// Service error for people use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target is missing or owned by someone else (`Reject` policy only).
    Forbidden(PersonId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden(id) => write!(f, "person {id} is not owned by the current user"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent people state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// People service facade over a person repository.
pub struct PeopleService<R: PersonRepository> {
    repo: R,
    policy: OwnershipPolicy,
}

impl<R: PersonRepository> PeopleService<R> {
    /// Creates a service with the default `SilentNoop` policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, OwnershipPolicy::default())
    }

    pub fn with_policy(repo: R, policy: OwnershipPolicy) -> Self {
        Self { repo, policy }
    }

    /// Persists a new contact for the session owner and returns the stored row.
    pub fn create(&self, session: &Session, person: NewPerson) -> ServiceResult<Person> {
        let person = person.into_person();
        let id = self.repo.insert_person(&session.user_id, &person)?;
        info!("event=person_create module=service status=ok person_id={id}");
        self.repo
            .get_person(&session.user_id, id)?
            .ok_or(ServiceError::InconsistentState(
                "created person not found in read-back",
            ))
    }

    /// Lists every contact owned by the session user in insertion order.
    pub fn get_all(&self, session: &Session) -> ServiceResult<Vec<Person>> {
        let people = self.repo.list_people(&session.user_id)?;
        info!(
            "event=person_list module=service status=ok count={}",
            people.len()
        );
        Ok(people)
    }

    /// Replaces all attributes of an owned contact.
    ///
    /// Returns the number of affected rows (`0` or `1`).
    pub fn update(&self, session: &Session, person: &Person) -> ServiceResult<usize> {
        let changed = self.repo.update_person(&session.user_id, person)?;
        self.check_ownership("person_update", person.id, changed)
    }

    /// Deletes an owned contact.
    ///
    /// Returns the number of affected rows (`0` or `1`).
    pub fn delete(&self, session: &Session, id: PersonId) -> ServiceResult<usize> {
        let changed = self.repo.delete_person(&session.user_id, id)?;
        self.check_ownership("person_delete", id, changed)
    }

    fn check_ownership(
        &self,
        event: &'static str,
        id: PersonId,
        changed: usize,
    ) -> ServiceResult<usize> {
        if changed > 0 {
            info!("event={event} module=service status=ok person_id={id} count={changed}");
            return Ok(changed);
        }

        match self.policy {
            OwnershipPolicy::SilentNoop => {
                warn!(
                    "event={event} module=service status=noop person_id={id} count=0 policy=silent_noop"
                );
                Ok(0)
            }
            OwnershipPolicy::Reject => {
                warn!(
                    "event={event} module=service status=error person_id={id} error_code=forbidden policy=reject"
                );
                Err(ServiceError::Forbidden(id))
            }
        }
    }
}
