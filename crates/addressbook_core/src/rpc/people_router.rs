//! In-process dispatcher for the `people.*` procedures.
//!
//! # Responsibility
//! - Validate JSON input against the wire shapes.
//! - Reject calls without a session before touching storage.
//! - Delegate to `PeopleService` and encode its result.

use super::{
    BatchPayload, CreatePersonInput, DeletePersonInput, RpcError, RpcResult, UpdatePersonInput,
    PEOPLE_CREATE, PEOPLE_DELETE, PEOPLE_GET_ALL, PEOPLE_UPDATE,
};
use crate::model::user::Session;
use crate::repo::person_repo::PersonRepository;
use crate::service::people_service::PeopleService;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

const PROCEDURES: &[&str] = &[PEOPLE_CREATE, PEOPLE_GET_ALL, PEOPLE_UPDATE, PEOPLE_DELETE];

/// Router exposing `PeopleService` as named JSON procedures.
pub struct PeopleRouter<R: PersonRepository> {
    service: PeopleService<R>,
}

impl<R: PersonRepository> PeopleRouter<R> {
    pub fn new(service: PeopleService<R>) -> Self {
        Self { service }
    }

    /// Names of every registered procedure.
    pub fn procedures() -> &'static [&'static str] {
        PROCEDURES
    }

    /// Executes one procedure call.
    ///
    /// # Errors
    /// - `UnknownProcedure` when `procedure` is not registered.
    /// - `Unauthorized` when `session` is `None`.
    /// - `BadInput` when `input` does not match the procedure's wire shape.
    pub fn call(
        &self,
        session: Option<&Session>,
        procedure: &str,
        input: Value,
    ) -> RpcResult<Value> {
        let started_at = Instant::now();
        let result = self.dispatch(session, procedure, input);
        match &result {
            Ok(_) => info!(
                "event=rpc_call module=rpc status=ok procedure={procedure} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=rpc_call module=rpc status=error procedure={procedure} duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }

    fn dispatch(
        &self,
        session: Option<&Session>,
        procedure: &str,
        input: Value,
    ) -> RpcResult<Value> {
        if !PROCEDURES.contains(&procedure) {
            return Err(RpcError::UnknownProcedure(procedure.to_string()));
        }
        let session = session.ok_or(RpcError::Unauthorized)?;

        match procedure {
            PEOPLE_CREATE => {
                let input: CreatePersonInput = parse_input(procedure, input)?;
                encode(&self.service.create(session, input.person)?)
            }
            PEOPLE_GET_ALL => encode(&self.service.get_all(session)?),
            PEOPLE_UPDATE => {
                let input: UpdatePersonInput = parse_input(procedure, input)?;
                let count = self.service.update(session, &input.person)?;
                encode(&batch(count))
            }
            PEOPLE_DELETE => {
                let input: DeletePersonInput = parse_input(procedure, input)?;
                let count = self.service.delete(session, input.person_id)?;
                encode(&batch(count))
            }
            other => Err(RpcError::UnknownProcedure(other.to_string())),
        }
    }
}

fn parse_input<T: DeserializeOwned>(procedure: &str, input: Value) -> RpcResult<T> {
    serde_json::from_value(input).map_err(|err| RpcError::BadInput {
        procedure: procedure.to_string(),
        message: err.to_string(),
    })
}

fn encode<T: Serialize>(value: &T) -> RpcResult<Value> {
    serde_json::to_value(value).map_err(|err| RpcError::Internal(err.to_string()))
}

fn batch(count: usize) -> BatchPayload {
    BatchPayload {
        count: count as u64,
    }
}
