//! JSON procedure client and its transports.

use super::{ClientError, ClientResult, PeopleClient};
use crate::model::person::{NewPerson, Person, PersonId};
use crate::model::user::Session;
use crate::repo::person_repo::PersonRepository;
use crate::rpc::{
    BatchPayload, CreatePersonInput, DeletePersonInput, PeopleRouter, RpcResult,
    UpdatePersonInput, PEOPLE_CREATE, PEOPLE_DELETE, PEOPLE_GET_ALL, PEOPLE_UPDATE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Carries one JSON procedure call to the data service.
pub trait RpcTransport {
    fn call(&self, procedure: &str, input: Value) -> RpcResult<Value>;
}

/// Transport that invokes a router in the same process.
///
/// The session stands in for the cookie an HTTP transport would carry.
pub struct LocalTransport<'r, R: PersonRepository> {
    router: &'r PeopleRouter<R>,
    session: Option<Session>,
}

impl<'r, R: PersonRepository> LocalTransport<'r, R> {
    pub fn new(router: &'r PeopleRouter<R>, session: Option<Session>) -> Self {
        Self { router, session }
    }
}

impl<R: PersonRepository> RpcTransport for LocalTransport<'_, R> {
    fn call(&self, procedure: &str, input: Value) -> RpcResult<Value> {
        self.router.call(self.session.as_ref(), procedure, input)
    }
}

/// `PeopleClient` speaking the JSON wire format over any transport.
pub struct RpcPeopleClient<T: RpcTransport> {
    transport: T,
}

impl<T: RpcTransport> RpcPeopleClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn invoke<I: Serialize, O: DeserializeOwned>(
        &self,
        procedure: &str,
        input: Option<&I>,
    ) -> ClientResult<O> {
        let input = match input {
            Some(value) => {
                serde_json::to_value(value).map_err(|err| decode_error(procedure, err))?
            }
            None => Value::Null,
        };
        let output = self.transport.call(procedure, input)?;
        serde_json::from_value(output).map_err(|err| decode_error(procedure, err))
    }
}

impl<T: RpcTransport> PeopleClient for RpcPeopleClient<T> {
    fn create(&self, person: &Person) -> ClientResult<Person> {
        let input = CreatePersonInput {
            person: NewPerson::from(person.clone()),
        };
        self.invoke(PEOPLE_CREATE, Some(&input))
    }

    fn get_all(&self) -> ClientResult<Vec<Person>> {
        self.invoke::<(), _>(PEOPLE_GET_ALL, None)
    }

    fn update(&self, person: &Person) -> ClientResult<u64> {
        let input = UpdatePersonInput {
            person: person.clone(),
        };
        let payload: BatchPayload = self.invoke(PEOPLE_UPDATE, Some(&input))?;
        Ok(payload.count)
    }

    fn delete(&self, id: PersonId) -> ClientResult<u64> {
        let input = DeletePersonInput { person_id: id };
        let payload: BatchPayload = self.invoke(PEOPLE_DELETE, Some(&input))?;
        Ok(payload.count)
    }
}

fn decode_error(procedure: &str, err: serde_json::Error) -> ClientError {
    ClientError::Decode {
        procedure: procedure.to_string(),
        message: err.to_string(),
    }
}
