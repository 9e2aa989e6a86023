use addressbook_core::db::open_db_in_memory;
use addressbook_core::{
    AddressBook, ClientError, ClientResult, LocalTransport, PeopleClient, PeopleRouter,
    PeopleService, Person, PersonId, RecordStore, RpcError, RpcPeopleClient, Session,
    SqlitePersonRepository, SqliteUserRepository, StoreChange, User, UserRepository,
};
use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory data service double with switchable failures.
#[derive(Default)]
struct FakeClient {
    remote: RefCell<Vec<Person>>,
    fail_next: Cell<bool>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeClient {
    fn seeded(people: Vec<Person>) -> Self {
        Self {
            remote: RefCell::new(people),
            ..Self::default()
        }
    }

    fn fail_next_call(&self) {
        self.fail_next.set(true);
    }

    fn begin(&self, name: &'static str) -> ClientResult<()> {
        self.calls.borrow_mut().push(name);
        if self.fail_next.replace(false) {
            return Err(ClientError::Rpc(RpcError::Internal(
                "connection reset".to_string(),
            )));
        }
        Ok(())
    }
}

impl PeopleClient for FakeClient {
    fn create(&self, person: &Person) -> ClientResult<Person> {
        self.begin("create")?;
        self.remote.borrow_mut().push(person.clone());
        Ok(person.clone())
    }

    fn get_all(&self) -> ClientResult<Vec<Person>> {
        self.begin("get_all")?;
        Ok(self.remote.borrow().clone())
    }

    fn update(&self, person: &Person) -> ClientResult<u64> {
        self.begin("update")?;
        let mut remote = self.remote.borrow_mut();
        match remote.iter_mut().find(|existing| existing.id == person.id) {
            Some(existing) => {
                *existing = person.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete(&self, id: PersonId) -> ClientResult<u64> {
        self.begin("delete")?;
        let mut remote = self.remote.borrow_mut();
        let before = remote.len();
        remote.retain(|person| person.id != id);
        Ok((before - remote.len()) as u64)
    }
}

fn named(name: &str) -> Person {
    let mut person = Person::new();
    person.name = name.to_string();
    person
}

fn assert_selection_invariant<C: PeopleClient>(store: &RecordStore<C>) {
    if let Some(id) = store.selected_person_id() {
        assert!(
            store.people().iter().any(|person| person.id == id),
            "selection {id} does not resolve"
        );
    }
}

#[test]
fn add_save_remove_scenario() {
    let client = FakeClient::default();
    let mut store = RecordStore::new(&client);

    let id = store.add_person().unwrap();
    assert_eq!(store.people(), &[Person::empty(id)]);
    assert_eq!(store.selected_person_id(), Some(id));

    let mut ann = Person::empty(id);
    ann.name = "Ann".to_string();
    store.save_person(ann.clone()).unwrap();
    assert_eq!(store.people(), &[ann]);
    assert_eq!(store.selected_person_id(), None);

    store.remove_person(id).unwrap();
    assert!(store.people().is_empty());
    assert_eq!(store.selected_person_id(), None);
    assert_eq!(*client.calls.borrow(), vec!["create", "update", "delete"]);
}

#[test]
fn each_add_grows_collection_by_one_and_selects_new_record() {
    let client = FakeClient::default();
    let mut store = RecordStore::new(&client);

    for expected_len in 1..=5 {
        let id = store.add_person().unwrap();
        assert_eq!(store.people().len(), expected_len);
        assert_eq!(store.people().last().map(|person| person.id), Some(id));
        assert_eq!(store.selected_person().map(|person| person.id), Some(id));
    }
    assert_eq!(client.remote.borrow().len(), 5);
}

#[test]
fn remove_unknown_id_keeps_collection_and_clears_selection() {
    let people = vec![named("Ann"), named("Bea")];
    let client = FakeClient::seeded(people.clone());
    let mut store = RecordStore::new(&client);
    store.load().unwrap();
    assert!(store.select_person(Some(people[1].id)));

    store.remove_person(Uuid::new_v4()).unwrap();
    assert_eq!(store.people(), people.as_slice());
    assert_eq!(store.selected_person_id(), None);
}

#[test]
fn remove_other_person_still_clears_selection() {
    let people = vec![named("Ann"), named("Bea")];
    let client = FakeClient::seeded(people.clone());
    let mut store = RecordStore::new(&client);
    store.load().unwrap();
    store.select_person(Some(people[0].id));

    store.remove_person(people[1].id).unwrap();
    assert_eq!(store.people(), &people[..1]);
    assert_eq!(store.selected_person_id(), None);
}

#[test]
fn save_replaces_only_matching_person_and_keeps_order() {
    let people = vec![named("Ann"), named("Bea"), named("Cal")];
    let client = FakeClient::seeded(people.clone());
    let mut store = RecordStore::new(&client);
    store.load().unwrap();
    store.select_person(Some(people[1].id));

    let mut bea = people[1].clone();
    bea.phone = "555-0101".to_string();
    store.save_person(bea.clone()).unwrap();

    assert_eq!(store.people(), &[people[0].clone(), bea, people[2].clone()]);
    assert_eq!(store.selected_person_id(), None);
}

#[test]
fn save_of_unknown_person_leaves_collection_unchanged() {
    let people = vec![named("Ann")];
    let client = FakeClient::seeded(people.clone());
    let mut store = RecordStore::new(&client);
    store.load().unwrap();

    store.save_person(named("Stranger")).unwrap();
    assert_eq!(store.people(), people.as_slice());
}

#[test]
fn load_reproduces_remote_collection_in_order() {
    let people: Vec<Person> = (0..7).map(|index| named(&format!("P{index}"))).collect();
    let client = FakeClient::seeded(people.clone());
    let mut store = RecordStore::new(&client);

    assert_eq!(store.load().unwrap(), 7);
    assert_eq!(store.people(), people.as_slice());
    assert!(!store.is_loading());
}

#[test]
fn load_clears_selection_that_no_longer_resolves() {
    let kept = named("Kept");
    let gone = named("Gone");
    let client = FakeClient::seeded(vec![kept.clone()]);
    let book = AddressBook {
        people: vec![kept.clone(), gone.clone()],
        selected_person_id: Some(gone.id),
        loading: false,
    };
    let mut store = RecordStore::with_book(&client, book);
    assert_eq!(store.selected_person_id(), Some(gone.id));

    store.load().unwrap();
    assert_eq!(store.people(), &[kept]);
    assert_eq!(store.selected_person_id(), None);
}

#[test]
fn select_person_rejects_ids_outside_collection() {
    let ann = named("Ann");
    let client = FakeClient::seeded(vec![ann.clone()]);
    let mut store = RecordStore::new(&client);
    store.load().unwrap();

    assert!(store.select_person(Some(ann.id)));
    assert_eq!(store.selected_person(), Some(&ann));

    assert!(!store.select_person(Some(Uuid::new_v4())));
    assert_eq!(store.selected_person_id(), None);

    store.select_person(Some(ann.id));
    assert!(store.select_person(None));
    assert_eq!(store.selected_person_id(), None);
    assert!(client.calls.borrow().iter().all(|call| *call == "get_all"));
}

#[test]
fn failed_calls_leave_local_state_untouched() {
    let ann = named("Ann");
    let client = FakeClient::seeded(vec![ann.clone()]);
    let mut store = RecordStore::new(&client);
    store.load().unwrap();
    store.select_person(Some(ann.id));
    let before = store.book().clone();

    client.fail_next_call();
    assert!(store.add_person().is_err());
    client.fail_next_call();
    assert!(store.remove_person(ann.id).is_err());
    client.fail_next_call();
    let mut edited = ann.clone();
    edited.name = "Changed".to_string();
    assert!(store.save_person(edited).is_err());
    client.fail_next_call();
    assert!(store.load().is_err());

    assert_eq!(store.book(), &before);
    assert!(!store.is_loading());
}

#[test]
fn subscribers_observe_every_transition_until_unsubscribed() {
    let client = FakeClient::default();
    let mut store = RecordStore::new(&client);
    let seen: Arc<Mutex<Vec<(StoreChange, usize)>>> = Arc::default();

    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |change, book| {
        sink.lock().unwrap().push((*change, book.people.len()));
    });

    store.load().unwrap();
    let id = store.add_person().unwrap();
    store.select_person(None);
    client.fail_next_call();
    assert!(store.load().is_err());

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.remove_person(id).unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (StoreChange::LoadStarted, 0),
            (StoreChange::Loaded { count: 0 }, 0),
            (StoreChange::Added(id), 1),
            (StoreChange::Selected(None), 1),
            (StoreChange::LoadStarted, 1),
            (StoreChange::LoadFailed, 1),
        ]
    );
}

#[test]
fn subscribers_see_loading_flag_while_load_is_pending() {
    let client = FakeClient::seeded(vec![named("Ann")]);
    let mut store = RecordStore::new(&client);
    let seen: Arc<Mutex<Vec<(StoreChange, bool)>>> = Arc::default();

    let sink = Arc::clone(&seen);
    store.subscribe(move |change, book| {
        sink.lock().unwrap().push((*change, book.loading));
    });

    store.load().unwrap();
    client.fail_next_call();
    assert!(store.load().is_err());
    store.add_person().unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen[0], (StoreChange::LoadStarted, true));
    assert_eq!(seen[1], (StoreChange::Loaded { count: 1 }, false));
    assert_eq!(seen[2], (StoreChange::LoadStarted, true));
    assert_eq!(seen[3], (StoreChange::LoadFailed, false));
    assert!(seen[4..].iter().all(|(_, loading)| !loading));
    assert!(!store.is_loading());
}

#[test]
fn restored_book_never_starts_in_loading_state() {
    let client = FakeClient::default();
    let book = AddressBook {
        people: vec![named("Ann")],
        selected_person_id: None,
        loading: true,
    };
    let store = RecordStore::with_book(&client, book);
    assert!(!store.is_loading());
    assert!(!store.book().loading);
}

#[test]
fn selection_invariant_holds_across_mixed_operations() {
    let client = FakeClient::default();
    let mut store = RecordStore::new(&client);

    let mut ids = Vec::new();
    for step in 0..30usize {
        match step % 6 {
            0 | 1 => ids.push(store.add_person().unwrap()),
            2 => {
                store.select_person(ids.get(step % ids.len().max(1)).copied());
            }
            3 => {
                if let Some(id) = ids.first().copied() {
                    let mut person = Person::empty(id);
                    person.notes = format!("step {step}");
                    store.save_person(person).unwrap();
                }
            }
            4 => {
                store.select_person(ids.last().copied());
                if let Some(id) = ids.pop() {
                    store.remove_person(id).unwrap();
                }
            }
            _ => {
                store.load().unwrap();
            }
        }
        assert_selection_invariant(&store);
        assert_eq!(store.people(), client.remote.borrow().as_slice());
    }
}

#[test]
fn store_syncs_with_sqlite_backed_router() {
    let conn = open_db_in_memory().unwrap();
    SqliteUserRepository::new(&conn)
        .ensure_user(&User::with_id("alice"))
        .unwrap();
    let router = PeopleRouter::new(PeopleService::new(SqlitePersonRepository::new(&conn)));
    let client = RpcPeopleClient::new(LocalTransport::new(&router, Some(Session::new("alice"))));

    let mut store = RecordStore::new(&client);
    let id = store.add_person().unwrap();
    let mut ann = store.selected_person().cloned().unwrap();
    ann.name = "Ann".to_string();
    store.save_person(ann.clone()).unwrap();

    let mut fresh = RecordStore::new(&client);
    fresh.load().unwrap();
    assert_eq!(fresh.people(), &[ann]);

    fresh.remove_person(id).unwrap();
    store.load().unwrap();
    assert!(store.people().is_empty());
}
