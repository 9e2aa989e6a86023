//! Record store implementation.

use crate::client::{ClientError, ClientResult, PeopleClient};
use crate::model::person::{Person, PersonId};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Plain address book state: ordered people plus selected ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    /// Display order equals insertion order.
    pub people: Vec<Person>,
    /// Lookup key into `people`, never an index.
    pub selected_person_id: Option<PersonId>,
    /// True while a `load` call is waiting on the data service.
    pub loading: bool,
}

impl AddressBook {
    /// Returns the index of the person with `id`, if present.
    pub fn position(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|person| person.id == id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.position(id).is_some()
    }

    /// Resolves the selection against the current collection.
    pub fn selected_person(&self) -> Option<&Person> {
        let id = self.selected_person_id?;
        self.people.iter().find(|person| person.id == id)
    }

    /// Sets or clears the selection, clearing it for IDs not in `people`.
    ///
    /// Returns whether the requested selection was applied as given.
    pub fn select(&mut self, id: Option<PersonId>) -> bool {
        let resolved = id.filter(|candidate| self.contains(*candidate));
        self.selected_person_id = resolved;
        resolved == id
    }

    /// Restores the store invariants on externally supplied state.
    ///
    /// Later duplicates of an ID are dropped and a dangling selection is
    /// cleared. A captured `loading` flag is reset.
    fn normalize(&mut self) {
        self.loading = false;
        let mut seen = HashSet::with_capacity(self.people.len());
        self.people.retain(|person| seen.insert(person.id));
        if let Some(id) = self.selected_person_id {
            if !self.contains(id) {
                self.selected_person_id = None;
            }
        }
    }
}

/// Notification delivered to subscribers after a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// `load` started; the store is loading until `Loaded` or `LoadFailed`.
    LoadStarted,
    Loaded { count: usize },
    LoadFailed,
    Added(PersonId),
    Removed(PersonId),
    Saved(PersonId),
    Selected(Option<PersonId>),
}

/// Handle returned by `RecordStore::subscribe`.
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StoreChange, &AddressBook) + Send>;

/// Observable people store synchronized through a `PeopleClient`.
pub struct RecordStore<C: PeopleClient> {
    client: C,
    book: AddressBook,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<C: PeopleClient> RecordStore<C> {
    /// Creates an empty, unselected store.
    pub fn new(client: C) -> Self {
        Self::with_book(client, AddressBook::default())
    }

    /// Creates a store seeded with previously captured state.
    pub fn with_book(client: C, mut book: AddressBook) -> Self {
        book.normalize();
        Self {
            client,
            book,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Consumes the store and returns its state.
    pub fn into_book(self) -> AddressBook {
        self.book
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn people(&self) -> &[Person] {
        &self.book.people
    }

    pub fn selected_person_id(&self) -> Option<PersonId> {
        self.book.selected_person_id
    }

    pub fn selected_person(&self) -> Option<&Person> {
        self.book.selected_person()
    }

    pub fn is_loading(&self) -> bool {
        self.book.loading
    }

    /// Registers a listener called after every state transition.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreChange, &AddressBook) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replaces the collection with the data service's full list.
    ///
    /// On failure the previous collection is kept and the error returned.
    pub fn load(&mut self) -> ClientResult<usize> {
        self.book.loading = true;
        self.notify(StoreChange::LoadStarted);

        let result = self.client.get_all();
        self.book.loading = false;

        match result {
            Ok(people) => {
                self.book.people = people;
                self.book.normalize();
                let count = self.book.people.len();
                info!("event=store_load module=store status=ok count={count}");
                self.notify(StoreChange::Loaded { count });
                Ok(count)
            }
            Err(err) => {
                self.notify(StoreChange::LoadFailed);
                Err(log_failure("store_load", err))
            }
        }
    }

    /// Creates an empty contact remotely, then appends and selects it.
    pub fn add_person(&mut self) -> ClientResult<PersonId> {
        let draft = Person::new();
        let created = self
            .client
            .create(&draft)
            .map_err(|err| log_failure("store_add", err))?;

        let id = created.id;
        match self.book.position(id) {
            Some(index) => self.book.people[index] = created,
            None => self.book.people.push(created),
        }
        self.book.selected_person_id = Some(id);

        info!("event=store_add module=store status=ok person_id={id}");
        self.notify(StoreChange::Added(id));
        Ok(id)
    }

    /// Deletes a contact remotely, then drops it locally.
    ///
    /// Selection is cleared even when `id` was not the selected contact.
    pub fn remove_person(&mut self, id: PersonId) -> ClientResult<()> {
        let count = self
            .client
            .delete(id)
            .map_err(|err| log_failure("store_remove", err))?;

        self.book.people.retain(|person| person.id != id);
        self.book.selected_person_id = None;

        info!("event=store_remove module=store status=ok person_id={id} remote_count={count}");
        self.notify(StoreChange::Removed(id));
        Ok(())
    }

    /// Updates a contact remotely, then replaces it in place and clears
    /// the selection.
    pub fn save_person(&mut self, person: Person) -> ClientResult<()> {
        let count = self
            .client
            .update(&person)
            .map_err(|err| log_failure("store_save", err))?;

        let id = person.id;
        if let Some(index) = self.book.position(id) {
            self.book.people[index] = person;
        }
        self.book.selected_person_id = None;

        info!("event=store_save module=store status=ok person_id={id} remote_count={count}");
        self.notify(StoreChange::Saved(id));
        Ok(())
    }

    /// Sets or clears the selection without any remote call.
    ///
    /// An ID that is not in the collection clears the selection. Returns
    /// whether the requested selection was applied as given.
    pub fn select_person(&mut self, id: Option<PersonId>) -> bool {
        let applied = self.book.select(id);
        let resolved = self.book.selected_person_id;
        debug!(
            "event=store_select module=store status=ok selected={}",
            resolved.is_some()
        );
        self.notify(StoreChange::Selected(resolved));
        applied
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change, &self.book);
        }
    }
}

fn log_failure(event: &'static str, err: ClientError) -> ClientError {
    warn!(
        "event={event} module=store status=error error_code={} error={err}",
        err.code()
    );
    err
}
