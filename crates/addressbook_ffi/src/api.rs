//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the record store operations to Dart via FRB.
//! - Keep the store state alive between calls; storage is reopened per
//!   remote call, while selection and snapshots never touch it.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized on one process-wide address book state.
//! - IDs cross the boundary as hyphenated UUID strings.

use addressbook_core::db::open_db;
use addressbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddressBook, AppConfig, ClientResult, LocalTransport, PeopleClient, PeopleRouter,
    PeopleService, Person, RecordStore, RpcPeopleClient, Session, SqlitePersonRepository,
    SqliteUserRepository, User, UserRepository,
};
use log::warn;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

static CONFIG: OnceLock<Result<AppConfig, String>> = OnceLock::new();
static BOOK_STATE: OnceLock<Mutex<AddressBook>> = OnceLock::new();

type FfiStore<'c> = RecordStore<&'c dyn PeopleClient>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
/// Safe to call repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Contact record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl From<&Person> for PersonItem {
    fn from(value: &Person) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            email: value.email.clone(),
            phone: value.phone.clone(),
            address: value.address.clone(),
            notes: value.notes.clone(),
        }
    }
}

impl PersonItem {
    fn into_person(self) -> Result<Person, String> {
        Ok(Person {
            id: parse_person_id(&self.id)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
        })
    }
}

/// Full store state for rendering the list and the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleSnapshot {
    pub ok: bool,
    /// Display order.
    pub items: Vec<PersonItem>,
    pub selected_id: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Result of one store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleActionResponse {
    pub ok: bool,
    /// Affected contact ID, when the operation targets one.
    pub person_id: Option<String>,
    pub message: String,
}

impl PeopleActionResponse {
    fn success(message: impl Into<String>, person_id: Option<String>) -> Self {
        Self {
            ok: true,
            person_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            person_id: None,
            message: message.into(),
        }
    }
}

/// Reloads the collection from storage and returns the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn people_load() -> PeopleSnapshot {
    match with_store(|store| store.load().map(|_| snapshot_of(store.book(), "Loaded."))) {
        Ok(snapshot) => snapshot,
        Err(err) => failed_snapshot(format!("people_load failed: {err}")),
    }
}

/// Returns the current in-memory state without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn people_snapshot() -> PeopleSnapshot {
    match book_state().lock() {
        Ok(book) => snapshot_of(&book, "Snapshot."),
        Err(_) => failed_snapshot("people_snapshot failed: state lock poisoned"),
    }
}

/// Creates an empty contact and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn people_add() -> PeopleActionResponse {
    match with_store(|store| store.add_person()) {
        Ok(id) => PeopleActionResponse::success("Contact added.", Some(id.to_string())),
        Err(err) => PeopleActionResponse::failure(format!("people_add failed: {err}")),
    }
}

/// Saves all fields of a contact and clears the selection.
#[flutter_rust_bridge::frb(sync)]
pub fn people_save(person: PersonItem) -> PeopleActionResponse {
    let person = match person.into_person() {
        Ok(person) => person,
        Err(err) => return PeopleActionResponse::failure(format!("people_save failed: {err}")),
    };
    let id = person.id;
    match with_store(|store| store.save_person(person)) {
        Ok(()) => PeopleActionResponse::success("Contact saved.", Some(id.to_string())),
        Err(err) => PeopleActionResponse::failure(format!("people_save failed: {err}")),
    }
}

/// Deletes a contact and clears the selection.
#[flutter_rust_bridge::frb(sync)]
pub fn people_remove(person_id: String) -> PeopleActionResponse {
    let id = match parse_person_id(&person_id) {
        Ok(id) => id,
        Err(err) => return PeopleActionResponse::failure(format!("people_remove failed: {err}")),
    };
    match with_store(|store| store.remove_person(id)) {
        Ok(()) => PeopleActionResponse::success("Contact removed.", Some(id.to_string())),
        Err(err) => PeopleActionResponse::failure(format!("people_remove failed: {err}")),
    }
}

/// Selects a contact by ID, or clears the selection with `None`.
///
/// Works on the in-memory state only. An ID that is not in the collection
/// clears the selection; the response then carries no `person_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn people_select(person_id: Option<String>) -> PeopleActionResponse {
    let id = match person_id.as_deref().map(parse_person_id).transpose() {
        Ok(id) => id,
        Err(err) => return PeopleActionResponse::failure(format!("people_select failed: {err}")),
    };
    let mut book = match book_state().lock() {
        Ok(book) => book,
        Err(_) => {
            return PeopleActionResponse::failure("people_select failed: state lock poisoned")
        }
    };
    if book.select(id) {
        PeopleActionResponse::success(
            "Selection updated.",
            book.selected_person_id.map(|id| id.to_string()),
        )
    } else {
        warn!("event=people_select module=ffi status=ok resolved=false");
        PeopleActionResponse::success("Selection cleared; contact not loaded.", None)
    }
}

fn with_store<T>(f: impl FnOnce(&mut FfiStore<'_>) -> ClientResult<T>) -> Result<T, String> {
    let config = resolve_config()?;
    let mut book = book_state()
        .lock()
        .map_err(|_| "address book state lock poisoned".to_string())?;

    let conn = open_db(&config.db_path).map_err(|err| format!("database open failed: {err}"))?;
    SqliteUserRepository::new(&conn)
        .ensure_user(&User::with_id(config.user_id.as_str()))
        .map_err(|err| format!("owner bootstrap failed: {err}"))?;

    let router = PeopleRouter::new(PeopleService::with_policy(
        SqlitePersonRepository::new(&conn),
        config.ownership_policy,
    ));
    let client = RpcPeopleClient::new(LocalTransport::new(
        &router,
        Some(Session::new(config.user_id.as_str())),
    ));

    let client: &dyn PeopleClient = &client;

    let mut store: FfiStore<'_> = RecordStore::with_book(client, std::mem::take(&mut *book));
    let result = f(&mut store);
    *book = store.into_book();

    result.map_err(|err| {
        warn!(
            "event=ffi_call module=ffi status=error error_code={}",
            err.code()
        );
        format!("{} ({})", err, err.code())
    })
}

fn resolve_config() -> Result<&'static AppConfig, String> {
    CONFIG
        .get_or_init(|| AppConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn book_state() -> &'static Mutex<AddressBook> {
    BOOK_STATE.get_or_init(|| Mutex::new(AddressBook::default()))
}

fn snapshot_of(book: &AddressBook, message: &str) -> PeopleSnapshot {
    PeopleSnapshot {
        ok: true,
        items: book.people.iter().map(PersonItem::from).collect(),
        selected_id: book.selected_person_id.map(|id| id.to_string()),
        message: message.to_string(),
    }
}

fn failed_snapshot(message: impl Into<String>) -> PeopleSnapshot {
    PeopleSnapshot {
        ok: false,
        items: Vec::new(),
        selected_id: None,
        message: message.into(),
    }
}

fn parse_person_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid person id `{}`", raw.trim()))
}
