//! Client-side record store for the address book UI.
//!
//! # Responsibility
//! - Hold the people collection and the current selection.
//! - Route every write through the data service client, then commit.
//! - Notify subscribers after each state transition.
//!
//! # Invariants
//! - Person IDs are unique within the collection.
//! - The selection is `None` or the ID of a person in the collection.
//! - Local state changes only after the remote call succeeded.

pub mod record_store;

pub use record_store::{AddressBook, RecordStore, StoreChange, SubscriptionId};
