//! UI-facing bridge for the address book core.

pub mod api;
