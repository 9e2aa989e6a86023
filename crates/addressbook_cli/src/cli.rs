//! Command-line surface for the address book.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// addressbook - keep contact records in a local database
#[derive(Debug, Parser)]
#[command(name = "addressbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file (overrides ADDRESSBOOK_DB_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Owning user ID (overrides ADDRESSBOOK_USER)
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,

    /// Absolute log directory (overrides ADDRESSBOOK_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Level override derived from `-v` flags, if any.
    pub fn log_level_override(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check core wiring
    Ping,
    /// List all contacts
    List,
    /// Show one contact
    Show {
        id: Uuid,
    },
    /// Create a contact, optionally filling its fields
    Add(PersonFields),
    /// Change fields of an existing contact
    Edit {
        id: Uuid,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// Delete a contact
    Remove {
        id: Uuid,
    },
}

/// Optional field values; unset flags keep the current value.
#[derive(Debug, Default, Clone, Args)]
pub struct PersonFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl PersonFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.notes.is_none()
    }

    pub fn apply(self, person: &mut addressbook_core::Person) {
        let targets = [
            (self.name, &mut person.name),
            (self.email, &mut person.email),
            (self.phone, &mut person.phone),
            (self.address, &mut person.address),
            (self.notes, &mut person.notes),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}
