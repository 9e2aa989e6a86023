//! `addressbook` command-line front end.
//!
//! Drives the same record store a UI would: every command loads the
//! collection, performs one store operation, and prints the result.

mod cli;

use addressbook_core::db::open_db;
use addressbook_core::{
    init_logging, AppConfig, LocalTransport, PeopleClient, PeopleRouter, PeopleService, Person,
    RecordStore, RpcPeopleClient, Session, SqlitePersonRepository, SqliteUserRepository, User,
    UserRepository,
};
use clap::Parser;
use cli::{Cli, Command};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        let log_dir = log_dir.to_str().ok_or("log directory must be valid UTF-8")?;
        init_logging(config.log_level, log_dir)?;
    }

    if let Command::Ping = cli.command {
        println!("addressbook_core ping={}", addressbook_core::ping());
        println!("addressbook_core version={}", addressbook_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)?;
    SqliteUserRepository::new(&conn).ensure_user(&User::with_id(config.user_id.as_str()))?;

    let router = PeopleRouter::new(PeopleService::with_policy(
        SqlitePersonRepository::new(&conn),
        config.ownership_policy,
    ));
    let session = Session::new(config.user_id.as_str());
    let client = RpcPeopleClient::new(LocalTransport::new(&router, Some(session)));
    let mut store = RecordStore::new(client);
    store.load()?;

    info!(
        "event=cli_command module=cli status=start count={}",
        store.people().len()
    );
    run(&mut store, cli.command)
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(user) = &cli.user {
        config.user_id = user.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = cli.log_level_override() {
        config.log_level = level;
    }
    Ok(config)
}

fn run<C: PeopleClient>(
    store: &mut RecordStore<C>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Ping => {}
        Command::List => {
            if store.people().is_empty() {
                println!("No contacts.");
            }
            for person in store.people() {
                println!("{}  {}", person.id, person.display_name());
            }
        }
        Command::Show { id } => {
            if !store.select_person(Some(id)) {
                return Err(format!("no contact with id {id}").into());
            }
            if let Some(person) = store.selected_person() {
                print_person(person);
            }
        }
        Command::Add(fields) => {
            let id = store.add_person()?;
            if !fields.is_empty() {
                let mut person = store
                    .selected_person()
                    .cloned()
                    .ok_or("created contact is not selected")?;
                fields.apply(&mut person);
                store.save_person(person)?;
            }
            println!("{id}");
        }
        Command::Edit { id, fields } => {
            if !store.select_person(Some(id)) {
                return Err(format!("no contact with id {id}").into());
            }
            let mut person = store
                .selected_person()
                .cloned()
                .ok_or("selected contact disappeared")?;
            fields.apply(&mut person);
            store.save_person(person)?;
            println!("Saved {id}.");
        }
        Command::Remove { id } => {
            store.remove_person(id)?;
            println!("Removed {id}.");
        }
    }
    Ok(())
}

fn print_person(person: &Person) {
    println!("id:      {}", person.id);
    println!("name:    {}", person.name);
    println!("email:   {}", person.email);
    println!("phone:   {}", person.phone);
    println!("address: {}", person.address);
    println!("notes:   {}", person.notes);
}
