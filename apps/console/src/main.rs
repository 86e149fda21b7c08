use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CommandOutcome, HttpRecordService, RecordWorkspace, WorkspaceCommand, WorkspaceState,
    WorkspaceStore,
};
use shared::domain::{display_date, EmployeeField};
use tracing::debug;

#[derive(Parser, Debug)]
struct Args {
    /// Origin serving `/api/Record/*`.
    #[arg(long, env = "RECORDS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,
    /// Per-request limit for backend calls.
    #[arg(long, env = "RECORDS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print all records.
    List,
    /// Add one record and save the full list.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date_of_birth: String,
        #[arg(long, default_value = "0")]
        salary: String,
        #[arg(long)]
        address: String,
    },
    /// Change one field of the row at a table position and save all rows.
    Edit {
        #[arg(long)]
        row: usize,
        #[arg(long)]
        field: EmployeeField,
        #[arg(long)]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let args = Args::parse();

    let timeout = Duration::from_secs(args.timeout_secs.max(1));
    let service = HttpRecordService::with_timeout(&args.base_url, timeout)?;
    let store = WorkspaceStore::spawn(RecordWorkspace::new(Arc::new(service)));

    match args.command {
        Command::List => {
            let outcome = run(&store, WorkspaceCommand::Update).await?;
            print_table(&outcome.state);
        }
        Command::Add {
            name,
            date_of_birth,
            salary,
            address,
        } => {
            run(&store, WorkspaceCommand::Update).await?;
            run(&store, WorkspaceCommand::OpenDraft).await?;
            for (field, value) in [
                (EmployeeField::Name, name),
                (EmployeeField::DateOfBirth, date_of_birth),
                (EmployeeField::Salary, salary),
                (EmployeeField::Address, address),
            ] {
                run(&store, WorkspaceCommand::UpdateDraftField { field, value }).await?;
            }
            let outcome = run(&store, WorkspaceCommand::CommitDraft).await?;
            print_table(&outcome.state);
        }
        Command::Edit { row, field, value } => {
            let loaded = run(&store, WorkspaceCommand::Update).await?;
            if row >= loaded.state.edited_employees.len() {
                bail!(
                    "row {row} does not exist; {} rows loaded",
                    loaded.state.edited_employees.len()
                );
            }
            run(&store, WorkspaceCommand::UpdateEditedField { row, field, value }).await?;
            let outcome = run(&store, WorkspaceCommand::Update).await?;
            print_table(&outcome.state);
        }
    }

    Ok(())
}

/// Dispatches one command and turns a recorded failure into an error exit.
async fn run(store: &WorkspaceStore, command: WorkspaceCommand) -> Result<CommandOutcome> {
    let name = command.name();
    let outcome = store.dispatch(command).await?;
    debug!(command = name, ok = outcome.result.is_ok(), "workspace command finished");

    if let Err(error) = &outcome.result {
        if let Some(errors) = error.validation_errors() {
            for (field, message) in errors.iter().filter(|(_, message)| !message.is_empty()) {
                eprintln!("{field}: {message}");
            }
        }
        match &outcome.state.last_error {
            Some(message) => bail!("{message} ({error})"),
            None => bail!("{error}"),
        }
    }

    if let Some(message) = &outcome.state.last_error {
        eprintln!("{message}");
    } else if let Some(message) = &outcome.state.last_message {
        println!("{message}");
    }
    Ok(outcome)
}

fn print_table(state: &WorkspaceState) {
    println!(
        "{:>4}  {:<24} {:<10} {:>7}  {}",
        "#", "Name", "Birthday", "Salary", "Address"
    );
    for (index, employee) in state.visible_rows().enumerate() {
        println!(
            "{:>4}  {:<24} {:<10} {:>7}  {}",
            index,
            employee.name,
            display_date(&employee.date_of_birth),
            employee.salary,
            employee.address
        );
    }
}
