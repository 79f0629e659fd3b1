use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vatkeep_core::VatStatus;

mod alerts_cmd;
mod clients_cmd;
mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "vatkeep", version, about = "Client VAT filing deadline tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config and report where state lives
    Init,

    /// Add a client
    Add(clients_cmd::AddArgs),

    /// Edit fields on an existing client
    Edit(clients_cmd::EditArgs),

    /// Remove a client and its alert history
    Remove {
        /// Client id, e.g. client-0001
        id: String,
    },

    /// Set a client's filing status: not-submitted, submitted, paid
    Mark {
        /// Client id, e.g. client-0001
        id: String,
        status: VatStatus,
    },

    /// List clients with urgency buckets
    List(clients_cmd::ListArgs),

    /// Dashboard counters
    Stats,

    /// Export the client list as CSV
    Export {
        #[arg(long, default_value = "clients.csv")]
        out: PathBuf,
    },

    /// Populate demo clients into an empty store
    Seed,

    /// Reminder composition and delivery handoff
    Alerts {
        #[command(subcommand)]
        command: alerts_cmd::AlertsCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => init(),
        Command::Add(args) => clients_cmd::add(args),
        Command::Edit(args) => clients_cmd::edit(args),
        Command::Remove { id } => clients_cmd::remove(&id),
        Command::Mark { id, status } => clients_cmd::mark(&id, status),
        Command::List(args) => clients_cmd::list(args),
        Command::Stats => clients_cmd::stats(),
        Command::Export { out } => clients_cmd::export(out),
        Command::Seed => clients_cmd::seed(),
        Command::Alerts { command } => alerts_cmd::run(command),
    }
}

fn init() -> Result<()> {
    config::init_config()?;
    println!("Data file: {}", state::data_path()?.display());
    println!("Next: vatkeep seed (demo data) or vatkeep add --company <name> --due <YYYY-MM-DD>");
    Ok(())
}
