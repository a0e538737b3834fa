//! Courtside CLI
//!
//! One-shot terminal front end over the courtside data layer. Every run
//! opens the record store, initializes it, executes one subcommand and
//! exits.

mod account_cmd;
mod court_cmd;
mod reservation_cmd;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use courtside_core::config::load_config;
use courtside_core::tracing_init::init_tracing;
use courtside_store::{Courtside, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "courtside")]
#[command(version, about = "Court reservations from the terminal")]
struct Cli {
    /// Path to SQLite database file.
    #[arg(long, env = "COURTSIDE_DATABASE_PATH")]
    db_path: Option<PathBuf>,

    /// Extra config file layered over the global settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output logs as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Create the database and seed the default courts.
    Init,
    #[command(flatten)]
    Account(account_cmd::AccountAction),
    #[command(flatten)]
    Court(court_cmd::CourtAction),
    #[command(flatten)]
    Reservation(reservation_cmd::ReservationAction),
}

/// Email and password used to open a session for commands that need one.
#[derive(clap::Args, Debug)]
pub struct Login {
    #[arg(long, env = "COURTSIDE_EMAIL")]
    email: String,
    #[arg(long, env = "COURTSIDE_PASSWORD", hide_env_values = true)]
    password: String,
}

impl Login {
    /// Log in, turning rejected credentials into an error.
    pub async fn sign_in(&self, app: &Courtside) -> anyhow::Result<()> {
        if !app.login(&self.email, &self.password).await? {
            anyhow::bail!("Invalid email or password");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.db_path {
        config.store.database_path = Some(path);
    }
    if cli.log_json {
        config.logging.json = true;
    }

    init_tracing(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting courtside");

    let db_path = config
        .store
        .resolved_database_path()
        .context("No database path configured. Use --db-path <path>")?;
    info!(path = %db_path.display(), "Opening record store");
    let store = RecordStore::open(&db_path).await?;
    let initialized = if config.store.seed_courts {
        store.initialize().await?
    } else {
        store.initialize_schema().await?
    };

    let app = Courtside::new(store);
    let result = match cli.command {
        Command::Init => {
            let mut out = io::stdout();
            writeln!(
                out,
                "Database ready at {} (schema v{}, {})",
                db_path.display(),
                initialized.schema_version,
                if initialized.seeded {
                    "seed courts added"
                } else {
                    "no seed"
                }
            )?;
            Ok(())
        }
        Command::Account(action) => account_cmd::run(action, &app).await,
        Command::Court(action) => court_cmd::run(action, &app).await,
        Command::Reservation(action) => reservation_cmd::run(action, &app).await,
    };

    app.store().close().await;
    result
}
