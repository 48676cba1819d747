#![forbid(unsafe_code)]

//! `voice-task-relay-ctl`: local keystore administration for `voice-task-relay`.
//!
//! Opens the same `SQLite` credential database as the server and lets an
//! operator inspect, seed, or revoke per-user task API tokens without going
//! through the web setup flow. Secrets are masked on output.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use voice_task_relay::config::GlobalConfig;
use voice_task_relay::models::credential::CredentialRecord;
use voice_task_relay::persistence::{db, CredentialStore, SqliteCredentialStore};
use voice_task_relay::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "voice-task-relay-ctl",
    about = "Manage stored task API credentials",
    version,
    long_about = None
)]
struct Cli {
    /// Server configuration file; its `db_path` is used unless `--db` is given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Credential database path (overrides the configuration file).
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store or replace the token for a user.
    Set {
        /// Platform user identifier.
        #[arg(long)]
        uid: String,
        /// Task API token.
        #[arg(long)]
        key: String,
    },
    /// Show the stored token (masked) for a user.
    Get {
        /// Platform user identifier.
        #[arg(long)]
        uid: String,
    },
    /// Remove the token for a user.
    Delete {
        /// Platform user identifier.
        #[arg(long)]
        uid: String,
    },
    /// List all users with a stored token.
    List,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let db_path = match (args.db, args.config) {
        (Some(path), _) => path,
        (None, Some(config)) => GlobalConfig::load_from_path(config)?.db_path,
        (None, None) => GlobalConfig::default().db_path,
    };

    let pool = Arc::new(db::connect(&db_path).await?);
    let store = SqliteCredentialStore::new(pool);

    match args.command {
        Command::Set { uid, key } => {
            if uid.trim().is_empty() || key.trim().is_empty() {
                return Err(AppError::InvalidInput("uid and key must not be empty".into()));
            }
            store.put(uid.trim(), key.trim()).await?;
            println!("stored credential for {}", uid.trim());
        }
        Command::Get { uid } => match store.get(&uid).await? {
            Some(record) => println!("{}", format_record(&record)),
            None => {
                eprintln!("no credential stored for {uid}");
                std::process::exit(1);
            }
        },
        Command::Delete { uid } => {
            if store.delete(&uid).await? {
                println!("deleted credential for {uid}");
            } else {
                eprintln!("no credential stored for {uid}");
                std::process::exit(1);
            }
        }
        Command::List => {
            let records = store.list().await?;
            if records.is_empty() {
                println!("no credentials stored");
            }
            for record in &records {
                println!("{}", format_record(record));
            }
        }
    }

    Ok(())
}

fn format_record(record: &CredentialRecord) -> String {
    format!(
        "{}\t{}\tcreated {}\tupdated {}",
        record.user_id,
        record.masked_secret(),
        record.created_at.to_rfc3339(),
        record.updated_at.to_rfc3339(),
    )
}
