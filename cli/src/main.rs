//! Offline batch mode: append, list, or remove the last record in a database
//! file without starting the server. Writes the file and exits; the wire
//! protocol and event loop are not involved.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use empdb_record_format::RecordFile;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "empdb-cli", about = "Batch-mode client for the employee record database")]
struct Args {
    /// Path to the record database file.
    db_path: PathBuf,

    /// Create `db_path` as a fresh, empty database before running the command.
    #[arg(long)]
    create: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append one record.
    Add {
        name: String,
        address: String,
        hours: u32,
    },
    /// Print every record in insertion order.
    List,
    /// Remove the most recently added record.
    RemoveLast,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let (mut file, mut header) = if args.create {
        RecordFile::create(&args.db_path).context("creating database file")?
    } else {
        RecordFile::open(&args.db_path).context("opening database file")?
    };
    let mut records = file.load_all(header.count).context("loading records")?;

    match args.command {
        Command::Add { name, address, hours } => {
            let addstr = format!("{name}-{address}-{hours}");
            empdb_record_format::add(&mut header, &mut records, &addstr)
                .context("add rejected")?;
            info!("added record, count now {}", records.len());
        }
        Command::List => {
            for record in empdb_record_format::list(&records) {
                println!("{} | {} | {}", record.name_str(), record.address_str(), record.hours);
            }
            return Ok(());
        }
        Command::RemoveLast => {
            empdb_record_format::remove_last(&mut header, &mut records)
                .context("remove rejected")?;
            info!("removed last record, count now {}", records.len());
        }
    }

    file.save_all(&header, &records).context("saving records")?;
    Ok(())
}
