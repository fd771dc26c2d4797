//! Command-line surface for the server binary. Kept outside the protocol
//! and record-format crates: argument parsing is driver plumbing, not core.

use std::path::PathBuf;

use clap::Parser;

/// Number of connection-table slots when `--capacity` is not given.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Parser)]
#[command(name = "empdb-server", about = "Employee record database server")]
pub struct Args {
    /// Path to the record database file.
    pub db_path: PathBuf,

    /// Address to listen on, e.g. 127.0.0.1:4000.
    #[arg(long, default_value = "127.0.0.1:4000")]
    pub listen: String,

    /// Create `db_path` as a fresh, empty database instead of opening it.
    #[arg(long)]
    pub create: bool,

    /// Maximum number of simultaneous connections.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}
