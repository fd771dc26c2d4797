//! Employee record database server: opens or creates the record file, runs
//! the single-threaded event loop, and persists state on clean shutdown.
//!
//! Split into a library and a thin [`main`](../bin/main.rs) binary so
//! integration tests can drive [`EventLoop`] directly over a loopback
//! socket instead of shelling out to the built binary.

pub mod config;
pub mod connection;
pub mod event_loop;
pub mod handler;
pub mod shutdown;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use empdb_record_format::{RecordFile, PROTOCOL_VERSION};
use log::info;

use config::Args;
use event_loop::EventLoop;
use shutdown::ShutdownFlag;

pub fn run(args: Args) -> Result<()> {
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {:?}", args.listen))?;

    let (mut file, mut header) = if args.create {
        RecordFile::create(&args.db_path).context("creating database file")?
    } else {
        RecordFile::open(&args.db_path).context("opening database file")?
    };
    let mut records = file.load_all(header.count).context("loading records")?;
    info!("loaded {} records from {}", records.len(), args.db_path.display());

    let shutdown = ShutdownFlag::install().context("installing signal handlers")?;
    let mut event_loop = EventLoop::bind(addr, args.capacity, PROTOCOL_VERSION)
        .with_context(|| format!("binding listener on {addr}"))?;
    info!("listening on {addr}, capacity {} connections", args.capacity);

    event_loop
        .run(&shutdown, &mut header, &mut records)
        .context("event loop failed")?;

    file.save_all(&header, &records).context("saving records on shutdown")?;
    info!("saved {} records, exiting", records.len());
    Ok(())
}
