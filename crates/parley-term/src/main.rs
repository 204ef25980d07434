//! Parley terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Join a room on a local development server
//! parley --name alice --room abc
//!
//! # Use a stored identity and a remote server
//! PARLEY_IDENTITY=~/.parley/user.json parley --server https://chat.example.com
//! ```
//!
//! Type a line to send it. `/join <room>` switches rooms, `/leave` leaves,
//! `/quit` exits.

use clap::Parser;
use parley_term::{Args, Runtime, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let identity = args.identity()?;
    tracing::info!(name = identity.name(), server = %args.server, "parley starting");

    let driver = TerminalDriver::new(args.transport_config())?;
    let mut runtime = Runtime::new(driver, identity);
    if let Some(room_id) = args.room {
        runtime = runtime.with_room(room_id);
    }

    runtime.run().await?;
    Ok(())
}
