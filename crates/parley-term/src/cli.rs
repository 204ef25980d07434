//! Command line arguments.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use parley_client::{ClientError, Identity, IdentityFile, IdentitySource, transport::TransportConfig};

/// Parley room client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Join a Parley room and chat from the terminal")]
#[command(version)]
pub struct Args {
    /// Room server base URL
    #[arg(short, long, env = "PARLEY_SERVER", default_value = "http://localhost:3000")]
    pub server: String,

    /// Room to join on start. Use `/join <room>` later otherwise.
    #[arg(short, long)]
    pub room: Option<String>,

    /// Display name
    #[arg(short, long, conflicts_with = "identity_file")]
    pub name: Option<String>,

    /// JSON file holding the stored user (`{"name": ...}`)
    #[arg(long, env = "PARLEY_IDENTITY")]
    pub identity_file: Option<PathBuf>,

    /// Path of the WebSocket endpoint on the server
    #[arg(long, default_value = "/ws")]
    pub socket_path: String,

    /// Room existence check timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub directory_timeout_ms: u64,

    /// Connection open timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub connect_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Transport settings for the directory and the room socket.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            server_url: self.server.clone(),
            socket_path: self.socket_path.clone(),
            directory_timeout: Duration::from_millis(self.directory_timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            ..TransportConfig::default()
        }
    }

    /// Resolve the local identity from `--name` or the identity file.
    pub fn identity(&self) -> Result<Identity, ClientError> {
        match (&self.name, &self.identity_file) {
            (Some(name), _) => Identity::new(name.clone()),
            (None, Some(path)) => IdentityFile::new(path).load(),
            (None, None) => Err(ClientError::PreconditionMissing {
                detail: "pass --name or --identity-file".into(),
            }),
        }
    }
}
