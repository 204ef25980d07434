//! HTTP room directory.
//!
//! Runs the existence check for a room and reports the raw answer as a
//! [`DirectoryResponse`]. Interpretation of that answer is left to
//! [`crate::RoomGate`].

use parley_proto::RoomId;

use crate::{
    gate::DirectoryResponse,
    transport::{TransportConfig, TransportError},
};

/// Room directory reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    http: reqwest::Client,
    config: TransportConfig,
}

impl HttpDirectory {
    /// Directory client for `config.server_url`, bounded by
    /// `config.directory_timeout`.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.directory_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Ask whether `room_id` exists. Never fails: transport problems become
    /// [`DirectoryResponse::Unreachable`].
    pub async fn check(&self, room_id: &RoomId) -> DirectoryResponse {
        let url = match self.config.room_url(room_id) {
            Ok(url) => url,
            Err(e) => return DirectoryResponse::Unreachable { detail: e.to_string() },
        };

        tracing::debug!(%url, "checking room");
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => return DirectoryResponse::Unreachable { detail: e.to_string() },
        };

        let status = response.status();
        if status.is_success() {
            return DirectoryResponse::Found;
        }

        DirectoryResponse::Rejected {
            status: status.as_u16(),
            status_text: status.canonical_reason().map(str::to_owned),
            body: response.text().await.ok(),
        }
    }

    /// Configuration this directory was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}
