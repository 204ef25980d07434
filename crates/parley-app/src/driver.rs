//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use parley_client::{Client, ClientMessage, ConnectionEvent, DirectoryResponse, RoomId};

use crate::{App, AppEvent};

/// Next input for the runtime, from either the user or the connection.
#[derive(Debug, Clone)]
pub enum DriverInput {
    /// User input or another UI event.
    App(AppEvent),
    /// Event from the open room connection.
    Connection(ConnectionEvent),
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal frontend and simulation.
///
/// # Implementations
///
/// - **Terminal**: stdin lines, reqwest directory, WebSocket transport
/// - **Simulation**: scripted directory answers and injected events
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input.
    ///
    /// Returns `None` once user input is exhausted and the runtime should
    /// stop.
    fn next_input(&mut self) -> impl Future<Output = Result<Option<DriverInput>, Self::Error>> + Send;

    /// Ask the room directory whether `room_id` exists.
    ///
    /// Never fails: transport problems are reported as
    /// [`DirectoryResponse::Unreachable`].
    fn check_room(&mut self, room_id: &RoomId) -> impl Future<Output = DirectoryResponse> + Send;

    /// Open the connection for `room_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn connect(&mut self, room_id: &RoomId) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send an event over the open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or send fails.
    fn send(&mut self, message: ClientMessage) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the connection. Safe to call without one.
    fn disconnect(&mut self);

    /// Check if a connection is open.
    fn is_connected(&self) -> bool;

    /// Render the application state and the client's session views.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App, client: &Client) -> Result<(), Self::Error>;
}
