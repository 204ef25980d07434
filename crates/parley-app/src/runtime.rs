//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to Client
//! - [`Driver`]: Platform-specific I/O
//!
//! One input is processed to completion before the next is awaited. I/O
//! requests queued by the bridge are executed in order, and their results
//! (directory answers, connection open or failure) are fed straight back.

use parley_client::{ConnectionEvent, Identity};

use crate::{App, AppAction, AppEvent, Bridge, Driver, DriverInput, bridge::Outgoing};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
    initial_room: Option<String>,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime for `identity` with the given driver.
    pub fn new(driver: D, identity: Identity) -> Self {
        Self { driver, app: App::new(), bridge: Bridge::new(identity), initial_room: None }
    }

    /// Enter `room_id` as soon as the runtime starts.
    #[must_use]
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.initial_room = Some(room_id.into());
        self
    }

    /// Run the main event loop until the user quits or input ends, then hand
    /// the driver back.
    ///
    /// The connection is released on every exit path, including driver
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or render.
    pub async fn run(mut self) -> Result<D, D::Error> {
        let result = self.run_loop().await;
        self.shutdown();
        result.map(|()| self.driver)
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app, self.bridge.client())?;

        if let Some(room_id) = self.initial_room.take() {
            let actions = self.app.enter_room(room_id);
            if self.process_actions(actions).await? {
                return Ok(());
            }
        }

        loop {
            let should_quit = match self.driver.next_input().await? {
                None => true,
                Some(DriverInput::App(event)) => {
                    let actions = self.app.handle(event);
                    self.process_actions(actions).await?
                },
                Some(DriverInput::Connection(event)) => {
                    let events = self.bridge.handle_connection_event(event);
                    self.process_bridge_events(events).await?
                },
            };
            if should_quit {
                return Ok(());
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app, self.bridge.client())?,
                    AppAction::Quit => return Ok(true),

                    // Room operations go through the bridge
                    AppAction::EnterRoom { .. }
                    | AppAction::SendMessage { .. }
                    | AppAction::LeaveRoom => {
                        let mut events = self.bridge.process_app_action(action);
                        events.extend(self.execute_outgoing().await);
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, mut events: Vec<AppEvent>) -> Result<bool, D::Error> {
        events.extend(self.execute_outgoing().await);

        let mut actions = Vec::new();
        for event in events {
            actions.extend(self.app.handle(event));
        }
        self.process_actions(actions).await
    }

    /// Execute queued I/O requests until the queue is empty.
    ///
    /// Results are fed back into the bridge, which may queue further
    /// requests. Connection failures never escape: they become a closed
    /// connection for the client.
    async fn execute_outgoing(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();

        loop {
            let requests = self.bridge.take_outgoing();
            if requests.is_empty() {
                return events;
            }

            for request in requests {
                match request {
                    Outgoing::CheckRoom(room_id) => {
                        let response = self.driver.check_room(&room_id).await;
                        events.extend(self.bridge.handle_directory_checked(room_id, response));
                    },
                    Outgoing::Connect(room_id) => match self.driver.connect(&room_id).await {
                        Ok(()) => events.extend(self.bridge.handle_connection_opened()),
                        Err(e) => {
                            tracing::warn!(%room_id, error = %e, "connect failed");
                            events.extend(self.connection_failed(e.to_string()));
                        },
                    },
                    Outgoing::Send(message) => {
                        let event = message.event_name();
                        if let Err(e) = self.driver.send(message).await {
                            tracing::warn!(event, error = %e, "send failed");
                            events.extend(self.connection_failed(e.to_string()));
                        }
                    },
                    Outgoing::Disconnect => self.driver.disconnect(),
                }
            }
        }
    }

    fn connection_failed(&mut self, reason: String) -> Vec<AppEvent> {
        self.bridge.handle_connection_event(ConnectionEvent::Closed { reason })
    }

    /// End the session and release the connection. Safe to repeat.
    fn shutdown(&mut self) {
        let events = self.bridge.teardown();

        let mut release = self.driver.is_connected();
        for request in self.bridge.take_outgoing() {
            match request {
                Outgoing::Disconnect => release = true,
                other => tracing::debug!(request = ?other, "dropping request at shutdown"),
            }
        }
        if release {
            self.driver.disconnect();
        }

        for event in events {
            let _ = self.app.handle(event);
        }
        if let Err(e) = self.driver.render(&self.app, self.bridge.client()) {
            tracing::warn!(error = %e, "failed to render final state");
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
