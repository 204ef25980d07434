//! Application layer for Parley
//!
//! Pure state machines and generic runtime for UI and room session
//! orchestration, so that scripted simulation tests exercise the same code
//! that runs in production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (line commands, status line)
//! - [`Bridge`]: Protocol bridge (translates App actions to Client events)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::{Bridge, Outgoing};
pub use driver::{Driver, DriverInput};
pub use event::AppEvent;
pub use input::Command;
pub use runtime::Runtime;
pub use state::ConnectionState;
