//! Terminal client for Parley
//!
//! A thin shell over [`parley_app::Driver`] that provides terminal-specific
//! I/O: stdin lines in, plain text out. All orchestration logic lives in the
//! generic [`parley_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod render;
pub mod terminal;

pub use cli::Args;
pub use parley_app::{App, AppAction, AppEvent, Bridge, Driver, Runtime};
pub use render::Renderer;
pub use terminal::{TerminalDriver, TerminalError};
