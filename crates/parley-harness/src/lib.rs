//! Simulation harness for Parley.
//!
//! Provides [`SimDriver`], a scripted [`parley_app::Driver`] that runs the
//! production [`parley_app::Runtime`] against canned directory answers and
//! injected connection events, recording every request it executes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod sim_driver;

pub use sim_driver::{RenderedView, SimDriver, SimDriverError, not_found};
