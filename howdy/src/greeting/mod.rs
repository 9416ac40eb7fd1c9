//! Greeting generation under cancellation.
//!
//! This module provides:
//! - [`Greeter`], the cancellable runner
//! - [`GreeterConfig`] for its settings
//! - [`GreetingWork`], the injectable unit of work
//! - [`format_usd`] for winnings amounts

mod config;
mod greeter;
mod money;
mod work;

pub use config::{GreeterConfig, MAX_TIMEOUT_SECONDS};
pub use greeter::Greeter;
pub use money::format_usd;
pub use work::{GreetingWork, SimulatedWork};
