//! # Stochastic Host (Layer 3: Execution Host)
//!
//! ## Layer 3 Role
//!
//! stochastic_host runs `stochastic_engine` simulations outside the
//! caller's control flow:
//! - One blocking worker per request, fed back over a bounded channel
//!   ([`worker`])
//! - Request-id tagged progress and result frames ([`message`])
//! - Single-flight submission, cancellation and progress subscription
//!   ([`SimulationHost`])
//! - Layered configuration from CLI, environment and TOML ([`config`])
//!
//! The `stochastic-lab` binary wraps the host in a command-line tool that
//! reads a simulation JSON file and prints the result JSON.

#![deny(missing_docs)]

pub mod config;
pub mod host;
pub mod message;
pub mod worker;

pub use config::{build_config, CliArgs, ConfigError, HostConfig, LogLevel};
pub use host::{HostError, HostStatus, PendingSimulation, SimulationHost};
pub use message::{ProgressUpdate, RequestId, WorkerMessage, WorkerPayload};

// Re-export the simulation stack for downstream callers
pub use stochastic_core;
pub use stochastic_engine;

/// Host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
