//! # Stochastic Engine (Layer 2: Simulation Engines)
//!
//! ## Layer 2 Role
//!
//! stochastic_engine turns a [`SimulationConfig`] into a [`SimulationResult`]:
//! - Monte Carlo sampling, including the geometric π estimator ([`run_monte_carlo`])
//! - Discrete-time Markov chains ([`run_markov_chain`])
//! - One- and two-dimensional random walks ([`run_random_walk`])
//!
//! Every engine validates its configuration before the first iteration,
//! folds each iteration into O(1)-memory kernels from `stochastic_core`, and
//! keeps only a decimated view of the raw series. Engines are synchronous
//! and single-threaded; progress and cancellation flow through a
//! [`ProgressSink`](progress::ProgressSink) supplied by the caller.
//!
//! ## Usage Example
//!
//! ```rust
//! use stochastic_core::rng::LabRng;
//! use stochastic_engine::progress::NoProgress;
//! use stochastic_engine::{run_simulation, SimulationConfig};
//!
//! let config = SimulationConfig::from_json(
//!     r#"{"type":"monte-carlo","iterations":100000,"estimator":"pi-geometric",
//!         "distribution":{"type":"normal","params":{"mean":0,"stdDev":1}}}"#,
//! ).unwrap();
//!
//! let mut rng = LabRng::from_seed(2024);
//! let result = run_simulation(&config, &mut rng, &mut NoProgress).unwrap();
//! assert!((result.statistics.mean - std::f64::consts::PI).abs() < 0.05);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod dispatch;
pub mod markov;
pub mod monte_carlo;
pub mod progress;
pub mod random_walk;
pub mod result;

pub use config::{
    Estimator, MarkovChainConfig, MonteCarloConfig, RandomWalkConfig, SimulationConfig,
    SimulationKind, WalkDimensions, MAX_ITERATIONS,
};
pub use dispatch::run_simulation;
pub use markov::run_markov_chain;
pub use monte_carlo::run_monte_carlo;
pub use random_walk::run_random_walk;
pub use result::{PathPoint, SimulationResult, StateFrequency};
