//! # Stochastic Core (Layer 1: Samplers and Streaming Statistics)
//!
//! ## Layer 1 Role
//!
//! stochastic_core provides the leaf components of the Stochastic Lab
//! simulation engine:
//! - A seedable random source ([`rng::LabRng`])
//! - Single-variate samplers for normal, exponential, Poisson and binomial
//!   distributions ([`distributions`])
//! - O(1)-memory streaming statistics kernels ([`stats`])
//! - The error taxonomy shared by every simulation crate ([`SimulationError`])
//!
//! The crate has no knowledge of simulation configurations or execution
//! hosts; those live in `stochastic_engine` and `stochastic_host`.
//!
//! ## Usage Example
//!
//! ```rust
//! use rand_distr::Distribution;
//! use stochastic_core::distributions::{DistributionParams, DistributionSampler};
//! use stochastic_core::rng::LabRng;
//! use stochastic_core::stats::{Statistics, WelfordState};
//!
//! let sampler = DistributionSampler::new(DistributionParams::normal(0.0, 1.0)).unwrap();
//! let mut rng = LabRng::from_seed(42);
//! let mut welford = WelfordState::new();
//!
//! for _ in 0..10_000 {
//!     welford.update(sampler.sample(&mut rng));
//! }
//!
//! let stats = Statistics::from_summary(&welford.finalize());
//! assert!(stats.mean.abs() < 0.05);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod distributions;
pub mod error;
pub mod rng;
pub mod stats;

pub use error::SimulationError;
