//! # Random Number Generation
//!
//! The Stochastic Lab never touches an ambient, process-wide random source.
//! Every run owns a [`LabRng`] created from an explicit seed (or from entropy
//! with the drawn seed recorded), and every sampler takes the generator as a
//! parameter.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: a seed fully determines a run's variates
//! - **Isolation**: each run owns its generator; nothing is shared between
//!   concurrent simulations
//! - **Static dispatch**: samplers are generic over `R: Rng + ?Sized`
//!
//! ## Usage Example
//!
//! ```rust
//! use stochastic_core::rng::LabRng;
//!
//! let mut rng = LabRng::from_seed(12345);
//! let u = rng.gen_uniform();
//! assert!(u >= 0.0 && u < 1.0);
//! ```

mod prng;

pub use prng::LabRng;

#[cfg(test)]
mod tests;
