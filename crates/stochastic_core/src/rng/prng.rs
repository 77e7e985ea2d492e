//! Seedable pseudo-random number generator for simulation runs.
//!
//! This module provides [`LabRng`], the explicit random source every sampler
//! and engine draws from. Injecting the generator (rather than reaching for a
//! process-wide source) keeps runs reproducible under a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Simulation random number generator.
///
/// Wraps [`StdRng`] and records the seed it was initialised with, so a run
/// can always be replayed. Implements [`RngCore`], which makes it usable
/// wherever a generic `R: Rng + ?Sized` is accepted.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::rng::LabRng;
///
/// let mut rng = LabRng::from_seed(42);
///
/// let u = rng.gen_uniform();
/// assert!((0.0..1.0).contains(&u));
///
/// let x = rng.gen_range(-2.0, 2.0);
/// assert!((-2.0..2.0).contains(&x));
/// ```
#[derive(Clone, Debug)]
pub struct LabRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// Seed used for initialisation (kept for reproducibility tracking).
    seed: u64,
}

impl LabRng {
    /// Creates a generator initialised with the given seed.
    ///
    /// The same seed always produces the same sequence of variates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stochastic_core::rng::LabRng;
    ///
    /// let mut a = LabRng::from_seed(7);
    /// let mut b = LabRng::from_seed(7);
    /// assert_eq!(a.gen_uniform(), b.gen_uniform());
    /// ```
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator from a seed drawn from the thread-local entropy
    /// source. The drawn seed is still recorded and available via
    /// [`LabRng::seed`].
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::from_seed(seed)
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a uniform variate in `[0, 1)`.
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Generates a uniform variate in `[low, high)`.
    ///
    /// Never panics. `low == high` always yields `low`, and reversed bounds
    /// yield a variate in `(high, low]`.
    #[inline]
    pub fn gen_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.gen_uniform()
    }
}

impl RngCore for LabRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
