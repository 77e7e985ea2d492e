//! Progress reporting and cancellation polling for engine hot loops.
//!
//! Engines never talk to a channel directly. They hold a [`ProgressTracker`]
//! that turns iteration counts into a bounded number of checkpoints and
//! forwards each checkpoint to a caller-supplied [`ProgressSink`]. The sink
//! may abort the run by returning [`SimulationError::Cancelled`].

use stochastic_core::stats::decimation_stride;
use stochastic_core::SimulationError;

/// Default number of progress checkpoints per run.
pub const DEFAULT_PROGRESS_CHECKPOINTS: u32 = 20;

/// Iterations between two cancellation polls (power of two).
pub const CANCELLATION_POLL_INTERVAL: u64 = 1 << 13;

/// Receiver of progress checkpoints.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::SimulationError;
/// use stochastic_engine::progress::ProgressSink;
///
/// #[derive(Default)]
/// struct Recorder(Vec<f64>);
///
/// impl ProgressSink for Recorder {
///     fn report(&mut self, percent: f64) -> Result<(), SimulationError> {
///         self.0.push(percent);
///         Ok(())
///     }
/// }
/// ```
pub trait ProgressSink {
    /// Receives a progress value in `[0, 100)`.
    ///
    /// Values arrive in increasing order. Returning an error aborts the run
    /// and the error is propagated by the engine.
    fn report(&mut self, percent: f64) -> Result<(), SimulationError>;

    /// Number of checkpoints the sink wants per run.
    fn checkpoints(&self) -> u32 {
        DEFAULT_PROGRESS_CHECKPOINTS
    }

    /// Polled between checkpoints; returning `true` aborts the run with
    /// [`SimulationError::Cancelled`].
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Sink that discards every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn report(&mut self, _percent: f64) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Maps completed iteration counts to progress checkpoints.
///
/// Checkpoints fall every `⌈total / checkpoints⌉` iterations. The final
/// iteration never produces a checkpoint: `100` is reserved for the host,
/// which reports it together with the result.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    total: u64,
    interval: u64,
    next_report: u64,
}

impl ProgressTracker {
    /// Creates a tracker for `total` iterations.
    pub fn new(total: u64, checkpoints: u32) -> Self {
        let interval = decimation_stride(total, u64::from(checkpoints));
        Self {
            total,
            interval,
            next_report: interval,
        }
    }

    /// Creates a tracker using the sink's preferred checkpoint count.
    pub fn for_sink<P: ProgressSink + ?Sized>(total: u64, sink: &P) -> Self {
        Self::new(total, sink.checkpoints())
    }

    /// Returns the number of iterations between checkpoints.
    #[inline]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Records that `completed` iterations have finished.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Cancelled`] when the sink reports
    /// cancellation, or any error returned by [`ProgressSink::report`].
    #[inline]
    pub fn tick<P: ProgressSink + ?Sized>(
        &mut self,
        completed: u64,
        sink: &mut P,
    ) -> Result<(), SimulationError> {
        if completed % CANCELLATION_POLL_INTERVAL == 0 && sink.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }

        if completed >= self.next_report {
            self.next_report += self.interval;
            if completed < self.total {
                if sink.is_cancelled() {
                    return Err(SimulationError::Cancelled);
                }
                sink.report(completed as f64 / self.total as f64 * 100.0)?;
            }
        }
        Ok(())
    }
}
