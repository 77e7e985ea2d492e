//! Off-thread execution of a single simulation request.
//!
//! Each request gets its own blocking task, message channel and
//! [`CancellationToken`]. The engine loop is synchronous; it reaches the
//! host only through [`ChannelSink`], which forwards checkpoints as
//! [`WorkerMessage::progress`] frames and aborts the run once the token is
//! set or the host stops listening.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stochastic_core::rng::LabRng;
use stochastic_core::SimulationError;
use stochastic_engine::progress::ProgressSink;
use stochastic_engine::{run_simulation, SimulationConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::message::{RequestId, WorkerMessage};

/// Shared flag telling a running worker to stop at its next poll.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token; the worker observes it within one polling interval.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Progress sink backed by the worker's message channel.
struct ChannelSink {
    id: RequestId,
    tx: mpsc::Sender<WorkerMessage>,
    token: CancellationToken,
    checkpoints: u32,
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, percent: f64) -> Result<(), SimulationError> {
        trace!(id = %self.id, percent, "Progress checkpoint");
        // A closed channel means the host has moved on.
        self.tx
            .blocking_send(WorkerMessage::progress(self.id, percent))
            .map_err(|_| SimulationError::Cancelled)
    }

    fn checkpoints(&self) -> u32 {
        self.checkpoints
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Parameters of one worker run.
pub struct WorkerTask {
    /// Request being executed.
    pub id: RequestId,
    /// Simulation to run.
    pub config: SimulationConfig,
    /// Random source owned by the run.
    pub rng: LabRng,
    /// Progress checkpoints per run.
    pub checkpoints: u32,
    /// Cancellation flag shared with the host.
    pub token: CancellationToken,
}

/// Spawns the worker for `task` and returns its supervisor handle.
///
/// The supervisor awaits the blocking engine run and sends exactly one
/// terminal frame (`result` or `error`) unless the run was cancelled, in
/// which case nothing further is sent. Engine panics are reported as
/// `error` frames. Must be called from within a Tokio runtime.
pub fn spawn_worker(task: WorkerTask, tx: mpsc::Sender<WorkerMessage>) -> JoinHandle<()> {
    let WorkerTask {
        id,
        config,
        mut rng,
        checkpoints,
        token,
    } = task;

    let mut sink = ChannelSink {
        id,
        tx: tx.clone(),
        token,
        checkpoints,
    };

    tokio::spawn(async move {
        let run = tokio::task::spawn_blocking(move || {
            debug!(id = %id, kind = %config.kind(), seed = rng.seed(), "Worker started");
            run_simulation(&config, &mut rng, &mut sink)
        });

        let terminal = match run.await {
            Ok(Ok(result)) => WorkerMessage::completed(id, result),
            Ok(Err(SimulationError::Cancelled)) => {
                debug!(id = %id, "Worker cancelled");
                return;
            }
            Ok(Err(err)) => WorkerMessage::failed(id, err.to_string()),
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    "simulation worker was aborted".to_string()
                };
                warn!(id = %id, error = %message, "Worker crashed");
                WorkerMessage::failed(id, message)
            }
        };

        if tx.send(terminal).await.is_err() {
            debug!(id = %id, "Host dropped before the worker finished");
        }
    })
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("simulation worker panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("simulation worker panicked: {}", s)
    } else {
        "simulation worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::WorkerPayload;
    use stochastic_core::distributions::DistributionParams;
    use stochastic_engine::MonteCarloConfig;

    fn task(config: SimulationConfig, token: CancellationToken) -> WorkerTask {
        WorkerTask {
            id: RequestId::new(),
            config,
            rng: LabRng::from_seed(1),
            checkpoints: 10,
            token,
        }
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(
            panic_message(Box::new("boom")),
            "simulation worker panicked: boom"
        );
        assert_eq!(
            panic_message(Box::new(String::from("bang"))),
            "simulation worker panicked: bang"
        );
        assert_eq!(panic_message(Box::new(7u8)), "simulation worker panicked");
    }

    #[test]
    fn test_token() {
        let token = CancellationToken::new();
        let shared = token.clone();
        assert!(!shared.is_cancelled());
        token.cancel();
        assert!(shared.is_cancelled());
    }

    #[tokio::test]
    async fn test_worker_streams_progress_then_result() {
        let config = MonteCarloConfig::new(200_000, DistributionParams::normal(0.0, 1.0)).into();
        let task = task(config, CancellationToken::new());
        let id = task.id;
        let (tx, mut rx) = mpsc::channel(4);
        spawn_worker(task, tx);

        let mut frames = Vec::new();
        while let Some(message) = rx.recv().await {
            assert_eq!(message.id, id);
            frames.push(message.payload);
        }

        let (last, progress) = frames.split_last().unwrap();
        assert!(matches!(last, WorkerPayload::Completed(_)));
        assert_eq!(progress.len(), 9);
        assert!(progress
            .iter()
            .all(|p| matches!(p, WorkerPayload::Progress(v) if *v < 100.0)));
    }

    #[tokio::test]
    async fn test_worker_reports_validation_error() {
        let config = MonteCarloConfig::new(0, DistributionParams::normal(0.0, 1.0)).into();
        let (tx, mut rx) = mpsc::channel(4);
        spawn_worker(task(config, CancellationToken::new()), tx);

        let message = rx.recv().await.unwrap();
        match message.payload {
            WorkerPayload::Failed(error) => assert!(error.contains("iteration")),
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_worker_sends_no_terminal_frame() {
        let token = CancellationToken::new();
        token.cancel();
        let config =
            MonteCarloConfig::new(1_000_000, DistributionParams::normal(0.0, 1.0)).into();
        let (tx, mut rx) = mpsc::channel(4);
        spawn_worker(task(config, token), tx).await.unwrap();

        assert!(rx.recv().await.is_none());
    }
}
