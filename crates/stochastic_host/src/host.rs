//! Single-flight simulation host.
//!
//! [`SimulationHost`] runs at most one simulation at a time. Submitting a
//! new request supersedes the one in flight: its caller is resolved with
//! [`HostError::Superseded`], its worker is told to stop, and any frame it
//! still produces is dropped because its id no longer matches the current
//! request.
//!
//! Request lifecycle: `Idle → Running → {Completed | Failed | Cancelled}`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stochastic_core::rng::LabRng;
use stochastic_engine::{SimulationConfig, SimulationResult};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, HostConfig};
use crate::message::{ProgressUpdate, RequestId, WorkerMessage, WorkerPayload};
use crate::worker::{spawn_worker, CancellationToken, WorkerTask};

/// Terminal failure of a submitted request.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HostError {
    /// The engine rejected the configuration or failed while running.
    #[error("Simulation {id} failed: {message}")]
    Failed {
        /// Failed request.
        id: RequestId,
        /// Error message reported by the worker.
        message: String,
    },

    /// The caller cancelled the request.
    #[error("Simulation {id} was cancelled")]
    Cancelled {
        /// Cancelled request.
        id: RequestId,
    },

    /// A newer submission replaced the request.
    #[error("Simulation {id} was superseded by {by}")]
    Superseded {
        /// Replaced request.
        id: RequestId,
        /// Request that replaced it.
        by: RequestId,
    },

    /// The worker stopped without reporting an outcome, or the host was dropped.
    #[error("Simulation {id} lost its worker")]
    Disconnected {
        /// Orphaned request.
        id: RequestId,
    },
}

impl HostError {
    /// Returns the id of the request that failed.
    pub fn id(&self) -> RequestId {
        match self {
            Self::Failed { id, .. }
            | Self::Cancelled { id }
            | Self::Superseded { id, .. }
            | Self::Disconnected { id } => *id,
        }
    }

    /// Returns `true` for explicit cancellation and supersession.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::Superseded { .. })
    }
}

/// State of the most recent request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HostStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A worker is running.
    Running,
    /// The last request produced a result.
    Completed,
    /// The last request failed.
    Failed,
    /// The last request was cancelled.
    Cancelled,
}

type Reply = oneshot::Sender<Result<SimulationResult, HostError>>;

/// Request whose frames are currently honoured.
struct ActiveRun {
    id: RequestId,
    token: CancellationToken,
    reply: Reply,
}

#[derive(Default)]
struct HostState {
    status: HostStatus,
    active: Option<ActiveRun>,
}

impl HostState {
    /// Removes the active run if it is `id`.
    fn take_if(&mut self, id: RequestId) -> Option<ActiveRun> {
        match &self.active {
            Some(run) if run.id == id => self.active.take(),
            _ => None,
        }
    }
}

struct Shared {
    state: Mutex<HostState>,
    progress: watch::Sender<ProgressUpdate>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a submitted request.
#[derive(Debug)]
pub struct PendingSimulation {
    id: RequestId,
    reply: oneshot::Receiver<Result<SimulationResult, HostError>>,
}

impl PendingSimulation {
    /// Returns the request id.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Waits for the outcome of the request.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the run fails, is cancelled or superseded,
    /// or when the host is dropped before the run finishes.
    pub async fn wait(self) -> Result<SimulationResult, HostError> {
        self.reply
            .await
            .unwrap_or(Err(HostError::Disconnected { id: self.id }))
    }
}

/// Runs simulations off the caller's task, one at a time.
///
/// # Examples
///
/// ```rust
/// use stochastic_engine::SimulationConfig;
/// use stochastic_host::{HostConfig, SimulationHost};
///
/// # #[tokio::main]
/// # async fn main() {
/// let host = SimulationHost::new(HostConfig::default()).unwrap();
/// let config = SimulationConfig::from_json(
///     r#"{"type":"monte-carlo","iterations":10000,
///         "distribution":{"type":"exponential","params":{"lambda":1}}}"#,
/// ).unwrap();
///
/// let result = host.submit_seeded(config, 42).wait().await.unwrap();
/// assert_eq!(result.iterations, 10_000);
/// # }
/// ```
pub struct SimulationHost {
    config: HostConfig,
    shared: Arc<Shared>,
}

impl SimulationHost {
    /// Creates an idle host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`HostConfig::validate`].
    pub fn new(config: HostConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (progress, _) = watch::channel(ProgressUpdate::default());
        Ok(Self {
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(HostState::default()),
                progress,
            }),
        })
    }

    /// Returns the host configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Submits a simulation using the configured seed, or fresh entropy when
    /// none is configured.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, config: SimulationConfig) -> PendingSimulation {
        let rng = match self.config.seed {
            Some(seed) => LabRng::from_seed(seed),
            None => LabRng::from_entropy(),
        };
        self.submit_with_rng(config, rng)
    }

    /// Submits a simulation with an explicit seed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit_seeded(&self, config: SimulationConfig, seed: u64) -> PendingSimulation {
        self.submit_with_rng(config, LabRng::from_seed(seed))
    }

    fn submit_with_rng(&self, config: SimulationConfig, rng: LabRng) -> PendingSimulation {
        let id = RequestId::new();
        let token = CancellationToken::new();
        let (reply, receiver) = oneshot::channel();
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);

        {
            let mut state = self.shared.lock();
            if let Some(previous) = state.active.take() {
                info!(id = %previous.id, by = %id, "Superseding running simulation");
                previous.token.cancel();
                let _ = previous.reply.send(Err(HostError::Superseded {
                    id: previous.id,
                    by: id,
                }));
            }
            state.active = Some(ActiveRun {
                id,
                token: token.clone(),
                reply,
            });
            state.status = HostStatus::Running;
            self.shared.progress.send_replace(ProgressUpdate {
                id: Some(id),
                percent: 0.0,
            });
        }

        info!(id = %id, kind = %config.kind(), iterations = config.iterations(), "Simulation submitted");

        spawn_worker(
            WorkerTask {
                id,
                config,
                rng,
                checkpoints: self.config.progress_checkpoints,
                token,
            },
            tx,
        );
        tokio::spawn(relay(Arc::clone(&self.shared), id, rx));

        PendingSimulation { id, reply: receiver }
    }

    /// Cancels the running request, if any.
    ///
    /// The pending caller is resolved with [`HostError::Cancelled`] at once;
    /// the worker stops at its next cancellation poll and nothing it sends
    /// afterwards is delivered. Returns `false` when nothing was running.
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.lock();
        match state.active.take() {
            Some(run) => {
                info!(id = %run.id, "Cancelling simulation");
                run.token.cancel();
                let _ = run.reply.send(Err(HostError::Cancelled { id: run.id }));
                state.status = HostStatus::Cancelled;
                true
            }
            None => false,
        }
    }

    /// Returns the state of the most recent request.
    pub fn status(&self) -> HostStatus {
        self.shared.lock().status
    }

    /// Returns the id of the running request, if any.
    pub fn current_request(&self) -> Option<RequestId> {
        self.shared.lock().active.as_ref().map(|run| run.id)
    }

    /// Subscribes to progress updates of the current request.
    ///
    /// The channel always holds the latest update; `100` is published just
    /// before a successful result is delivered.
    pub fn subscribe(&self) -> watch::Receiver<ProgressUpdate> {
        self.shared.progress.subscribe()
    }
}

impl Drop for SimulationHost {
    fn drop(&mut self) {
        if let Some(run) = self.shared.lock().active.take() {
            run.token.cancel();
            let _ = run.reply.send(Err(HostError::Disconnected { id: run.id }));
        }
    }
}

/// Delivers frames of request `id` while it is still the active request.
///
/// Frames from a request that has been superseded or cancelled are read and
/// discarded so the worker never blocks on a full channel.
async fn relay(shared: Arc<Shared>, id: RequestId, mut rx: mpsc::Receiver<WorkerMessage>) {
    while let Some(message) = rx.recv().await {
        if message.id != id {
            warn!(expected = %id, got = %message.id, "Frame routed to the wrong request");
            continue;
        }
        deliver(&shared, message);
    }

    // Channel closed: the worker is gone. Anything still pending never got
    // a terminal frame.
    let mut state = shared.lock();
    if let Some(run) = state.take_if(id) {
        state.status = HostStatus::Failed;
        warn!(id = %id, "Worker exited without an outcome");
        let _ = run.reply.send(Err(HostError::Disconnected { id }));
    }
}

fn deliver(shared: &Shared, message: WorkerMessage) {
    let id = message.id;
    let mut state = shared.lock();
    if state.active.as_ref().map(|run| run.id) != Some(id) {
        debug!(id = %id, "Discarding frame from stale request");
        return;
    }

    match message.payload {
        WorkerPayload::Progress(percent) => {
            shared.progress.send_replace(ProgressUpdate {
                id: Some(id),
                percent,
            });
        }
        WorkerPayload::Completed(result) => {
            if let Some(run) = state.take_if(id) {
                state.status = HostStatus::Completed;
                shared.progress.send_replace(ProgressUpdate {
                    id: Some(id),
                    percent: 100.0,
                });
                info!(id = %id, execution_time_ms = result.execution_time_ms, "Simulation completed");
                let _ = run.reply.send(Ok(*result));
            }
        }
        WorkerPayload::Failed(message) => {
            if let Some(run) = state.take_if(id) {
                state.status = HostStatus::Failed;
                warn!(id = %id, error = %message, "Simulation failed");
                let _ = run.reply.send(Err(HostError::Failed { id, message }));
            }
        }
    }
}
