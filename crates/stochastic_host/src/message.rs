//! Messages exchanged between a simulation worker and the host.
//!
//! Every message carries the [`RequestId`] of the run that produced it. The
//! host compares that id against its current request and silently drops
//! anything from a superseded or cancelled run.
//!
//! Serialised frames use the flat shapes
//! `{"id": …, "progress": 40.0}`, `{"id": …, "result": {…}}` and
//! `{"id": …, "error": "…"}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use stochastic_engine::SimulationResult;
use uuid::Uuid;

/// Unique identifier of one simulation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Body of a [`WorkerMessage`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerPayload {
    /// Percentage of iterations completed.
    Progress(f64),
    /// Final result of a successful run.
    #[serde(rename = "result")]
    Completed(Box<SimulationResult>),
    /// Failure message of an unsuccessful run.
    #[serde(rename = "error")]
    Failed(String),
}

impl WorkerPayload {
    /// Returns `true` for payloads that end a run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Frame sent from a worker to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    /// Request that produced the frame.
    pub id: RequestId,
    /// Frame body.
    #[serde(flatten)]
    pub payload: WorkerPayload,
}

impl WorkerMessage {
    /// Creates a progress frame.
    pub fn progress(id: RequestId, percent: f64) -> Self {
        Self {
            id,
            payload: WorkerPayload::Progress(percent),
        }
    }

    /// Creates a result frame.
    pub fn completed(id: RequestId, result: SimulationResult) -> Self {
        Self {
            id,
            payload: WorkerPayload::Completed(Box::new(result)),
        }
    }

    /// Creates an error frame.
    pub fn failed(id: RequestId, message: impl Into<String>) -> Self {
        Self {
            id,
            payload: WorkerPayload::Failed(message.into()),
        }
    }
}

/// Latest progress published by the host to its subscribers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Request the progress belongs to, `None` before the first submission.
    pub id: Option<RequestId>,
    /// Percentage in `[0, 100]`.
    pub percent: f64,
}
