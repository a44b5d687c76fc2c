use crate::common::Interval;
use serde::{Deserialize, Serialize};

/// # Summary
/// Lifecycle of one instrument's monitoring loop.
///
/// # Invariants
/// - Transitions only `Starting → Running → Stopping | Crashed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    Starting,
    Running,
    Stopping,
    Crashed,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Starting => write!(f, "Starting"),
            WorkerState::Running => write!(f, "Running"),
            WorkerState::Stopping => write!(f, "Stopping"),
            WorkerState::Crashed => write!(f, "Crashed"),
        }
    }
}

/// # Summary
/// How a worker terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerExit {
    // Cancelled from outside
    Stopped,
    // Unanticipated fault, with its description
    Crashed(String),
}

/// # Summary
/// Final word of one worker, collected by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub name: String,
    pub symbol: String,
    pub interval: Interval,
    pub exit: WorkerExit,
}
