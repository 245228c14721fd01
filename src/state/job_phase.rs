/// Job lifecycle definitions
///
/// A job moves `Created -> Running -> Finished | Cancelled`. Eviction is not
/// a phase: an evicted job is simply gone from the registry.
use serde::Serialize;
use std::fmt;

/// Represents the current lifecycle phase of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// Job is registered but no worker has started yet
    Created,

    /// Workers are draining the frontier
    Running,

    /// Every worker exited after observing an empty frontier
    Finished,

    /// Every worker exited after the job was cancelled or hit its deadline
    Cancelled,
}

impl JobPhase {
    /// Returns true once all workers have exited
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: JobPhase) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Running)
                | (Self::Running, Self::Finished)
                | (Self::Running, Self::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
