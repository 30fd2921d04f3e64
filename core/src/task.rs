use crate::{Context, Result};
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;

/// Normalized status of a remote generation job.
///
/// Service families report status in their own vocabulary; probes map every
/// raw value onto this closed set. Anything unrecognized becomes
/// [`TaskStatus::Unknown`], which is deliberately non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Job accepted, not started yet.
    Queued,
    /// Job is being processed.
    Running,
    /// Job finished and produced a result reference.
    Succeeded,
    /// Job finished without a result.
    Failed,
    /// Raw status not part of the known vocabulary.
    Unknown,
}

impl TaskStatus {
    /// Whether polling stops at this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "queued"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reference to the result of a completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskArtifact {
    /// Remote URL of the rendered artifact.
    Url(String),
    /// Identifier produced by jobs that do not render an artifact,
    /// like role identification.
    Id(String),
}

impl TaskArtifact {
    /// The artifact URL, if this result is downloadable.
    pub fn url(&self) -> Option<&str> {
        match self {
            TaskArtifact::Url(url) => Some(url),
            TaskArtifact::Id(_) => None,
        }
    }
}

/// Runtime reference to one remote job, produced by submission.
///
/// A handle is consumed by value by exactly one poll loop; services that
/// answer synchronously short-circuit the loop via [`TaskHandle::Resolved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskHandle {
    /// The service answered with the result directly.
    Resolved(TaskArtifact),
    /// The service accepted the job and returned a task id to poll.
    Pending(String),
}

impl TaskHandle {
    /// The remote task id, if the job is still pending.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            TaskHandle::Pending(id) => Some(id),
            TaskHandle::Resolved(_) => None,
        }
    }
}

/// One status observation, as returned by a [`QueryStatus`] probe.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Normalized status.
    pub status: TaskStatus,
    /// Raw service vocabulary, kept for logging.
    pub raw: String,
    /// Result reference, set on success.
    pub artifact: Option<TaskArtifact>,
    /// Failure diagnostics, set when the service reports them.
    pub failure: Option<String>,
    /// Progress percentage, for services that report one.
    pub progress: Option<u8>,
}

impl StatusReport {
    /// Create a report for the given normalized status and raw vocabulary.
    pub fn new(status: TaskStatus, raw: impl Into<String>) -> Self {
        Self {
            status,
            raw: raw.into(),
            artifact: None,
            failure: None,
            progress: None,
        }
    }

    /// Attach the result reference.
    pub fn with_artifact(mut self, artifact: TaskArtifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Attach failure diagnostics.
    pub fn with_failure(mut self, failure: impl Into<String>) -> Self {
        self.failure = Some(failure.into());
        self
    }

    /// Attach a progress percentage.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// QueryStatus is the trait implemented by per-family status probes.
///
/// A probe owns everything needed to ask the service about one task: the
/// endpoint, the task id and the authentication path. Families that require
/// signed status calls re-sign on every invocation with a fresh timestamp.
#[async_trait::async_trait]
pub trait QueryStatus: Debug + Send + Sync + 'static {
    /// Issue one status request and normalize the answer.
    ///
    /// Transport failures and malformed responses surface as errors; the
    /// poll loop treats them as transient.
    async fn query_status(&self, ctx: &Context) -> Result<StatusReport>;
}

/// Outcome of a full submit/poll/download round.
///
/// This is the two-outcome public boundary: callers get an artifact path or
/// a failure description, never a panic or an exception path for expected
/// job failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Artifact downloaded to the given path.
    Downloaded {
        /// Local destination the artifact was written to.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
    /// Job completed without a downloadable artifact.
    Completed(TaskArtifact),
    /// Job failed, timed out or was cancelled; human-readable reason.
    Failed(String),
}

impl JobOutcome {
    /// Whether the job produced a usable result.
    pub fn is_success(&self) -> bool {
        !matches!(self, JobOutcome::Failed(_))
    }
}
