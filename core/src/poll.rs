use crate::{Context, QueryStatus, TaskArtifact, TaskHandle, TaskStatus};
use log::{debug, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Attempt budget and pacing for one poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
    /// Fixed delay between consecutive checks.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

impl PollConfig {
    /// Create a config with the default budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the inter-attempt delay.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Terminal outcome of a poll loop.
///
/// Remote failure, budget exhaustion and cancellation are ordinary values
/// here, not errors: long-running jobs are expected to occasionally exceed
/// the budget, and the caller decides whether to resubmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job finished and produced a result reference.
    Succeeded(TaskArtifact),
    /// The service reported the job as failed.
    Failed {
        /// Diagnostics extracted from the service response, if any.
        reason: Option<String>,
    },
    /// The attempt budget ran out without a terminal status.
    TimedOut {
        /// Number of attempts performed.
        attempts: u32,
    },
    /// The caller cancelled the loop.
    Cancelled,
}

impl PollOutcome {
    /// The artifact, if the job succeeded.
    pub fn into_artifact(self) -> Option<TaskArtifact> {
        match self {
            PollOutcome::Succeeded(artifact) => Some(artifact),
            _ => None,
        }
    }
}

/// Poller drives a [`TaskHandle`] to a terminal outcome.
///
/// One poller instance owns one loop invocation at a time; the handle is
/// consumed by value so it cannot be polled twice.
#[derive(Debug, Clone)]
pub struct Poller {
    config: PollConfig,
    cancel: CancellationToken,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}

impl Poller {
    /// Create a poller with the given budget.
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an external cancellation token.
    ///
    /// Cancellation is honored before every attempt and during every sleep.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A token that cancels this poller when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until a terminal status, cancellation, or budget exhaustion.
    ///
    /// A handle that is already resolved returns immediately without any
    /// network traffic. Probe errors are transient: they are logged and the
    /// loop moves on to the next attempt.
    pub async fn wait(
        &self,
        ctx: &Context,
        handle: TaskHandle,
        probe: &dyn QueryStatus,
    ) -> PollOutcome {
        let task_id = match handle {
            TaskHandle::Resolved(artifact) => return PollOutcome::Succeeded(artifact),
            TaskHandle::Pending(id) => id,
        };

        debug!(
            "task {task_id}: polling up to {} times every {:?}",
            self.config.max_attempts, self.config.interval
        );

        // Only the previous raw status is remembered, to keep repeated
        // identical observations out of the log.
        let mut last_raw: Option<String> = None;

        for attempt in 1..=self.config.max_attempts {
            if self.cancel.is_cancelled() {
                debug!("task {task_id}: cancelled before attempt {attempt}");
                return PollOutcome::Cancelled;
            }

            match probe.query_status(ctx).await {
                Err(err) => {
                    warn!("task {task_id}: status check {attempt} failed: {err}");
                }
                Ok(report) => {
                    if last_raw.as_deref() != Some(report.raw.as_str()) {
                        match report.progress {
                            Some(pct) => {
                                debug!("task {task_id}: status {} ({pct}%)", report.raw)
                            }
                            None => debug!("task {task_id}: status {}", report.raw),
                        }
                        last_raw = Some(report.raw.clone());
                    }

                    match report.status {
                        TaskStatus::Succeeded => {
                            return match report.artifact {
                                Some(artifact) => PollOutcome::Succeeded(artifact),
                                None => PollOutcome::Failed {
                                    reason: Some(
                                        "task succeeded without a result reference".to_string(),
                                    ),
                                },
                            };
                        }
                        TaskStatus::Failed => {
                            if let Some(reason) = &report.failure {
                                warn!("task {task_id} failed: {reason}");
                            }
                            return PollOutcome::Failed {
                                reason: report.failure,
                            };
                        }
                        TaskStatus::Queued | TaskStatus::Running | TaskStatus::Unknown => {}
                    }
                }
            }

            if attempt < self.config.max_attempts {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        debug!("task {task_id}: cancelled while waiting");
                        return PollOutcome::Cancelled;
                    }
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }
        }

        warn!(
            "task {task_id}: no terminal status after {} attempts",
            self.config.max_attempts
        );
        PollOutcome::TimedOut {
            attempts: self.config.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result, StatusReport};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct ScriptedProbe {
        script: Mutex<VecDeque<Result<StatusReport>>>,
        calls: AtomicU32,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Result<StatusReport>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl QueryStatus for ScriptedProbe {
        async fn query_status(&self, _: &Context) -> Result<StatusReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .expect("probe polled after script ended")
        }
    }

    fn queued() -> Result<StatusReport> {
        Ok(StatusReport::new(TaskStatus::Queued, "in_queue"))
    }

    fn running() -> Result<StatusReport> {
        Ok(StatusReport::new(TaskStatus::Running, "generating"))
    }

    fn succeeded(url: &str) -> Result<StatusReport> {
        Ok(StatusReport::new(TaskStatus::Succeeded, "done")
            .with_artifact(TaskArtifact::Url(url.to_string())))
    }

    fn config(max_attempts: u32) -> PollConfig {
        PollConfig::new()
            .with_max_attempts(max_attempts)
            .with_interval(Duration::from_secs(3))
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminates_on_success() {
        let _ = env_logger::builder().is_test(true).try_init();

        let probe = ScriptedProbe::new(vec![
            queued(),
            running(),
            succeeded("https://cdn.example.com/out.mp4"),
        ]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-1".to_string()),
                &probe,
            )
            .await;

        assert_eq!(
            outcome,
            PollOutcome::Succeeded(TaskArtifact::Url(
                "https://cdn.example.com/out.mp4".to_string()
            ))
        );
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_without_extra_attempt() {
        let _ = env_logger::builder().is_test(true).try_init();

        let probe = ScriptedProbe::new(vec![queued(), queued(), queued()]);
        let poller = Poller::new(config(3));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-2".to_string()),
                &probe,
            )
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 3 });
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_is_non_terminal() {
        let probe = ScriptedProbe::new(vec![
            Ok(StatusReport::new(TaskStatus::Unknown, "defrosting")),
            succeeded("https://cdn.example.com/out.mp4"),
        ]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-3".to_string()),
                &probe,
            )
            .await;

        assert!(matches!(outcome, PollOutcome::Succeeded(_)));
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_error_continues() {
        let probe = ScriptedProbe::new(vec![
            Err(Error::unexpected("connection reset")),
            succeeded("https://cdn.example.com/out.mp4"),
        ]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-4".to_string()),
                &probe,
            )
            .await;

        assert!(matches!(outcome, PollOutcome::Succeeded(_)));
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_carries_diagnostics() {
        let probe = ScriptedProbe::new(vec![Ok(StatusReport::new(TaskStatus::Failed, "failed")
            .with_failure("content policy rejection"))]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-5".to_string()),
                &probe,
            )
            .await;

        assert_eq!(
            outcome,
            PollOutcome::Failed {
                reason: Some("content policy rejection".to_string())
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_without_artifact_is_failure() {
        let probe = ScriptedProbe::new(vec![Ok(StatusReport::new(TaskStatus::Succeeded, "done"))]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-6".to_string()),
                &probe,
            )
            .await;

        assert!(matches!(outcome, PollOutcome::Failed { reason: Some(_) }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_handle_skips_polling() {
        let probe = ScriptedProbe::new(vec![]);
        let poller = Poller::new(config(60));

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Resolved(TaskArtifact::Id("role-7".to_string())),
                &probe,
            )
            .await;

        assert_eq!(
            outcome,
            PollOutcome::Succeeded(TaskArtifact::Id("role-7".to_string()))
        );
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let probe = ScriptedProbe::new(vec![]);
        let poller = Poller::new(config(60));
        poller.cancellation_token().cancel();

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-8".to_string()),
                &probe,
            )
            .await;

        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(probe.calls(), 0);
    }

    /// Probe that cancels its own poller on the first observation, so the
    /// cancellation fires during the following sleep.
    #[derive(Debug)]
    struct CancellingProbe {
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl QueryStatus for CancellingProbe {
        async fn query_status(&self, _: &Context) -> Result<StatusReport> {
            self.cancel.cancel();
            Ok(StatusReport::new(TaskStatus::Queued, "in_queue"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_sleep() {
        let poller = Poller::new(config(60));
        let probe = CancellingProbe {
            cancel: poller.cancellation_token(),
        };

        let outcome = poller
            .wait(
                &Context::new(),
                TaskHandle::Pending("task-9".to_string()),
                &probe,
            )
            .await;

        assert_eq!(outcome, PollOutcome::Cancelled);
    }
}
