use crate::constants::{API_VERSION, DEFAULT_ENDPOINT, DEFAULT_REGION, SIGNING_SERVICE, SUBMIT_ACTION};
use crate::{Config, DefaultCredentialProvider, RequestSigner, StatusProbe, TaskRequest};
use bytes::Bytes;
use http::Method;
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use vidgen_core::{
    download_artifact, Context, Error, ErrorKind, JobOutcome, PollOutcome, Poller, Result,
    Signer, TaskArtifact, TaskHandle,
};

/// Client for the signed visual generation service.
///
/// Owns the endpoint and a [`Signer`] wired to the default credential
/// chain; every submission and status call goes through it.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    signer: Signer<crate::Credential>,
    endpoint: String,
}

impl Client {
    /// Create a client from a context and config.
    pub fn new(ctx: Context, config: Config) -> Self {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let region = config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let config = Arc::new(config);
        let signer = Signer::new(
            ctx.clone(),
            DefaultCredentialProvider::new(config),
            RequestSigner::new(SIGNING_SERVICE, &region),
        );

        Self {
            ctx,
            signer,
            endpoint,
        }
    }

    /// The signer used for this client's requests.
    pub fn signer(&self) -> &Signer<crate::Credential> {
        &self.signer
    }

    /// Submit a job and extract its task handle.
    ///
    /// Some pipelines answer synchronously; those short-circuit into
    /// [`TaskHandle::Resolved`]. A 2xx response carrying neither a task id
    /// nor a resolved result is a submission failure. Submission is never
    /// retried here; resubmission is the caller's decision.
    pub async fn submit(&self, task: &TaskRequest) -> Result<TaskHandle> {
        let body = serde_json::to_vec(task)
            .map_err(|e| Error::unexpected("failed to serialize task payload").with_source(e))?;
        let url = format!(
            "{}?Action={SUBMIT_ACTION}&Version={API_VERSION}",
            self.endpoint
        );

        let (mut parts, _) = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .body(())?
            .into_parts();
        self.signer.sign(&mut parts, &body).await?;

        let req = http::Request::from_parts(parts, Bytes::from(body));
        let resp = self.ctx.http_send(req).await?;
        if !resp.status().is_success() {
            return Err(Error::submit_failed(format!(
                "job creation returned {}",
                resp.status()
            )));
        }

        let payload: SubmitResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::submit_failed("malformed job creation response").with_source(e))?;

        if let Some(task_id) = payload.task_id {
            debug!("job accepted as task {task_id}");
            return Ok(TaskHandle::Pending(task_id));
        }
        if let Some(url) = payload.video_url {
            debug!("job resolved synchronously");
            return Ok(TaskHandle::Resolved(TaskArtifact::Url(url)));
        }
        if let Some(id) = payload.subject_id {
            debug!("job resolved synchronously with subject {id}");
            return Ok(TaskHandle::Resolved(TaskArtifact::Id(id)));
        }

        Err(Error::submit_failed(
            "job creation response carried neither a task id nor a result",
        ))
    }

    /// Drive a handle to its terminal outcome.
    pub async fn wait(
        &self,
        task: &TaskRequest,
        handle: TaskHandle,
        poller: &Poller,
    ) -> Result<PollOutcome> {
        match handle {
            TaskHandle::Resolved(artifact) => Ok(PollOutcome::Succeeded(artifact)),
            TaskHandle::Pending(task_id) => {
                let probe =
                    StatusProbe::new(self.signer.clone(), &self.endpoint, task, &task_id)?;
                Ok(poller
                    .wait(&self.ctx, TaskHandle::Pending(task_id), &probe)
                    .await)
            }
        }
    }

    /// Submit, poll and download in one call.
    ///
    /// The outcome is the two-valued public boundary: an artifact (or
    /// confirmation id) on success, a failure description otherwise. Only
    /// errors raised before any network call propagate as `Err`.
    pub async fn run(
        &self,
        task: &TaskRequest,
        poller: &Poller,
        dest: &Path,
    ) -> Result<JobOutcome> {
        let handle = match self.submit(task).await {
            Ok(handle) => handle,
            Err(err) if is_pre_network(err.kind()) => return Err(err),
            Err(err) => return Ok(JobOutcome::Failed(err.to_string())),
        };

        match self.wait(task, handle, poller).await? {
            PollOutcome::Succeeded(TaskArtifact::Url(url)) => {
                match download_artifact(&self.ctx, &url, dest).await {
                    Ok(bytes) => Ok(JobOutcome::Downloaded {
                        path: dest.to_path_buf(),
                        bytes,
                    }),
                    Err(err) => Ok(JobOutcome::Failed(err.to_string())),
                }
            }
            PollOutcome::Succeeded(artifact) => Ok(JobOutcome::Completed(artifact)),
            PollOutcome::Failed { reason } => Ok(JobOutcome::Failed(
                reason.unwrap_or_else(|| "task failed without diagnostics".to_string()),
            )),
            PollOutcome::TimedOut { attempts } => Ok(JobOutcome::Failed(format!(
                "no terminal status after {attempts} attempts"
            ))),
            PollOutcome::Cancelled => Ok(JobOutcome::Failed("cancelled before completion".to_string())),
        }
    }
}

fn is_pre_network(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConfigInvalid | ErrorKind::CredentialInvalid | ErrorKind::RequestInvalid
    )
}

#[derive(Deserialize)]
struct SubmitResponse {
    task_id: Option<String>,
    video_url: Option<String>,
    subject_id: Option<String>,
}
