use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_ENDPOINT, TASKS_PATH};
use crate::{Config, DefaultCredentialProvider, RequestSigner, StatusProbe, TaskRequest};
use bytes::Bytes;
use http::{header, HeaderValue, Method};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use vidgen_core::{
    download_artifact, Context, Error, ErrorKind, JobOutcome, PollOutcome, Poller, Result,
    Signer, TaskArtifact, TaskHandle,
};

/// Client for the token-authenticated content generation service.
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

        let config = Arc::new(config);
        let signer = Signer::new(
            ctx.clone(),
            DefaultCredentialProvider::new(config),
            RequestSigner::new(),
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
    /// The token family always answers with a task identifier; a 2xx
    /// response without one is a submission failure. Submission is never
    /// retried here; resubmission is the caller's decision.
    pub async fn submit(&self, task: &TaskRequest) -> Result<TaskHandle> {
        let body = serde_json::to_vec(task)
            .map_err(|e| Error::unexpected("failed to serialize task payload").with_source(e))?;
        let url = format!("{}{TASKS_PATH}", self.endpoint);

        let (mut parts, _) = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .body(())?
            .into_parts();
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        );
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

        match payload.id {
            Some(id) => {
                debug!("job accepted as task {id}");
                Ok(TaskHandle::Pending(id))
            }
            None => Err(Error::submit_failed(
                "job creation response carried no task id",
            )),
        }
    }

    /// Drive a handle to its terminal outcome.
    pub async fn wait(&self, handle: TaskHandle, poller: &Poller) -> Result<PollOutcome> {
        match handle {
            TaskHandle::Resolved(artifact) => Ok(PollOutcome::Succeeded(artifact)),
            TaskHandle::Pending(task_id) => {
                let probe = StatusProbe::new(self.signer.clone(), &self.endpoint, &task_id);
                Ok(poller
                    .wait(&self.ctx, TaskHandle::Pending(task_id), &probe)
                    .await)
            }
        }
    }

    /// Submit, poll and download in one call.
    ///
    /// The outcome is the two-valued public boundary: an artifact on
    /// success, a failure description otherwise. Only errors raised before
    /// any network call propagate as `Err`.
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

        match self.wait(handle, poller).await? {
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
    id: Option<String>,
}
