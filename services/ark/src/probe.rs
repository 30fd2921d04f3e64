use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use serde::Deserialize;
use vidgen_core::{
    Context, Error, QueryStatus, Result, Signer, StatusReport, TaskArtifact, TaskStatus,
};

use crate::constants::TASKS_PATH;
use crate::Credential;

/// Status probe for the token service family.
///
/// Every observation is a bearer-authenticated `GET` on the task resource.
#[derive(Debug)]
pub struct StatusProbe {
    signer: Signer<Credential>,
    url: String,
}

impl StatusProbe {
    /// Create a probe for one pending task.
    pub fn new(signer: Signer<Credential>, endpoint: &str, task_id: &str) -> Self {
        Self {
            signer,
            url: format!("{endpoint}{TASKS_PATH}/{task_id}"),
        }
    }
}

#[async_trait]
impl QueryStatus for StatusProbe {
    async fn query_status(&self, ctx: &Context) -> Result<StatusReport> {
        let (mut parts, _) = http::Request::builder()
            .method(Method::GET)
            .uri(&self.url)
            .body(())?
            .into_parts();

        self.signer.sign(&mut parts, b"").await?;
        let req = http::Request::from_parts(parts, Bytes::new());

        let resp = ctx.http_send(req).await?;
        if !resp.status().is_success() {
            return Err(Error::unexpected(format!(
                "status request returned {}",
                resp.status()
            )));
        }

        let payload: QueryResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("malformed status response").with_source(e))?;
        let raw = payload.status.unwrap_or_else(|| "missing".to_string());

        let mut report = match map_status(&raw) {
            TaskStatus::Succeeded => {
                match payload.content.unwrap_or_default().video_url {
                    Some(url) => StatusReport::new(TaskStatus::Succeeded, raw)
                        .with_artifact(TaskArtifact::Url(url)),
                    None => StatusReport::new(TaskStatus::Failed, raw)
                        .with_failure("completed response carried no video url"),
                }
            }
            TaskStatus::Failed => {
                let reason = payload
                    .failure_reason
                    .or_else(|| payload.error.map(|e| e.to_string()));
                match reason {
                    Some(reason) => {
                        StatusReport::new(TaskStatus::Failed, raw).with_failure(reason)
                    }
                    None => StatusReport::new(TaskStatus::Failed, raw),
                }
            }
            status => StatusReport::new(status, raw),
        };

        if let Some(progress) = payload.progress {
            report = report.with_progress(progress);
        }

        Ok(report)
    }
}

/// Map the service vocabulary onto the closed status set.
fn map_status(raw: &str) -> TaskStatus {
    match raw {
        "queued" | "pending" | "in_queue" => TaskStatus::Queued,
        "running" | "processing" => TaskStatus::Running,
        "succeeded" => TaskStatus::Succeeded,
        "failed" => TaskStatus::Failed,
        _ => TaskStatus::Unknown,
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    status: Option<String>,
    progress: Option<u8>,
    content: Option<QueryContent>,
    error: Option<serde_json::Value>,
    failure_reason: Option<String>,
}

#[derive(Default, Deserialize)]
struct QueryContent {
    video_url: Option<String>,
}
