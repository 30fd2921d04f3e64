use crate::constants::{API_VERSION, RESULT_ACTION};
use crate::{Credential, TaskRequest};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use serde::{Deserialize, Serialize};
use vidgen_core::{
    Context, Error, QueryStatus, Result, Signer, StatusReport, TaskArtifact, TaskStatus,
};

/// Status probe for the signed service family.
///
/// Every observation is a signed POST carrying `{req_key, task_id}`; the
/// signature is rebuilt on each attempt so the timestamp bound into it
/// stays fresh across a long poll loop.
#[derive(Debug)]
pub struct StatusProbe {
    signer: Signer<Credential>,
    url: String,
    body: Bytes,
    task_id: String,
    role_task: bool,
}

impl StatusProbe {
    /// Create a probe for one pending task.
    pub fn new(
        signer: Signer<Credential>,
        endpoint: &str,
        task: &TaskRequest,
        task_id: &str,
    ) -> Result<Self> {
        let payload = PollPayload {
            req_key: &task.req_key,
            task_id,
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|e| Error::unexpected("failed to serialize status payload").with_source(e))?;

        Ok(Self {
            signer,
            url: format!("{endpoint}?Action={RESULT_ACTION}&Version={API_VERSION}"),
            body: Bytes::from(body),
            task_id: task_id.to_string(),
            role_task: task.is_role_task(),
        })
    }

    fn confirm_role(&self, raw: String, resp_data: Option<&str>) -> StatusReport {
        let confirmed = resp_data
            .and_then(|s| serde_json::from_str::<RoleConfirmation>(s).ok())
            .map(|c| c.status == 1)
            .unwrap_or(false);

        if confirmed {
            StatusReport::new(TaskStatus::Succeeded, raw)
                .with_artifact(TaskArtifact::Id(self.task_id.clone()))
        } else {
            StatusReport::new(TaskStatus::Failed, raw)
                .with_failure("no usable subject confirmed in role image")
        }
    }
}

#[async_trait]
impl QueryStatus for StatusProbe {
    async fn query_status(&self, ctx: &Context) -> Result<StatusReport> {
        let (mut parts, _) = http::Request::builder()
            .method(Method::POST)
            .uri(&self.url)
            .body(())?
            .into_parts();

        self.signer.sign(&mut parts, &self.body).await?;
        let req = http::Request::from_parts(parts, self.body.clone());

        let resp = ctx.http_send(req).await?;
        if !resp.status().is_success() {
            return Err(Error::unexpected(format!(
                "status request returned {}",
                resp.status()
            )));
        }

        let payload: QueryResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("malformed status response").with_source(e))?;
        let data = payload.data.unwrap_or_default();
        let raw = data.status.unwrap_or_else(|| "missing".to_string());

        let report = match map_status(&raw) {
            TaskStatus::Succeeded if self.role_task => {
                self.confirm_role(raw, data.resp_data.as_deref())
            }
            TaskStatus::Succeeded => match data.video_url {
                Some(url) => StatusReport::new(TaskStatus::Succeeded, raw)
                    .with_artifact(TaskArtifact::Url(url)),
                None => StatusReport::new(TaskStatus::Failed, raw)
                    .with_failure("completed response carried no video url"),
            },
            status => StatusReport::new(status, raw),
        };

        Ok(report)
    }
}

/// Map the service vocabulary onto the closed status set.
fn map_status(raw: &str) -> TaskStatus {
    match raw {
        "in_queue" => TaskStatus::Queued,
        "generating" => TaskStatus::Running,
        "done" => TaskStatus::Succeeded,
        "failed" => TaskStatus::Failed,
        _ => TaskStatus::Unknown,
    }
}

#[derive(Serialize)]
struct PollPayload<'a> {
    req_key: &'a str,
    task_id: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
}

#[derive(Default, Deserialize)]
struct QueryData {
    status: Option<String>,
    video_url: Option<String>,
    resp_data: Option<String>,
}

#[derive(Deserialize)]
struct RoleConfirmation {
    status: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_vocabulary() {
        assert_eq!(map_status("in_queue"), TaskStatus::Queued);
        assert_eq!(map_status("generating"), TaskStatus::Running);
        assert_eq!(map_status("done"), TaskStatus::Succeeded);
        assert_eq!(map_status("failed"), TaskStatus::Failed);
        assert_eq!(map_status("defrosting"), TaskStatus::Unknown);
    }
}
