//! Reqwest-based HTTP implementation for vidgen.
//!
//! [`ReqwestHttpSend`] implements both the buffered `http_send` used for
//! submission and status calls, and the streaming `http_stream` used by the
//! artifact downloader, so large result files never sit in memory.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use vidgen_core::{BytesStream, Error, HttpSend, Result};

/// HttpSend implementation backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, req: http::Request<Bytes>) -> Result<reqwest::Response> {
        let req = reqwest::Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to build http request").with_source(e))?;
        self.client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send http request").with_source(e))
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let resp = self.execute(req).await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }

    async fn http_stream(&self, req: http::Request<Bytes>) -> Result<http::Response<BytesStream>> {
        let resp = self.execute(req).await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let stream = resp
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|e| {
                    Error::unexpected("failed to read response body").with_source(e)
                })
            })
            .boxed();

        let mut out = http::Response::new(stream);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidgen_core::Context;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_send() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri(format!("{}/ping", server.uri()))
            .body(Bytes::new())
            .expect("request must be valid");

        let resp = ctx.http_send(req).await.expect("send must succeed");
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.into_body(), Bytes::from_static(b"pong"));
    }

    #[tokio::test]
    async fn test_http_stream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artifact"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 32 * 1024]))
            .mount(&server)
            .await;

        let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri(format!("{}/artifact", server.uri()))
            .body(Bytes::new())
            .expect("request must be valid");

        let (parts, mut stream) = ctx
            .http_stream(req)
            .await
            .expect("send must succeed")
            .into_parts();
        assert_eq!(parts.status, http::StatusCode::OK);

        let mut total = 0usize;
        while let Some(chunk) = stream.next().await {
            total += chunk.expect("chunk must be ok").len();
        }
        assert_eq!(total, 32 * 1024);
    }
}
