use vidgen_core::{Context, OsEnv};
use vidgen_file_read_tokio::TokioFileRead;
use vidgen_http_send_reqwest::ReqwestHttpSend;

/// Create a context with the default implementations: Tokio file reading,
/// a reqwest HTTP client and OS environment access.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
