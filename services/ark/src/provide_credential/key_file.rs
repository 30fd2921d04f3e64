use crate::constants::ARK_API_KEY_FILE;
use crate::{Config, Credential};
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use vidgen_core::{Context, ProvideCredential, Result};

/// ApiKeyFileCredentialProvider loads the API key from a file.
///
/// The whole file is the key; surrounding whitespace is trimmed. The path
/// comes from the config or the [`ARK_API_KEY_FILE`] environment variable,
/// `~` expands to the home dir.
#[derive(Debug, Clone)]
pub struct ApiKeyFileCredentialProvider {
    config: Arc<Config>,
}

impl ApiKeyFileCredentialProvider {
    /// Create a new ApiKeyFileCredentialProvider.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ApiKeyFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let path = self
            .config
            .api_key_file
            .clone()
            .or_else(|| ctx.env_var(ARK_API_KEY_FILE));
        let Some(path) = path else {
            return Ok(None);
        };
        let Some(path) = ctx.expand_home_dir(&path) else {
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                warn!("api key file {path} is not readable: {err}");
                return Ok(None);
            }
        };

        let api_key = content.trim();
        if api_key.is_empty() {
            return Ok(None);
        }

        Ok(Some(Credential {
            api_key: api_key.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidgen_file_read_tokio::TokioFileRead;

    #[tokio::test]
    async fn test_api_key_file_credential_provider() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("api_key.txt");
        std::fs::write(&path, "test-api-key\n")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let config = Config::new().with_api_key_file(path.to_str().expect("path must be utf-8"));
        let provider = ApiKeyFileCredentialProvider::new(Arc::new(config));

        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("must load credential");
        assert_eq!(cred.api_key, "test-api-key");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_api_key_file_yields_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("api_key.txt");
        std::fs::write(&path, "\n")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let config = Config::new().with_api_key_file(path.to_str().expect("path must be utf-8"));
        let provider = ApiKeyFileCredentialProvider::new(Arc::new(config));

        assert!(provider.provide_credential(&ctx).await?.is_none());

        Ok(())
    }
}
