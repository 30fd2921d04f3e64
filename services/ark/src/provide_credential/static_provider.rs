use crate::Credential;
use async_trait::async_trait;
use vidgen_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed API key.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    api_key: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with the given API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential {
            api_key: self.api_key.clone(),
        }))
    }
}
