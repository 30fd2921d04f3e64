use crate::{Config, Credential};
use async_trait::async_trait;
use std::sync::Arc;
use vidgen_core::{Context, ProvideCredential, Result};

/// ConfigCredentialProvider loads the API key from an explicit [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(self.config.api_key.as_ref().map(|api_key| Credential {
            api_key: api_key.clone(),
        }))
    }
}
