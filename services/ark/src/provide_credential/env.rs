use crate::{constants::ARK_API_KEY, Credential};
use async_trait::async_trait;
use vidgen_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the API key from the [`ARK_API_KEY`]
/// environment variable.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(ctx
            .env_var(ARK_API_KEY)
            .map(|api_key| Credential { api_key }))
    }
}
