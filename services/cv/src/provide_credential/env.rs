use crate::{constants::*, Credential};
use async_trait::async_trait;
use vidgen_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the access key pair from environment variables.
///
/// This provider looks for the following environment variables:
/// - [`VOLC_ACCESS_KEY_ID`]: the access key id
/// - [`VOLC_SECRET_ACCESS_KEY`]: the secret access key
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
        let envs = ctx.env_vars();

        match (envs.get(VOLC_ACCESS_KEY_ID), envs.get(VOLC_SECRET_ACCESS_KEY)) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.clone(),
                secret_access_key: sk.clone(),
            })),
            _ => Ok(None),
        }
    }
}
