use crate::provide_credential::{
    ApiKeyFileCredentialProvider, ConfigCredentialProvider, EnvCredentialProvider,
};
use crate::{Config, Credential};
use async_trait::async_trait;
use std::sync::Arc;
use vidgen_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider tries the default credential sources in order.
///
/// Resolution order:
///
/// 1. Explicit config values
/// 2. Environment variables
/// 3. API key file
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new(config: Arc<Config>) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config.clone()))
            .push(EnvCredentialProvider::new())
            .push(ApiKeyFileCredentialProvider::new(config));

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ARK_API_KEY;
    use std::collections::HashMap;
    use vidgen_core::StaticEnv;

    #[tokio::test]
    async fn test_config_takes_precedence_over_env() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([(ARK_API_KEY.to_string(), "env-api-key".to_string())]),
        });
        let provider =
            DefaultCredentialProvider::new(Arc::new(Config::new().with_api_key("config-api-key")));

        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed")
            .expect("must load credential");
        assert_eq!(cred.api_key, "config-api-key");
    }

    #[tokio::test]
    async fn test_default_provider_without_sources() {
        let ctx = Context::new().with_env(StaticEnv::default());
        let provider = DefaultCredentialProvider::new(Arc::new(Config::new()));

        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed");
        assert!(cred.is_none());
    }
}
