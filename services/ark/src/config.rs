use std::fmt::{Debug, Formatter};

use crate::constants::*;
use vidgen_core::utils::Redact;
use vidgen_core::Context;

/// Config carries all the configuration for the token service family.
#[derive(Clone, Default)]
pub struct Config {
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ARK_API_KEY`]
    pub api_key: Option<String>,
    /// Path of a file holding the API key.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ARK_API_KEY_FILE`]
    pub api_key_file: Option<String>,
    /// API endpoint, defaults to [`DEFAULT_ENDPOINT`].
    pub endpoint: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set api_key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set api_key_file
    pub fn with_api_key_file(mut self, api_key_file: impl Into<String>) -> Self {
        self.api_key_file = Some(api_key_file.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ARK_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ARK_API_KEY_FILE) {
            self.api_key_file.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(Redact::from))
            .field("api_key_file", &self.api_key_file)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
