use crate::constants::{KEY_FILE_ACCESS_KEY, KEY_FILE_SECRET_KEY, VOLC_KEY_FILE};
use crate::{Config, Credential};
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use vidgen_core::{hash, Context, ProvideCredential, Result};

/// KeyFileCredentialProvider loads the access key pair from a key file.
///
/// The file carries one value per line:
///
/// ```text
/// AccessKeyId: AKLTxxxx
/// SecretAccessKey: <base64 of the secret, or the raw secret>
/// ```
///
/// Secrets are usually stored base64 encoded; values that do not decode to
/// valid UTF-8 are used verbatim. The file path comes from the config or
/// the [`VOLC_KEY_FILE`] environment variable, `~` expands to the home dir.
#[derive(Debug, Clone)]
pub struct KeyFileCredentialProvider {
    config: Arc<Config>,
}

impl KeyFileCredentialProvider {
    /// Create a new KeyFileCredentialProvider.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for KeyFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let path = self
            .config
            .key_file
            .clone()
            .or_else(|| ctx.env_var(VOLC_KEY_FILE));
        let Some(path) = path else {
            return Ok(None);
        };
        let Some(path) = ctx.expand_home_dir(&path) else {
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                warn!("key file {path} is not readable: {err}");
                return Ok(None);
            }
        };

        Ok(parse_key_file(&content))
    }
}

fn parse_key_file(content: &str) -> Option<Credential> {
    let mut access_key_id = None;
    let mut secret_access_key = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix(KEY_FILE_ACCESS_KEY) {
            access_key_id = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix(KEY_FILE_SECRET_KEY) {
            let v = v.trim();
            let decoded = hash::base64_decode(v)
                .ok()
                .and_then(|bs| String::from_utf8(bs).ok());
            secret_access_key = Some(match decoded {
                Some(decoded) => decoded,
                None => v.to_string(),
            });
        }
    }

    match (access_key_id, secret_access_key) {
        (Some(access_key_id), Some(secret_access_key)) => Some(Credential {
            access_key_id,
            secret_access_key,
        }),
        _ => None,
    }
}
