use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use vidgen_core::{Context, Error, Result, SignRequest};

/// RequestSigner that attaches the static bearer token.
///
/// The token family has no canonical request or derived key; the same
/// `Authorization` header authenticates every call. It still goes through
/// the [`SignRequest`] seam so submission and polling are wired identically
/// across service families.
#[derive(Debug, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new bearer token signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        parts: &mut Parts,
        _body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no credentials available for signing",
            ));
        };
        if cred.api_key.is_empty() {
            return Err(Error::credential_invalid("api key is empty"));
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", cred.api_key))?;
        authorization.set_sensitive(true);
        parts.headers.insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}
