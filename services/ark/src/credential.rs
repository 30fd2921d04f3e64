use std::fmt::{Debug, Formatter};
use vidgen_core::utils::Redact;
use vidgen_core::SigningCredential;

/// Credential that holds the API key for the token service family.
#[derive(Default, Clone)]
pub struct Credential {
    /// API key attached as a bearer token.
    pub api_key: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty()
    }
}
