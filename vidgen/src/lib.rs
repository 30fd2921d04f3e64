//! Submit, track and fetch remote video generation jobs.
//!
//! This facade crate bundles the vidgen ecosystem: the shared kernel from
//! `vidgen-core`, one module per service family and an optional default
//! context wired with Tokio file reading and a reqwest HTTP client.
//!
//! - [`cv`]: the keyed-hash-signed visual generation family (role
//!   identification, avatar video).
//! - [`ark`]: the bearer-token content generation family (image-to-video).
//!
//! A typical flow builds a context, a service client and a poller, then
//! drives one job from submission to a downloaded artifact.

pub use vidgen_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

/// Signed visual generation service family.
#[cfg(feature = "cv")]
pub mod cv {
    pub use vidgen_cv::*;
}

/// Token-authenticated content generation service family.
#[cfg(feature = "ark")]
pub mod ark {
    pub use vidgen_ark::*;
}
