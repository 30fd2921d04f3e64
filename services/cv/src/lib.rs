//! Signed visual generation service family.
//!
//! This crate drives the keyed-hash-protected job API: every call is
//! authenticated with a signature derived from an access key pair, a
//! signing scope and the exact request bytes. It covers role
//! identification and avatar video generation jobs.

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    KeyFileCredentialProvider, StaticCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;

mod task;
pub use task::TaskRequest;

mod probe;
pub use probe::StatusProbe;

mod client;
pub use client::Client;

pub mod constants;
