//! Token-authenticated content generation service family.
//!
//! This crate drives the bearer-token job API: submission and polling carry
//! a static `Authorization: Bearer …` header instead of a derived
//! signature. It covers image-to-video generation jobs built from a text
//! prompt plus one or two frame images.

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    ApiKeyFileCredentialProvider, ConfigCredentialProvider, DefaultCredentialProvider,
    EnvCredentialProvider, StaticCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;

mod task;
pub use task::{ContentPart, ImageUrl, RenderOptions, TaskRequest};

mod probe;
pub use probe::StatusProbe;

mod client;
pub use client::Client;

pub mod constants;
