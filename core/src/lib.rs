//! Core components for driving remote video generation jobs.
//!
//! This crate provides the foundational types and traits for the vidgen
//! ecosystem. It contains everything that is shared between service
//! families:
//!
//! - **Context**: a container holding implementations for file reading,
//!   HTTP sending and environment access. Service crates never talk to the
//!   network or the file system directly; they go through the context.
//! - **Signing**: the [`SignRequest`] trait plus the [`SigningRequest`]
//!   decomposition used to build byte-exact canonical requests, and the
//!   [`Signer`] orchestrator that pairs a credential provider with a
//!   request builder.
//! - **Task lifecycle**: [`TaskHandle`], [`TaskStatus`] and the [`Poller`]
//!   that tracks a remote job until a terminal status, cancellation or
//!   attempt-budget exhaustion.
//! - **Artifact retrieval**: [`download_artifact`] streams a result to disk
//!   without buffering it in memory.
//!
//! Service-specific request shapes, credentials and status vocabularies
//! live in the `vidgen-*` service crates; concrete I/O implementations live
//! in the context crates.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{BytesStream, Context, Env, FileRead, HttpSend, OsEnv, StaticEnv};
mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
mod task;
pub use task::{JobOutcome, QueryStatus, StatusReport, TaskArtifact, TaskHandle, TaskStatus};
mod poll;
pub use poll::{PollConfig, PollOutcome, Poller};
mod download;
pub use download::download_artifact;
