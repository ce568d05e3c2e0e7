#![forbid(unsafe_code)]
//! sociogram-core library.
//!
//! Shared vocabulary for the analysis engine: the student and response
//! model, the provider traits through which roster and survey data are
//! injected, error types, and the TOML-backed analysis configuration.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library failures; `anyhow::Result`
//!   where a caller only needs context (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cancel;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use cancel::CancellationFlag;
pub use config::AnalysisConfig;
pub use error::{AnalysisError, DataWarning, FetchError};
pub use model::{Answer, Nomination, ResponseRecord, Student};
pub use provider::{ClassScope, ResponseProvider, RosterProvider, SnapshotStore};
