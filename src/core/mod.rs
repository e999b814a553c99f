//! Core components of the `finance-rs` client.
//!
//! This module contains the request/response pipeline:
//! - The main [`FinanceClient`] and its builder.
//! - The backend registry and the HTTP call executor.
//! - The crumb handshake used by the Yahoo backend.
//! - The primary [`FinanceError`] type.

/// Backend trait, identifiers and the HTTP call executor.
pub mod backend;
/// The main client (`FinanceClient`), builder, and configuration.
pub mod client;
/// The primary error type (`FinanceError`) for the crate.
pub mod error;
/// Verbosity levels for diagnostic output.
pub mod log;
pub(crate) mod net;
/// Backend registry.
pub mod registry;
/// Query parameters and per-call context.
pub mod request;

// convenient re-exports so most code can just `use crate::core::FinanceClient`
pub use backend::{Backend, BackendConfiguration, BackendExt, SupportedBackend};
pub use client::constants::{DEFAULT_HTTP_TIMEOUT, OPTIONS_PREFIX, QUOTE_PATH};
pub use client::{FinanceClient, FinanceClientBuilder, Session};
pub use error::{FinanceError, RemoteError};
pub use log::LogLevel;
pub use registry::Backends;
pub use request::{CallContext, Params};
