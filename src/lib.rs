//! finance-rs: market-data client for Yahoo Finance.
//!
//! The crate covers the request/response core: backend selection, request
//! construction, the cookie/crumb handshake, response decoding and error surfacing.
//!
//! ```no_run
//! use finance_rs::{FinanceClient, Params, SupportedBackend, QUOTE_PATH};
//!
//! # async fn run() -> Result<(), finance_rs::FinanceError> {
//! let client = FinanceClient::default();
//! let params = Params::new().with("symbols", "AAPL");
//! let body: serde_json::Value = client
//!     .call(SupportedBackend::Yahoo, QUOTE_PATH, Some(&params), None)
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::{
    Backend, BackendConfiguration, BackendExt, Backends, CallContext, DEFAULT_HTTP_TIMEOUT,
    FinanceClient, FinanceClientBuilder, FinanceError, LogLevel, OPTIONS_PREFIX, Params,
    QUOTE_PATH, RemoteError, SupportedBackend,
};

// Re-exported so callers can build a `CallContext` without a direct dependency.
pub use tokio_util::sync::CancellationToken;
