use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// The request could not be constructed (bad method or malformed URL).
    #[error("Cannot create api request: {0}")]
    Request(String),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The crumb handshake failed. Wraps the underlying failure.
    #[error("get yahoo crumb err: {0}")]
    Token(#[source] Box<FinanceError>),

    /// The crumb endpoint answered with something that cannot be a crumb.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A network-level failure (DNS, connect, timeout) or a non-2xx handshake response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller's cancellation token fired before the call completed.
    #[error("request cancelled")]
    Cancelled,

    /// The upstream API answered with a status of 400 or above.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The response body was not valid JSON for the requested shape.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No backend is configured for the requested identifier.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
}

impl FinanceError {
    /// True for network-level failures, including cancellation and timeouts.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Cancelled)
    }

    /// The upstream error, if this failure came from an HTTP status of 400 or above.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }
}

/// An error response received from the upstream API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("status: {status_code}, detail: {msg}")]
pub struct RemoteError {
    /// Human readable summary.
    pub msg: String,
    /// The HTTP status code.
    pub status_code: u16,
    /// The raw response body, undecoded.
    pub body: String,
}

impl RemoteError {
    pub(crate) const UPSTREAM_MSG: &'static str = "error response received from upstream api";

    pub(crate) fn upstream(status_code: u16, body: String) -> Self {
        Self {
            msg: Self::UPSTREAM_MSG.to_string(),
            status_code,
            body,
        }
    }

    /// 401 and 403 are how Yahoo rejects a stale or missing crumb.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status_code, 401 | 403)
    }
}
