//! Request-side building blocks: query parameters, per-call context and URL joining.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::{Url, form_urlencoded};

/// Ordered query parameters, encoded as `application/x-www-form-urlencoded`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair. Repeated keys are kept in order.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Builder-style variant of [`Params::add`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a query string (without the leading `?`).
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-call cancellation and deadline.
///
/// A timeout set here replaces the client-wide default for this one call. When a
/// cancellation token is present the call races it and fails with
/// [`FinanceError::Cancelled`](crate::FinanceError::Cancelled) as soon as it fires.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }
}

/// Append `path` to `base`, inserting exactly one `/` between them.
pub(crate) fn join_path(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Append encoded params to `path` when there are any.
pub(crate) fn with_query(path: &str, params: Option<&Params>) -> String {
    match params {
        Some(p) if !p.is_empty() => format!("{path}?{}", p.encode()),
        _ => path.to_string(),
    }
}
