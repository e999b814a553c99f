//! Lazily populated map from backend identifier to its implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use url::Url;

use crate::core::client::Session;
use crate::core::{Backend, BackendConfiguration, SupportedBackend};

/// Holds at most one backend per identifier for the lifetime of a client.
pub struct Backends {
    session: Arc<Session>,
    base_urls: HashMap<SupportedBackend, Url>,
    entries: RwLock<HashMap<SupportedBackend, Arc<dyn Backend>>>,
}

impl Backends {
    pub(crate) fn new(session: Arc<Session>, base_urls: HashMap<SupportedBackend, Url>) -> Self {
        Self {
            session,
            base_urls,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the backend for `kind`, building the default HTTP configuration on
    /// first access. `None` if no base URL is known for `kind`.
    pub async fn resolve(&self, kind: SupportedBackend) -> Option<Arc<dyn Backend>> {
        if let Some(b) = self.entries.read().await.get(&kind) {
            return Some(Arc::clone(b));
        }

        let mut entries = self.entries.write().await;
        // Another task may have won the race for the write lock.
        if let Some(b) = entries.get(&kind) {
            return Some(Arc::clone(b));
        }

        let url = self.base_urls.get(&kind)?.clone();
        let backend: Arc<dyn Backend> = Arc::new(BackendConfiguration::new(
            kind,
            url,
            Arc::clone(&self.session),
        ));
        entries.insert(kind, Arc::clone(&backend));
        Some(backend)
    }

    /// Resolve by identifier string (`"yahoo"`, `"bats"`). Unrecognized names yield `None`.
    pub async fn resolve_name(&self, name: &str) -> Option<Arc<dyn Backend>> {
        let kind = name.parse().ok()?;
        self.resolve(kind).await
    }

    /// Replace the backend for `kind` unconditionally. Last writer wins.
    pub async fn set(&self, kind: SupportedBackend, backend: Arc<dyn Backend>) {
        self.entries.write().await.insert(kind, backend);
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends")
            .field("base_urls", &self.base_urls)
            .finish_non_exhaustive()
    }
}
