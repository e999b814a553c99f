//! Public client surface + builder.
//! Internals are split into `auth` (cookie/crumb) and `constants` (UA + defaults).

mod auth;
pub(crate) mod constants;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::core::{
    Backend, Backends, CallContext, FinanceError, LogLevel, Params, SupportedBackend,
};
use constants::{
    DEFAULT_COOKIE_URL, DEFAULT_CRUMB_URL, DEFAULT_HTTP_TIMEOUT, DEFAULT_YAHOO_URL, USER_AGENT,
};

/// State shared by every backend of one client: the HTTP client with its cookie
/// jar, the cached crumb and the log level.
#[derive(Debug)]
pub struct Session {
    http: Client,
    cookie_url: Url,
    crumb_url: Url,
    log_level: AtomicU8,
    refresh_crumb_on_auth_failure: bool,
    /// Upper bound on every call; per-call deadlines can only tighten it.
    timeout: Option<Duration>,

    crumb: RwLock<Option<String>>,
    crumb_fetch_lock: Mutex<()>,
}

impl Session {
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn log_level(&self) -> LogLevel {
        LogLevel::from(self.log_level.load(Ordering::Relaxed))
    }

    pub(crate) fn refresh_crumb_on_auth_failure(&self) -> bool {
        self.refresh_crumb_on_auth_failure
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Entry point: owns the session and the backend registry.
///
/// Cloning is cheap and clones share the cookie jar, crumb and backends.
#[derive(Debug, Clone)]
pub struct FinanceClient {
    session: Arc<Session>,
    backends: Arc<Backends>,
}

impl Default for FinanceClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl FinanceClient {
    /// Create a new builder.
    pub fn builder() -> FinanceClientBuilder {
        FinanceClientBuilder::default()
    }

    /// Resolve a backend, creating its default configuration on first use.
    ///
    /// Returns `None` when no base URL is known for `kind`.
    pub async fn backend(&self, kind: SupportedBackend) -> Option<Arc<dyn Backend>> {
        self.backends.resolve(kind).await
    }

    /// Replace the backend for `kind`, e.g. with a test double.
    pub async fn set_backend(&self, kind: SupportedBackend, backend: Arc<dyn Backend>) {
        self.backends.set(kind, backend).await;
    }

    /// Registry access for callers that address backends by name.
    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// GET `path` on `kind` and decode the JSON body into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        kind: SupportedBackend,
        path: &str,
        params: Option<&Params>,
        ctx: Option<&CallContext>,
    ) -> Result<T, FinanceError> {
        let body = self.execute(kind, path, params, ctx).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `path` on `kind` and return the raw body without decoding it.
    pub async fn execute(
        &self,
        kind: SupportedBackend,
        path: &str,
        params: Option<&Params>,
        ctx: Option<&CallContext>,
    ) -> Result<String, FinanceError> {
        let backend = self
            .backend(kind)
            .await
            .ok_or_else(|| FinanceError::UnknownBackend(kind.to_string()))?;
        backend.call(path, params, ctx).await
    }

    pub fn log_level(&self) -> LogLevel {
        self.session.log_level()
    }

    /// Change verbosity for this client and all of its clones.
    pub fn set_log_level(&self, level: LogLevel) {
        self.session
            .log_level
            .store(u8::from(level), Ordering::Relaxed);
    }

    /// The cached crumb, if the handshake has run.
    pub async fn crumb(&self) -> Option<String> {
        self.session.crumb().await
    }

    /// Drop the cached crumb so the next Yahoo call performs a fresh handshake.
    pub async fn invalidate_crumb(&self) {
        self.session.clear_crumb().await;
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct FinanceClientBuilder {
    http: Option<Client>,
    user_agent: Option<String>,
    base_urls: HashMap<SupportedBackend, Url>,
    cookie_url: Option<Url>,
    crumb_url: Option<Url>,
    crumb: Option<String>,

    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    log_level: LogLevel,
    refresh_crumb_on_auth_failure: Option<bool>,
}

impl FinanceClientBuilder {
    /// Use a caller-provided HTTP client instead of building one.
    ///
    /// The crumb handshake relies on cookies, so the client should have a cookie store
    /// enabled. `user_agent` and `connect_timeout` are ignored when this is set; `timeout`
    /// still caps per-call deadlines.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the base URL of a backend (e.g., `https://query2.finance.yahoo.com`).
    ///
    /// This is also how the `Bats` backend is enabled.
    pub fn base_url(mut self, kind: SupportedBackend, url: Url) -> Self {
        self.base_urls.insert(kind, url);
        self
    }

    /// Override the cookie bootstrap URL.
    pub fn cookie_url(mut self, url: Url) -> Self {
        self.cookie_url = Some(url);
        self
    }

    /// Override the crumb URL.
    pub fn crumb_url(mut self, url: Url) -> Self {
        self.crumb_url = Some(url);
        self
    }

    /// Start with a known crumb and skip the first handshake.
    pub fn crumb(mut self, crumb: impl Into<String>) -> Self {
        self.crumb = Some(crumb.into());
        self
    }

    /// Set a global request timeout (overall). Default: 80 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Set the verbosity of diagnostic output. Default: silent.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Whether a 401/403 from Yahoo drops the cached crumb and retries once.
    /// Default: true.
    pub fn refresh_crumb_on_auth_failure(mut self, enabled: bool) -> Self {
        self.refresh_crumb_on_auth_failure = Some(enabled);
        self
    }

    pub fn build(self) -> Result<FinanceClient, FinanceError> {
        let mut base_urls = HashMap::new();
        base_urls.insert(SupportedBackend::Yahoo, Url::parse(DEFAULT_YAHOO_URL)?);
        base_urls.extend(self.base_urls);

        let cookie_url = self.cookie_url.unwrap_or(Url::parse(DEFAULT_COOKIE_URL)?);
        let crumb_url = self.crumb_url.unwrap_or(Url::parse(DEFAULT_CRUMB_URL)?);

        let (http, timeout) = match self.http {
            Some(client) => (client, self.timeout),
            None => {
                let timeout = self.timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);
                let mut httpb = reqwest::Client::builder()
                    .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
                    .cookie_store(true)
                    .timeout(timeout);

                if let Some(ct) = self.connect_timeout {
                    httpb = httpb.connect_timeout(ct);
                }
                (httpb.build()?, Some(timeout))
            }
        };

        let session = Arc::new(Session {
            http,
            cookie_url,
            crumb_url,
            log_level: AtomicU8::new(u8::from(self.log_level)),
            refresh_crumb_on_auth_failure: self.refresh_crumb_on_auth_failure.unwrap_or(true),
            timeout,
            crumb: RwLock::new(self.crumb.filter(|c| !c.is_empty())),
            crumb_fetch_lock: Mutex::new(()),
        });

        Ok(FinanceClient {
            backends: Arc::new(Backends::new(Arc::clone(&session), base_urls)),
            session,
        })
    }
}
