//! Backends and the call executor.
//!
//! A [`Backend`] turns a path plus query parameters into a raw response body. The
//! stock implementation, [`BackendConfiguration`], talks HTTP through the shared
//! [`Session`]; tests can register their own implementation on the client.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use url::{Position, Url};

use crate::core::client::Session;
use crate::core::log::log_at;
use crate::core::request::{join_path, with_query};
use crate::core::{CallContext, FinanceError, Params, RemoteError, net};

/// The remote services this client knows how to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupportedBackend {
    /// Yahoo Finance query API. Requires a crumb on every call.
    Yahoo,
    /// Alternate uploads backend. Ships without a base URL and resolves to `None`
    /// until one is configured, unlike the Go client, which hands back a
    /// configuration with an empty URL for it.
    Bats,
}

impl SupportedBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Bats => "bats",
        }
    }

    /// Whether calls to this backend carry a `crumb` query parameter.
    pub fn requires_crumb(self) -> bool {
        matches!(self, Self::Yahoo)
    }
}

impl fmt::Display for SupportedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedBackend {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yahoo" => Ok(Self::Yahoo),
            "bats" => Ok(Self::Bats),
            other => Err(FinanceError::UnknownBackend(other.to_string())),
        }
    }
}

/// Something that can answer a GET against an API service.
///
/// Exists so tests can swap in a double via
/// [`FinanceClient::set_backend`](crate::FinanceClient::set_backend).
pub trait Backend: Send + Sync {
    /// Issue a GET for `path` with optional query `params` and return the raw body.
    ///
    /// Fails with [`FinanceError::Remote`] when the service answers with a status of
    /// 400 or above.
    fn call<'a>(
        &'a self,
        path: &'a str,
        params: Option<&'a Params>,
        ctx: Option<&'a CallContext>,
    ) -> BoxFuture<'a, Result<String, FinanceError>>;
}

/// JSON decoding on top of any [`Backend`].
pub trait BackendExt: Backend {
    /// Like [`Backend::call`], decoding a successful body into `T`.
    ///
    /// Decode failures are returned unchanged as [`FinanceError::Decode`].
    fn call_json<'a, T>(
        &'a self,
        path: &'a str,
        params: Option<&'a Params>,
        ctx: Option<&'a CallContext>,
    ) -> BoxFuture<'a, Result<T, FinanceError>>
    where
        T: DeserializeOwned + Send + 'a,
    {
        Box::pin(async move {
            let body = self.call(path, params, ctx).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }
}

impl<B: Backend + ?Sized> BackendExt for B {}

/// The HTTP implementation of [`Backend`]: a base URL bound to the shared session.
#[derive(Debug, Clone)]
pub struct BackendConfiguration {
    kind: SupportedBackend,
    url: Url,
    session: Arc<Session>,
}

impl BackendConfiguration {
    pub(crate) fn new(kind: SupportedBackend, url: Url, session: Arc<Session>) -> Self {
        Self { kind, url, session }
    }

    pub fn kind(&self) -> SupportedBackend {
        self.kind
    }

    pub fn base_url(&self) -> &Url {
        &self.url
    }

    /// Build a request for `path` under this backend's base URL.
    ///
    /// A missing leading `/` is added. The request is bound to the tighter of the
    /// context's timeout and the client-wide one.
    pub fn new_request(
        &self,
        method: &str,
        path: &str,
        ctx: Option<&CallContext>,
    ) -> Result<Request, FinanceError> {
        let built = Method::from_bytes(method.as_bytes())
            .map_err(|e| format!("invalid method {method:?}: {e}"))
            .and_then(|m| {
                let full = join_path(&self.url, path);
                Url::parse(&full)
                    .map(|u| (m, u))
                    .map_err(|e| format!("invalid url {full:?}: {e}"))
            });

        let (method, url) = match built {
            Ok(v) => v,
            Err(msg) => {
                log_at!(self.session, Errors, error, "Cannot create api request: {msg}");
                return Err(FinanceError::Request(msg));
            }
        };

        let mut req = Request::new(method, url);
        // A request timeout replaces the client's, so keep the smaller of the two.
        let limit = match (ctx.and_then(CallContext::timeout), self.session.timeout()) {
            (Some(call), Some(client)) => Some(call.min(client)),
            (call, client) => call.or(client),
        };
        if let Some(t) = limit {
            *req.timeout_mut() = Some(t);
        }
        Ok(req)
    }

    /// Execute a prepared request and return the body of a successful response.
    ///
    /// For crumb backends a crumb is fetched on first use and appended to the query.
    /// When the session allows it, a 401/403 drops the cached crumb and the request is
    /// sent once more with a fresh one.
    pub async fn execute(
        &self,
        req: Request,
        ctx: Option<&CallContext>,
    ) -> Result<String, FinanceError> {
        let retry = if self.kind.requires_crumb() && self.session.refresh_crumb_on_auth_failure()
        {
            req.try_clone()
        } else {
            None
        };

        match (self.execute_once(req, ctx).await, retry) {
            (Err(FinanceError::Remote(e)), Some(req)) if e.is_auth_failure() => {
                log_at!(
                    self.session,
                    Info,
                    info,
                    "Crumb rejected with status {}, refreshing",
                    e.status_code
                );
                self.session.clear_crumb().await;
                self.execute_once(req, ctx).await
            }
            (result, _) => result,
        }
    }

    async fn execute_once(
        &self,
        mut req: Request,
        ctx: Option<&CallContext>,
    ) -> Result<String, FinanceError> {
        let session = &self.session;
        log_at!(
            session,
            Info,
            info,
            "Requesting {} {}{}",
            req.method(),
            &req.url()[Position::BeforeHost..Position::AfterPort],
            req.url().path()
        );

        let start = Instant::now();

        if self.kind.requires_crumb() {
            let crumb = session
                .ensure_crumb()
                .await
                .map_err(|e| FinanceError::Token(Box::new(e)))?;
            req.url_mut().query_pairs_mut().append_pair("crumb", &crumb);
        }

        let sent = net::send(session.http(), req, ctx).await;

        log_at!(session, Debug, debug, "Completed in {:?}", start.elapsed());

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                log_at!(session, Errors, error, "Request to api failed: {e}");
                return Err(e);
            }
        };

        let status = resp.status().as_u16();
        let body = match net::get_text(resp, ctx).await {
            Ok(body) => body,
            Err(e) => {
                log_at!(session, Errors, error, "Cannot parse response: {e}");
                return Err(e);
            }
        };

        if status >= 400 {
            log_at!(session, Errors, error, "API error: {body:?}");
            return Err(RemoteError::upstream(status, body).into());
        }

        log_at!(session, Debug, debug, "API response: {body:?}");
        Ok(body)
    }
}

impl Backend for BackendConfiguration {
    fn call<'a>(
        &'a self,
        path: &'a str,
        params: Option<&'a Params>,
        ctx: Option<&'a CallContext>,
    ) -> BoxFuture<'a, Result<String, FinanceError>> {
        Box::pin(async move {
            let path = with_query(path, params);
            let req = self.new_request("GET", &path, ctx)?;
            self.execute(req, ctx).await
        })
    }
}
