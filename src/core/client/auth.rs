//! Cookie & crumb acquisition for Yahoo endpoints.

use reqwest::Response;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use super::constants::{BROWSER_ACCEPT, USER_AGENT as BROWSER_USER_AGENT};
use crate::core::error::FinanceError;
use crate::core::log::log_at;

impl super::Session {
    /// Return the cached crumb, running the handshake first if there is none.
    pub(crate) async fn ensure_crumb(&self) -> Result<String, FinanceError> {
        // Fast path: check if a crumb exists with a read lock.
        if let Some(crumb) = self.crumb().await {
            return Ok(crumb);
        }

        // Slow path: only one task performs the handshake.
        let _guard = self.crumb_fetch_lock.lock().await;

        // Double-check: another task might have fetched it while this one was waiting.
        if let Some(crumb) = self.crumb().await {
            return Ok(crumb);
        }

        let crumb = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(crumb.clone());
        Ok(crumb)
    }

    pub(crate) async fn clear_crumb(&self) {
        *self.crumb.write().await = None;
    }

    pub(crate) async fn crumb(&self) -> Option<String> {
        self.crumb.read().await.clone()
    }

    async fn fetch_crumb(&self) -> Result<String, FinanceError> {
        log_at!(self, Info, info, "Fetching crumb from {}", self.crumb_url);

        // Prime the cookie jar; the page itself is of no use.
        let resp = self.browser_get(self.cookie_url.clone()).await?;
        resp.bytes().await?;

        let resp = self.browser_get(self.crumb_url.clone()).await?;
        let crumb = resp.text().await?;

        if crumb.is_empty() || crumb.contains('{') || crumb.contains('<') {
            return Err(FinanceError::Auth(format!("Received invalid crumb: {crumb}")));
        }
        Ok(crumb)
    }

    async fn browser_get(&self, url: Url) -> Result<Response, FinanceError> {
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;
        Ok(resp.error_for_status()?)
    }
}
