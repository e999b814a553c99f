//! Centralized constants for default endpoints, browser headers and timeouts.

use std::time::Duration;

/// Desktop browser UA. Yahoo rejects the crumb handshake for non-browser clients.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/113.0.0.0 Safari/537.36"
);

/// `Accept` header sent with both handshake requests.
pub(crate) const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*";

/// Yahoo query API base.
pub(crate) const DEFAULT_YAHOO_URL: &str = "https://query2.finance.yahoo.com";

/// Public web root, hit first to prime session cookies.
pub(crate) const DEFAULT_COOKIE_URL: &str = "https://finance.yahoo.com/";

/// URL to fetch a crumb (requires cookies from `DEFAULT_COOKIE_URL`).
pub(crate) const DEFAULT_CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";

/// Applied to every request unless the caller supplies a tighter per-call timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(80);

/// Path of the v7 quote API, relative to the Yahoo backend.
pub const QUOTE_PATH: &str = "/v7/finance/quote";

/// Prefix of the v7 options API; the symbol is appended.
pub const OPTIONS_PREFIX: &str = "/v7/finance/options/";
