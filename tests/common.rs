#![allow(dead_code)]

use finance_rs::{FinanceClient, FinanceClientBuilder, SupportedBackend};
use httpmock::{Method::GET, Mock, MockServer};
use url::Url;

pub const CRUMB: &str = "crumb-value";
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

/// Builder pointing the Yahoo backend and both handshake URLs at the mock server.
pub fn builder_for(server: &MockServer) -> FinanceClientBuilder {
    FinanceClient::builder()
        .base_url(
            SupportedBackend::Yahoo,
            Url::parse(&server.base_url()).unwrap(),
        )
        .cookie_url(Url::parse(&format!("{}/", server.base_url())).unwrap())
        .crumb_url(Url::parse(&format!("{}/v1/test/getcrumb", server.base_url())).unwrap())
}

pub fn client_for(server: &MockServer) -> FinanceClient {
    builder_for(server).build().unwrap()
}

pub fn mock_cookie_crumb(server: &'_ MockServer) -> (Mock<'_>, Mock<'_>) {
    let cookie_mock = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("set-cookie", "A=B; Path=/")
            .body("<html>home</html>");
    });
    let crumb_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body(CRUMB);
    });
    (cookie_mock, crumb_mock)
}

pub fn mock_quote<'a>(server: &'a MockServer, crumb: &'a str, body: &'a str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "AAPL")
            .query_param("crumb", crumb);
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}
