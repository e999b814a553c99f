use crate::common;
use finance_rs::{FinanceError, SupportedBackend};
use httpmock::Method::GET;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct X {
    #[allow(dead_code)]
    x: i64,
}

#[tokio::test]
async fn not_found_maps_to_remote_error_with_raw_body() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET).path("/v1/missing");
        then.status(404).body("not found");
    });

    let client = common::builder_for(&server).crumb("seeded").build().unwrap();

    let mut out: Option<X> = None;
    match client
        .call::<X>(SupportedBackend::Yahoo, "/v1/missing", None, None)
        .await
    {
        Ok(v) => out = Some(v),
        Err(FinanceError::Remote(e)) => {
            assert_eq!(e.status_code, 404);
            assert_eq!(e.body, "not found");
            assert_eq!(e.to_string(), format!("status: 404, detail: {}", e.msg));
        }
        Err(other) => panic!("expected Remote error, got {other:?}"),
    }

    api.assert();
    assert!(out.is_none(), "output must stay untouched on failure");
}

#[tokio::test]
async fn server_error_body_is_not_decoded() {
    let server = common::setup_server();
    let _api = server.mock(|when, then| {
        when.method(GET).path("/v1/boom");
        then.status(500)
            .header("content-type", "application/json")
            .body(r#"{"x":1}"#);
    });

    let client = common::builder_for(&server).crumb("seeded").build().unwrap();
    let err = client
        .call::<X>(SupportedBackend::Yahoo, "/v1/boom", None, None)
        .await
        .unwrap_err();

    let remote = err.remote().expect("remote error");
    assert_eq!(remote.status_code, 500);
    assert_eq!(remote.body, r#"{"x":1}"#);
    assert!(!err.is_transport());
}

#[tokio::test]
async fn client_error_on_bats_backend_is_remote_too() {
    let server = common::setup_server();
    let _api = server.mock(|when, then| {
        when.method(GET).path("/uploads");
        then.status(400).body("bad request");
    });

    let client = common::builder_for(&server)
        .base_url(
            SupportedBackend::Bats,
            url::Url::parse(&server.base_url()).unwrap(),
        )
        .build()
        .unwrap();

    let err = client
        .execute(SupportedBackend::Bats, "/uploads", None, None)
        .await
        .unwrap_err();

    assert_eq!(err.remote().map(|e| e.status_code), Some(400));
}
