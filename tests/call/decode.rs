use crate::common::{self, CRUMB};
use finance_rs::{BackendExt, FinanceError, Params, SupportedBackend};
use httpmock::Method::GET;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct X {
    x: i64,
}

#[tokio::test]
async fn success_body_is_decoded_into_requested_shape() {
    let server = common::setup_server();
    let _auth = common::mock_cookie_crumb(&server);
    let api = server.mock(|when, then| {
        when.method(GET).path("/v1/x").query_param("crumb", CRUMB);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"x":1}"#);
    });

    let client = common::client_for(&server);
    let out: X = client
        .call(SupportedBackend::Yahoo, "/v1/x", None, None)
        .await
        .unwrap();

    api.assert();
    assert_eq!(out, X { x: 1 });
}

#[tokio::test]
async fn params_are_encoded_and_path_is_normalized() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/options/BRK-B")
            .query_param("date", "1700000000")
            .query_param("fields", "bid,ask")
            .query_param("crumb", "seeded");
        then.status(200).body(r#"{"x":7}"#);
    });

    let client = common::builder_for(&server).crumb("seeded").build().unwrap();
    let params = Params::new()
        .with("date", "1700000000")
        .with("fields", "bid,ask");
    let out: X = client
        .call(
            SupportedBackend::Yahoo,
            "v7/finance/options/BRK-B",
            Some(&params),
            None,
        )
        .await
        .unwrap();

    api.assert();
    assert_eq!(out.x, 7);
}

#[tokio::test]
async fn malformed_body_surfaces_decode_error() {
    let server = common::setup_server();
    let _api = server.mock(|when, then| {
        when.method(GET).path("/v1/x");
        then.status(200).body("not json");
    });

    let client = common::builder_for(&server).crumb("seeded").build().unwrap();
    let err = client
        .call::<X>(SupportedBackend::Yahoo, "/v1/x", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FinanceError::Decode(_)), "got {err:?}");
    assert!(!err.is_transport());
    assert!(err.remote().is_none());
}

#[tokio::test]
async fn shape_mismatch_surfaces_decode_error() {
    let server = common::setup_server();
    let _api = server.mock(|when, then| {
        when.method(GET).path("/v1/x");
        then.status(200).body(r#"{"y":"nope"}"#);
    });

    let client = common::builder_for(&server).crumb("seeded").build().unwrap();
    let backend = client.backend(SupportedBackend::Yahoo).await.unwrap();
    let err = backend
        .call_json::<X>("/v1/x", None, None)
        .await
        .unwrap_err();

    match err {
        FinanceError::Decode(e) => assert!(e.to_string().contains("missing field `x`"), "{e}"),
        other => panic!("expected Decode error, got {other:?}"),
    }
}
