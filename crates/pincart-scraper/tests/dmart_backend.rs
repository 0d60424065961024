//! Integration tests for `DmartBackend` against a local `wiremock` server.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pincart_core::{BackendName, BackendSettings, SearchRequest};
use pincart_scraper::{BackendError, DmartBackend, ProductBackend, SearchContext, StoreTable};

fn backend(server: &MockServer) -> DmartBackend {
    let stores: BTreeMap<String, String> = [("500032".to_string(), "10733".to_string())].into();
    DmartBackend::new(
        &BackendSettings {
            base_url: server.uri(),
            timeout_secs: 5,
        },
        "pincart-test/0.1",
        Arc::new(StoreTable::new(stores)),
    )
    .expect("failed to build test DmartBackend")
}

fn ctx(query: &str, pincode: &str) -> SearchContext {
    SearchContext::new(
        SearchRequest::new(Some(query), Some(pincode)).expect("valid request"),
        "test-request",
    )
}

fn milk_response() -> serde_json::Value {
    json!({
        "products": [{
            "name": "Amul Taaza Toned Milk",
            "targetUrl": "/amul-taaza",
            "sKUs": [
                {
                    "buyable": "true",
                    "invType": "AVL",
                    "priceMRP": "28.00",
                    "priceSALE": "27.00",
                    "variantTextValue": "500 ml",
                    "productImageKey": "AMUL",
                    "imgCode": "1",
                    "articleNumber": 8_901_262_010_016_u64
                },
                {
                    "buyable": "true",
                    "invType": "OOS",
                    "priceMRP": "56.00",
                    "priceSALE": "54.00"
                }
            ]
        }]
    })
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_store_id_and_normalizes_in_stock_skus() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/search/milk"))
        .and(query_param("storeId", "10733"))
        .and(header("origin", "https://www.dmart.in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(milk_response()))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend(&server).search(&ctx("milk", "500032")).await;

    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    assert_eq!(result.backend, BackendName::Dmart);
    assert_eq!(result.products.len(), 1);
    let product = &result.products[0];
    assert_eq!(product.selling_price, Some(27.0));
    assert_eq!(product.barcode, "8901262010016");
    assert_eq!(product.deeplink, "https://www.dmart.in/amul-taaza");
}

// ---------------------------------------------------------------------------
// Failures stay local
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unmapped_pincode_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(milk_response()))
        .expect(0)
        .mount(&server)
        .await;

    let result = backend(&server).search(&ctx("milk", "110001")).await;

    assert!(result.products.is_empty());
    assert!(
        matches!(
            result.error,
            Some(BackendError::LocationUnmapped { backend: BackendName::Dmart, ref pincode }) if pincode == "110001"
        ),
        "got: {:?}",
        result.error
    );
}

#[tokio::test]
async fn server_error_yields_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/search/milk"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = backend(&server).search(&ctx("milk", "500032")).await;

    assert!(result.products.is_empty());
    assert!(matches!(
        result.error,
        Some(BackendError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/search/milk"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .fetch(&ctx("milk", "500032"))
        .await
        .expect_err("expected decode failure");

    assert!(matches!(err, BackendError::Deserialize { .. }), "got: {err:?}");
}
