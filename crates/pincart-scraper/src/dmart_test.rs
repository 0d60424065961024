use serde_json::json;

use super::*;

fn sku(overrides: Value) -> Value {
    let mut base = json!({
        "skuUniqueID": "167340",
        "buyable": "true",
        "invType": "AVL",
        "priceMRP": "28.00",
        "priceSALE": "27.00",
        "variantTextValue": "500 ml",
        "productImageKey": "AMUL_TAAZA",
        "imgCode": "1",
        "articleNumber": "8901262010016"
    });
    if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
        for (k, v) in overrides {
            base.insert(k.clone(), v.clone());
        }
    }
    base
}

fn response(skus: Vec<Value>) -> Value {
    json!({
        "products": [{
            "name": "Amul Taaza Toned Milk",
            "targetUrl": "/amul-taaza-toned-milk-500ml",
            "sKUs": skus
        }]
    })
}

#[test]
fn normalizes_eligible_sku() {
    let products = normalize_search_response(&response(vec![sku(json!({}))])).unwrap();
    assert_eq!(products.len(), 1);
    let p = &products[0];
    assert_eq!(p.name, "Amul Taaza Toned Milk");
    assert_eq!(p.mrp, Some(28.0));
    assert_eq!(p.selling_price, Some(27.0));
    assert_eq!(p.variant.as_deref(), Some("500 ml"));
    assert_eq!(
        p.image.as_deref(),
        Some("https://cdn.dmart.in/images/products/AMUL_TAAZA_1_P.jpg")
    );
    assert_eq!(p.barcode, "8901262010016");
    assert_eq!(
        p.deeplink,
        "https://www.dmart.in/amul-taaza-toned-milk-500ml"
    );
}

#[test]
fn excludes_unbuyable_sku_even_with_valid_prices() {
    let products =
        normalize_search_response(&response(vec![sku(json!({"buyable": "false"}))])).unwrap();
    assert!(products.is_empty());
}

#[test]
fn excludes_sku_without_buyable_flag() {
    let mut s = sku(json!({}));
    s.as_object_mut().unwrap().remove("buyable");
    assert!(normalize_search_response(&response(vec![s])).unwrap().is_empty());
}

#[test]
fn accepts_boolean_buyable_flag() {
    let products =
        normalize_search_response(&response(vec![sku(json!({"buyable": true}))])).unwrap();
    assert_eq!(products.len(), 1);
}

#[test]
fn excludes_out_of_stock_sku() {
    let products =
        normalize_search_response(&response(vec![sku(json!({"invType": "OOS"}))])).unwrap();
    assert!(products.is_empty());
}

#[test]
fn unparsable_price_skips_only_that_sku() {
    let products = normalize_search_response(&response(vec![
        sku(json!({"skuUniqueID": "1", "priceSALE": "N/A"})),
        sku(json!({"skuUniqueID": "2", "variantTextValue": "1 l"})),
    ]))
    .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variant.as_deref(), Some("1 l"));
}

#[test]
fn missing_mrp_skips_sku() {
    let mut s = sku(json!({}));
    s.as_object_mut().unwrap().remove("priceMRP");
    assert!(normalize_search_response(&response(vec![s])).unwrap().is_empty());
}

#[test]
fn unnamed_parent_contributes_nothing() {
    let body = json!({"products": [{"targetUrl": "/x", "sKUs": [sku(json!({}))]}]});
    assert!(normalize_search_response(&body).unwrap().is_empty());
}

#[test]
fn image_falls_back_to_image_key() {
    let mut s = sku(json!({"imageKey": "FALLBACK"}));
    s.as_object_mut().unwrap().remove("productImageKey");
    let products = normalize_search_response(&response(vec![s])).unwrap();
    assert_eq!(
        products[0].image.as_deref(),
        Some("https://cdn.dmart.in/images/products/FALLBACK_1_P.jpg")
    );
}

#[test]
fn image_omitted_without_key_pair() {
    let mut s = sku(json!({}));
    s.as_object_mut().unwrap().remove("imgCode");
    let products = normalize_search_response(&response(vec![s])).unwrap();
    assert_eq!(products.len(), 1);
    assert!(products[0].image.is_none());
}

#[test]
fn barcode_and_deeplink_default_to_empty() {
    let mut s = sku(json!({}));
    s.as_object_mut().unwrap().remove("articleNumber");
    let body = json!({"products": [{"name": "Milk", "sKUs": [s]}]});
    let products = normalize_search_response(&body).unwrap();
    assert_eq!(products[0].barcode, "");
    assert_eq!(products[0].deeplink, "");
}

#[test]
fn preserves_upstream_order_across_parents() {
    let body = json!({
        "products": [
            {"name": "B", "sKUs": [sku(json!({}))]},
            {"name": "A", "sKUs": [sku(json!({})), sku(json!({"variantTextValue": "1 l"}))]}
        ]
    });
    let names: Vec<_> = normalize_search_response(&body)
        .unwrap()
        .into_iter()
        .map(|p| (p.name, p.variant))
        .collect();
    assert_eq!(
        names,
        vec![
            ("B".to_string(), Some("500 ml".to_string())),
            ("A".to_string(), Some("500 ml".to_string())),
            ("A".to_string(), Some("1 l".to_string())),
        ]
    );
}

#[test]
fn missing_products_key_is_empty() {
    assert!(normalize_search_response(&json!({})).unwrap().is_empty());
}

#[test]
fn non_array_products_is_shape_error() {
    let err = normalize_search_response(&json!({"products": {}})).unwrap_err();
    assert!(matches!(err, BackendError::UnexpectedShape { .. }));
}

#[test]
fn non_object_body_is_shape_error() {
    let err = normalize_search_response(&json!([1, 2])).unwrap_err();
    assert!(matches!(err, BackendError::UnexpectedShape { .. }));
}

#[test]
fn search_url_encodes_query_as_path_segment() {
    let backend = DmartBackend::new(
        &BackendSettings {
            base_url: "https://digital.dmart.in/".into(),
            timeout_secs: 5,
        },
        "test-agent",
        Arc::new(crate::location::StoreTable::default()),
    )
    .unwrap();
    let url = backend.search_url("toned milk/500ml", "10733").unwrap();
    assert_eq!(
        url.as_str(),
        "https://digital.dmart.in/api/v3/search/toned%20milk%2F500ml?storeId=10733"
    );
}

#[test]
fn join_site_handles_missing_slash() {
    assert_eq!(join_site(SITE_URL, "x/y"), "https://www.dmart.in/x/y");
    assert_eq!(join_site(SITE_URL, "/x"), "https://www.dmart.in/x");
}
