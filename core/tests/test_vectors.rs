//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either the expected parse result or the expected error variant (a
//! case may instead name an `expected_build_error` for a rejected key). The
//! `body` of a save request is compared after unwrapping the outer JSON
//! string, so the vectors stay readable.

use jsonstore_core::{HttpMethod, HttpRequest, HttpResponse, StoreClient, StoreError};
use serde_json::Value;

const TOKEN: &str = "abc123";
const BASE_URL: &str = "https://www.jsonstore.io/abc123";

fn client() -> StoreClient {
    StoreClient::new(TOKEN)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn error_variant(err: &StoreError) -> &'static str {
    match err {
        StoreError::InvalidKey(_) => "InvalidKey",
        StoreError::Transport(_) => "Transport",
        StoreError::Status { .. } => "Status",
        StoreError::MalformedResponse(_) => "MalformedResponse",
        StoreError::NotOk(_) => "NotOk",
        StoreError::MissingResult(_) => "MissingResult",
        StoreError::Encode(_) => "Encode",
        StoreError::Decode(_) => "Decode",
    }
}

/// Check method, URL and headers against the vector.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let key = case["key"].as_str().unwrap();

        // Keys that would leave the token's namespace never produce a request
        if let Some(variant) = case.get("expected_build_error") {
            let err = c.build_get(key).unwrap_err();
            assert_eq!(error_variant(&err), variant.as_str().unwrap(), "{name}: build error");
            continue;
        }

        // Verify build
        let req = c.build_get(key).unwrap();
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_get::<Value>(simulated_response(case));
        match case.get("expected_error") {
            Some(variant) => {
                let err = result.unwrap_err();
                assert_eq!(error_variant(&err), variant.as_str().unwrap(), "{name}: error");
            }
            None => assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result"),
        }
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

#[test]
fn save_test_vectors() {
    let raw = include_str!("../../test-vectors/save.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let key = case["key"].as_str().unwrap();

        // Verify build
        let req = c.build_save(key, &case["input"]).unwrap();
        check_request(name, &req, &case["expected_request"]);
        let outer: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            outer.as_str().unwrap(),
            case["expected_request"]["body"].as_str().unwrap(),
            "{name}: body"
        );

        // Verify parse
        let result = c.parse_save(simulated_response(case));
        match case.get("expected_error") {
            Some(variant) => {
                let err = result.unwrap_err();
                assert_eq!(error_variant(&err), variant.as_str().unwrap(), "{name}: error");
            }
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let key = case["key"].as_str().unwrap();

        // Verify build
        let req = c.build_delete(key).unwrap();
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_delete(simulated_response(case));
        match case.get("expected_error") {
            Some(variant) => {
                let err = result.unwrap_err();
                assert_eq!(error_variant(&err), variant.as_str().unwrap(), "{name}: error");
            }
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
