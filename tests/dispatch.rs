//! End-to-end dispatch through the router, without a socket.

use axum::http::{Method, StatusCode};
use webapi_dispatch::http::HttpRequest;
use webapi_dispatch::WebApiRouter;

mod common;

use common::TestObject;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

fn get(path: &str) -> HttpRequest {
    HttpRequest::new(Method::GET, path)
}

fn resolved(router: &WebApiRouter, request: &HttpRequest) -> Option<String> {
    router.resolve(request).map(|method| method.name().to_string())
}

#[test]
fn test_explicit_action_binds_query_scalars() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/Hello1?name=Justin&age=10"));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 10\"");
}

#[test]
fn test_implicit_action_resolves_by_query_keys() {
    let router = common::router();

    let request = get("/api/test?name=Justin&age=10");
    assert_eq!(resolved(&router, &request).as_deref(), Some("Hello1"));

    let request = get("/api/test?Name=Justin&Age=10");
    assert_eq!(resolved(&router, &request).as_deref(), Some("Hello2"));
    let response = router.dispatch(request);
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 10\"");

    let request = get("/api/test");
    assert_eq!(resolved(&router, &request).as_deref(), Some("GetObject"));
}

#[test]
fn test_from_url_requires_every_property_key() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/Hello2?Name=Justin"));
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Without an action the scan falls through to the parameterless method.
    let request = get("/api/test?Name=Justin");
    assert_eq!(resolved(&router, &request).as_deref(), Some("GetObject"));
}

#[test]
fn test_written_object_is_serialized() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/GetObject"));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, Some("application/json"));
    let obj: TestObject = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(
        obj,
        TestObject {
            name: "Justin".into(),
            age: 10
        }
    );
}

#[test]
fn test_unparsable_scalar_becomes_zero() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/Hello1?name=Justin&age=notanumber"));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 0\"");
}

#[test]
fn test_text_query_values_are_percent_decoded() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/Hello1?name=Justin%20Case&age=10"));
    assert_eq!(response.body_text(), "\"Hello Justin Case, your age is 10\"");
}

#[test]
fn test_query_values_are_form_decoded_for_every_type() {
    let router = common::router();
    let response = router.dispatch(get("/api/v1/test/Hello1?name=Justin+Case&age=%31%30"));
    assert_eq!(response.body_text(), "\"Hello Justin Case, your age is 10\"");

    let response = router.dispatch(get("/api/v1/test/Hello2?Name=Ann+Lee&Age=%37"));
    assert_eq!(response.body_text(), "\"Hello Ann Lee, your age is 7\"");
}

#[test]
fn test_post_json_body_binds_object() {
    let router = common::router();
    let request = HttpRequest::new(Method::POST, "/api/test")
        .with_body(JSON, r#"{"Name":"Justin","Age":10}"#);
    assert_eq!(resolved(&router, &request).as_deref(), Some("Hello4"));

    let response = router.dispatch(request);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 10\"");
}

#[test]
fn test_post_form_body_binds_object() {
    let router = common::router();
    let request = HttpRequest::new(Method::POST, "/api/v1/test/Hello4")
        .with_body(FORM, "Name=Justin&Age=10");
    let response = router.dispatch(request);
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 10\"");
}

#[test]
fn test_malformed_json_body_becomes_zero_object() {
    let router = common::router();
    let request = HttpRequest::new(Method::POST, "/api/v1/test/Hello4").with_body(JSON, "{not json");
    let response = router.dispatch(request);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_text(), "\"Hello , your age is 0\"");
}

#[test]
fn test_empty_body_never_matches_from_body() {
    let router = common::router();

    let request = HttpRequest::new(Method::POST, "/api/v1/test/Hello4");
    assert_eq!(router.dispatch(request).status, StatusCode::NOT_FOUND);

    let request = HttpRequest::new(Method::POST, "/api/test").with_body(JSON, "");
    assert_eq!(resolved(&router, &request), None);
}

#[test]
fn test_post_with_query_parameters() {
    let router = common::router();
    let request = HttpRequest::new(Method::POST, "/api/test?name=Justin&age=10");
    assert_eq!(resolved(&router, &request).as_deref(), Some("Hello3"));
    assert_eq!(
        router.dispatch(request).body_text(),
        "\"Hello Justin, your age is 10\""
    );
}

#[test]
fn test_put_and_delete_on_versioned_handler() {
    let router = common::router();

    let request = HttpRequest::new(Method::PUT, "/api/v2/items/Rename?id=7").with_body(JSON, "\"Bob\"");
    let response = router.dispatch(request);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_text(), "\"7:Bob\"");

    // A form body cannot populate a scalar.
    let request = HttpRequest::new(Method::PUT, "/api/v2/items/Rename?id=7").with_body(FORM, "name=Bob");
    assert_eq!(router.dispatch(request).body_text(), "\"7:\"");

    let request = HttpRequest::new(Method::DELETE, "/api/v2/items/Remove?id=3");
    let response = router.dispatch(request);
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
}

#[test]
fn test_unresolvable_requests_are_not_found() {
    let router = common::router();
    let cases = [
        (Method::GET, "/other/v1/test/Hello1?name=a&age=1"),
        (Method::GET, "/api"),
        (Method::GET, "/api/v1/test/Hello1/extra"),
        (Method::GET, "/api/v1/missing/Hello1"),
        (Method::GET, "/api/v2/test/GetObject"),
        (Method::GET, "/api/v1/test/hello1?name=a&age=1"),
        (Method::GET, "/api/v1/test/Hello3?name=a&age=1"),
        (Method::PATCH, "/api/v1/test/GetObject"),
    ];
    for (method, path) in cases {
        let response = router.dispatch(HttpRequest::new(method.clone(), path));
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
    }
}

#[test]
fn test_segments_are_case_insensitive_except_action() {
    let router = common::router();
    let response = router.dispatch(get("/API/V1/TEST/GetObject"));
    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_handler_error_becomes_internal_error() {
    let router = common::router();
    let before = common::failures();
    let response = router.dispatch(get("/api/v2/items/Fail?reason=boom"));
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(common::failures() > before);
}

#[test]
fn test_handler_panic_becomes_internal_error() {
    let router = common::router();
    let response = router.dispatch(get("/api/v2/items/Explode"));
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    // The router keeps serving afterwards.
    let response = router.dispatch(get("/api/v1/test/GetObject"));
    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_router_without_application_name() {
    let router = WebApiRouter::builder()
        .handler::<common::TestHandler>()
        .build()
        .unwrap();
    assert_eq!(router.application_name(), None);
    let response = router.dispatch(get("/v1/test/Hello1?name=Justin&age=10"));
    assert_eq!(response.body_text(), "\"Hello Justin, your age is 10\"");
}
