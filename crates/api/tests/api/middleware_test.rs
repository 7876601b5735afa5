use axum::{
    body::to_bytes,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
};
use fieldbook_api::middleware::{
    auth::{api_key, verify_api_key},
    error_handling::map_error,
};
use fieldbook_core::{
    errors::{FieldViolation, ServiceError},
    models::user::Role,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{user, TestContext};

async fn body_json(err: ServiceError) -> (StatusCode, Value) {
    let response = map_error(err);
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    (status, serde_json::from_slice(&bytes).expect("body is JSON"))
}

#[rstest]
#[case(ServiceError::NotFound("Field".to_string()), StatusCode::NOT_FOUND)]
#[case(ServiceError::AlreadyExists("Field schedule".to_string()), StatusCode::BAD_REQUEST)]
#[case(ServiceError::invalid("date", "is required"), StatusCode::BAD_REQUEST)]
#[case(ServiceError::UploadRejected("invalid upload file".to_string()), StatusCode::BAD_REQUEST)]
#[case(ServiceError::InUse("Field".to_string()), StatusCode::BAD_REQUEST)]
#[case(ServiceError::Unauthorized("no token".to_string()), StatusCode::UNAUTHORIZED)]
#[case(ServiceError::TooManyRequests, StatusCode::TOO_MANY_REQUESTS)]
#[case(ServiceError::Database(eyre::eyre!("relation missing")), StatusCode::INTERNAL_SERVER_ERROR)]
fn errors_map_to_status_codes(#[case] err: ServiceError, #[case] expected: StatusCode) {
    assert_eq!(map_error(err).status(), expected);
}

#[tokio::test]
async fn business_errors_carry_their_message() {
    let (status, body) = body_json(ServiceError::AlreadyExists("Field schedule".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "message": "Field schedule already exists",
            "data": null,
        })
    );
}

#[tokio::test]
async fn validation_errors_list_each_field() {
    let (_, body) = body_json(ServiceError::Validation(vec![
        FieldViolation::new("fieldID", "must be a valid UUID"),
        FieldViolation::new("date", "is required"),
    ]))
    .await;

    assert_eq!(body["message"], "validation error");
    assert_eq!(
        body["errors"],
        json!([
            { "field": "fieldID", "message": "must be a valid UUID" },
            { "field": "date", "message": "is required" },
        ])
    );
}

#[tokio::test]
async fn storage_errors_hide_their_detail() {
    let (status, body) =
        body_json(ServiceError::Database(eyre::eyre!("password authentication failed"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "database server failed to execute query");
}

#[tokio::test]
async fn unauthorized_hides_the_reason() {
    let (_, body) = body_json(ServiceError::Unauthorized("role customer".to_string())).await;
    assert_eq!(body["message"], "unauthorized");
}

#[test]
fn api_key_is_hex_sha256_of_service_key_and_time() {
    assert_eq!(
        api_key("field-service", "secret", "1700000000"),
        "1b4cd37b9f3fd3e0e029603f1d4de5efdd50d3a991743c686ea6a23d52399ecf"
    );
}

fn signed_headers(service: &str, key: &str, request_at: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-service-name", HeaderValue::from_str(service).unwrap());
    headers.insert("x-request-at", HeaderValue::from_str(request_at).unwrap());
    headers.insert(
        "x-api-key",
        HeaderValue::from_str(&api_key(service, key, request_at)).unwrap(),
    );
    headers
}

#[test]
fn signed_requests_verify_against_our_key() {
    let headers = signed_headers("payment-service", "shared", "1700000000");
    assert!(verify_api_key(&headers, "shared").is_ok());
    assert!(matches!(
        verify_api_key(&headers, "other"),
        Err(ServiceError::Unauthorized(_))
    ));
}

#[test]
fn unsigned_requests_are_rejected() {
    assert!(matches!(
        verify_api_key(&HeaderMap::new(), "shared"),
        Err(ServiceError::Unauthorized(_))
    ));
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(token).unwrap());
    headers
}

#[tokio::test]
async fn gate_without_token_never_calls_the_user_service() {
    let mut ctx = TestContext::new();
    ctx.user_client.expect_get_user_by_token().never();

    let gate = ctx.access_gate();
    let result = gate.require(&HeaderMap::new(), &[Role::Admin]).await;

    assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn gate_forwards_the_token_verbatim() {
    let mut ctx = TestContext::new();
    let admin = user(Role::Admin);
    let expected = admin.clone();
    ctx.user_client
        .expect_get_user_by_token()
        .withf(|token: &str| token == "Bearer abc.def")
        .times(1)
        .returning(move |_| Ok(admin.clone()));

    let gate = ctx.access_gate();
    let resolved = gate
        .require(&bearer("Bearer abc.def"), &[Role::Admin])
        .await
        .expect("admin passes");

    assert_eq!(resolved, expected);
}

#[tokio::test]
async fn gate_rejects_roles_outside_the_allowed_set() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Customer)));

    let gate = ctx.access_gate();
    let result = gate.require(&bearer("Bearer t"), &[Role::Admin]).await;

    assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn gate_accepts_any_listed_role() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Customer)));

    let gate = ctx.access_gate();
    let result = gate
        .require(&bearer("Bearer t"), &[Role::Admin, Role::Customer])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn gate_treats_user_service_failures_as_unauthorized() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Err(ServiceError::Internal("connection refused".into())));

    let gate = ctx.access_gate();
    let result = gate.require(&bearer("Bearer t"), &[Role::Admin]).await;

    assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
}
