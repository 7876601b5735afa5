use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use fieldbook_api::{build_router, middleware::auth::api_key};
use fieldbook_core::models::user::Role;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{
    date, db_field, db_schedule_detail, db_time, user, TestContext, SIGNATURE_KEY,
};

fn server(ctx: TestContext) -> TestServer {
    TestServer::new(build_router(ctx.build_state())).expect("test server starts")
}

fn token() -> HeaderValue {
    HeaderValue::from_static("Bearer test-token")
}

#[tokio::test]
async fn health_is_public() {
    let server = server(TestContext::new());

    let response = server.get("/api/v1/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn field_listing_is_public() {
    let mut ctx = TestContext::new();
    ctx.user_client.expect_get_user_by_token().never();
    ctx.field_repo
        .expect_find_all()
        .returning(|| Ok(vec![db_field(1), db_field(2)]));

    let response = server(ctx).get("/api/v1/field").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["code"], "FLD-001");
    assert_eq!(body["data"][0]["pricePerHour"], 100_000);
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers() {
    let mut ctx = TestContext::new();
    ctx.user_client.expect_get_user_by_token().never();
    ctx.time_repo.expect_find_all().never();

    let response = server(ctx).get("/api/v1/time").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "error", "message": "unauthorized", "data": null })
    );
}

#[tokio::test]
async fn admin_routes_reject_customers() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Customer)));
    ctx.time_repo.expect_find_all().never();

    let response = server(ctx)
        .get("/api/v1/time")
        .add_header(AUTHORIZATION, token())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admins_list_times() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Admin)));
    ctx.time_repo
        .expect_find_all()
        .returning(|| Ok(vec![db_time(1, "08:00:00", "09:00:00")]));

    let response = server(ctx)
        .get("/api/v1/time")
        .add_header(AUTHORIZATION, token())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"][0]["startTime"], "08:00:00");
    assert_eq!(body["data"][0]["endTime"], "09:00:00");
}

#[tokio::test]
async fn customers_page_through_schedules() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Customer)));
    let field = db_field(1);
    let time = db_time(1, "08:00:00", "09:00:00");
    let rows = vec![db_schedule_detail(&field, &time, date(2024, 10, 5), "available")];
    ctx.schedule_repo
        .expect_find_all_paginated()
        .returning(move |_| Ok((rows.clone(), 1)));

    let response = server(ctx)
        .get("/api/v1/field/schedule/pagination")
        .add_query_param("page", 1)
        .add_query_param("limit", 10)
        .add_query_param("sortColumn", "date")
        .add_query_param("sortOrder", "asc")
        .add_header(AUTHORIZATION, token())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["items"][0]["date"], "05 Okt");
    assert_eq!(body["data"]["items"][0]["status"], "Available");
}

#[tokio::test]
async fn invalid_schedule_request_lists_violations() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Admin)));
    ctx.schedule_repo.expect_create_many().never();

    let response = server(ctx)
        .post("/api/v1/field/schedule/create")
        .add_header(AUTHORIZATION, token())
        .json(&json!({ "fieldID": Uuid::new_v4(), "date": "15-05-2024", "timeIDs": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "validation error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("violations are listed")
        .iter()
        .filter_map(|violation| violation["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["date", "timeIDs"]);
}

#[tokio::test]
async fn invalid_path_uuid_is_a_validation_error() {
    let server = server(TestContext::new());

    let response = server.get("/api/v1/field/not-a-uuid").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "error");
}

#[tokio::test]
async fn booking_listing_is_public() {
    let mut ctx = TestContext::new();
    ctx.user_client.expect_get_user_by_token().never();
    let field = db_field(3);
    let field_uuid = field.uuid;
    let time = db_time(1, "20:00:00", "21:00:00");
    let rows = vec![db_schedule_detail(&field, &time, date(2024, 12, 24), "booked")];
    ctx.field_repo
        .expect_find_by_uuid()
        .returning(move |_| Ok(Some(field.clone())));
    ctx.schedule_repo
        .expect_find_all_by_field_id_and_date()
        .returning(move |_, _| Ok(rows.clone()));

    let response = server(ctx)
        .get(&format!("/api/v1/field/schedule/lists/{field_uuid}"))
        .add_query_param("date", "2024-12-24")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    let item = &body["data"][0];
    assert_eq!(item["pricePerHour"], "Rp. 100.000");
    assert_eq!(item["date"], "24 Des");
    assert_eq!(item["status"], "Booked");
    assert_eq!(item["time"], "20:00");
}

#[tokio::test]
async fn unknown_schedule_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Admin)));
    ctx.schedule_repo.expect_find_by_uuid().returning(|_| Ok(None));

    let response = server(ctx)
        .get(&format!("/api/v1/field/schedule/{}", Uuid::new_v4()))
        .add_header(AUTHORIZATION, token())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Field schedule not found");
}

#[tokio::test]
async fn delete_route_deletes_the_field() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Admin)));
    let field = db_field(6);
    let uuid = field.uuid;
    ctx.field_repo
        .expect_find_by_uuid()
        .returning(move |_| Ok(Some(field.clone())));
    ctx.field_repo.expect_update().never();
    ctx.field_repo.expect_delete().times(1).returning(|_| Ok(1));

    let response = server(ctx)
        .delete(&format!("/api/v1/field/delete/{uuid}"))
        .add_header(AUTHORIZATION, token())
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "success");
}

#[tokio::test]
async fn status_update_requires_a_signature_when_enforced() {
    let mut ctx = TestContext::new();
    ctx.enforce_service_signature = true;
    ctx.schedule_repo.expect_find_by_uuid().never();
    ctx.schedule_repo.expect_update_status().never();

    let response = server(ctx)
        .patch("/api/v1/field/schedule/update-status")
        .json(&json!({ "fieldScheduleIDs": [Uuid::new_v4()] }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_status_update_books_the_schedules() {
    let mut ctx = TestContext::new();
    ctx.enforce_service_signature = true;
    let field = db_field(1);
    let time = db_time(1, "08:00:00", "09:00:00");
    let detail = db_schedule_detail(&field, &time, date(2024, 5, 15), "available");
    let uuid = detail.uuid;
    ctx.schedule_repo
        .expect_find_by_uuid()
        .returning(move |_| Ok(Some(detail.clone())));
    ctx.schedule_repo
        .expect_update_status()
        .times(1)
        .returning(|uuids, _| Ok(uuids.len() as u64));

    let request_at = Utc::now().timestamp().to_string();
    let signature = api_key("payment-service", SIGNATURE_KEY, &request_at);

    let response = server(ctx)
        .patch("/api/v1/field/schedule/update-status")
        .add_header(
            HeaderName::from_static("x-service-name"),
            HeaderValue::from_static("payment-service"),
        )
        .add_header(
            HeaderName::from_static("x-request-at"),
            HeaderValue::from_str(&request_at).expect("digits are a valid header"),
        )
        .add_header(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(&signature).expect("hex is a valid header"),
        )
        .json(&json!({ "fieldScheduleIDs": [uuid] }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn field_create_without_a_multipart_body_is_a_validation_error() {
    let mut ctx = TestContext::new();
    ctx.user_client
        .expect_get_user_by_token()
        .returning(|_| Ok(user(Role::Admin)));
    ctx.field_repo.expect_create().never();

    let response = server(ctx)
        .post("/api/v1/field/create")
        .add_header(AUTHORIZATION, token())
        .json(&json!({ "code": "FUT-01", "name": "Futsal A", "pricePerHour": 150000 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "validation error");
    assert_eq!(body["errors"][0]["field"], "body");
}
