//! Test fixtures for the booking API
//!
//! Builds the full router over a fresh in-memory database and provides
//! helpers to drive it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono_tz::Tz;
use fitbook_booking::{routes, BookingState};
use fitbook_common::handlers::not_found_handler;
use fitbook_common::models::NewClass;
use fitbook_db::{init_schema, ClassRepository, DbClient};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Common and booking routes with the 404 fallback, plus the shared state.
///
/// The backend's trace and panic layers are not applied.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<BookingState>,
}

/// Creates the app with the given classes, base timezone Asia/Kolkata.
pub async fn create_test_app(classes: &[(&str, &str, i64)]) -> TestApp {
    let db = DbClient::in_memory().await.unwrap();
    create_test_app_with_db(db, classes).await
}

/// Same as [`create_test_app`] over a caller-supplied database.
pub async fn create_test_app_with_db(db: DbClient, classes: &[(&str, &str, i64)]) -> TestApp {
    init_schema(&db).await.unwrap();
    let state = Arc::new(BookingState::with_base_timezone(db, Tz::Asia__Kolkata));

    for (name, datetime, slots) in classes {
        state
            .classes
            .insert(NewClass {
                name: name.to_string(),
                datetime: datetime.to_string(),
                instructor: "Alice".to_string(),
                available_slots: *slots,
            })
            .await
            .unwrap();
    }

    let router = fitbook_common::routes()
        .merge(routes(state.clone()))
        .fallback(not_found_handler);
    TestApp { router, state }
}

/// A class list shared by most tests.
pub fn default_classes() -> Vec<(&'static str, &'static str, i64)> {
    vec![
        ("Yoga", "2025-06-10 07:00:00", 10),
        ("Zumba", "2025-06-11 09:00:00", 15),
        ("HIIT", "2025-06-12 18:00:00", 1),
    ]
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Sends a request and returns the status and the body parsed as JSON
/// (or as a JSON string when it is not JSON).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// A booking body for `class_id` under `email`.
pub fn booking_body(class_id: i64, email: &str) -> Value {
    serde_json::json!({
        "class_id": class_id,
        "client_name": "Test Client",
        "client_email": email,
    })
}
