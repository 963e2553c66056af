mod fixtures;

use axum::http::StatusCode;
use fitbook_db::{BookingRepository, ClassRepository};
use fitbook_db::DbClient;
use fixtures::{
    booking_body, create_test_app, create_test_app_with_db, default_classes, get, post_json,
    post_raw, send,
};
use serde_json::json;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::test]
async fn test_root_and_unknown_route() {
    let app = create_test_app(&[]).await;

    let (status, body) = send(&app.router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Welcome to Fitbook Booking API"));

    let (status, body) = send(&app.router, get("/no/such/route")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_get_classes_endpoint() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(&app.router, get("/classes")).await;
    assert_eq!(status, StatusCode::OK);
    let classes = body.as_array().unwrap();
    assert_eq!(classes.len(), 3);
    assert_eq!(classes[0]["name"], "Yoga");
    assert_eq!(classes[0]["datetime"], "2025-06-10 07:00:00");
    assert_eq!(classes[0]["instructor"], "Alice");
    assert_eq!(classes[0]["available_slots"], 10);
}

#[tokio::test]
async fn test_get_classes_in_various_timezones() {
    let app = create_test_app(&default_classes()).await;

    for (zone, expected) in [
        ("Asia/Kolkata", "2025-06-10 07:00:00"),
        ("UTC", "2025-06-10 01:30:00"),
        ("Europe/London", "2025-06-10 02:30:00"),
        ("Invalid/Timezone", "2025-06-10 07:00:00"),
    ] {
        let (status, body) = send(&app.router, get(&format!("/classes?timezone={}", zone))).await;
        assert_eq!(status, StatusCode::OK, "{}", zone);
        assert_eq!(body[0]["datetime"], expected, "{}", zone);
    }
}

#[tokio::test]
async fn test_get_classes_repeated_timezone_uses_first() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(&app.router, get("/classes?timezone=UTC&timezone=UTC")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["datetime"], "2025-06-10 01:30:00");

    let uri = "/classes?timezone=UTC&timezone=Asia/Tokyo";
    let (status, body) = send(&app.router, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["datetime"], "2025-06-10 01:30:00");
}

#[tokio::test]
async fn test_book_class_success() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(&app.router, post_json("/book", booking_body(1, "t@test.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Booking successful", "booking_id": 1 }));

    let class = app.state.classes.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(class.available_slots, 9);
    assert_eq!(app.state.bookings.count_for_class(1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_book_class_overbooking() {
    let app = create_test_app(&default_classes()).await;

    let (status, _) = send(&app.router, post_json("/book", booking_body(3, "a@test.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, post_json("/book", booking_body(3, "b@test.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "No slots available" }));

    let class = app.state.classes.find_by_id(3).await.unwrap().unwrap();
    assert_eq!(class.available_slots, 0);
}

#[tokio::test]
async fn test_book_unknown_class() {
    let app = create_test_app(&default_classes()).await;

    let request = post_json("/book", booking_body(999, "t@test.com"));
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Class not found" }));
}

#[tokio::test]
async fn test_book_class_missing_fields() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(&app.router, post_json("/book", json!({ "class_id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": ["client_name is required", "client_email is required"] })
    );

    let (status, body) = send(
        &app.router,
        post_json(
            "/book",
            json!({ "class_id": 1, "client_name": "  ", "client_email": "x@test.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": ["client_name is required"] }));
}

#[tokio::test]
async fn test_book_class_missing_body() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(&app.router, post_raw("/book", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": ["Missing JSON body"] }));

    let (status, _) = send(&app.router, post_raw("/book", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_for_last_slot() {
    let app = create_test_app(&default_classes()).await;

    let first = send(&app.router, post_json("/book", booking_body(3, "a@test.com")));
    let second = send(&app.router, post_json("/book", booking_body(3, "b@test.com")));
    let ((status_a, _), (status_b, _)) = tokio::join!(first, second);

    let mut statuses = vec![status_a.as_u16(), status_b.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409]);

    let class = app.state.classes.find_by_id(3).await.unwrap().unwrap();
    assert_eq!(class.available_slots, 0);
    assert_eq!(app.state.bookings.count_for_class(3).await.unwrap(), 1);
}

#[tokio::test]
async fn test_get_bookings_by_email() {
    let app = create_test_app(&default_classes()).await;
    send(&app.router, post_json("/book", booking_body(1, "y@test.com"))).await;
    send(&app.router, post_json("/book", booking_body(2, "y@test.com"))).await;

    let (status, body) = send(&app.router, get("/bookings?email=y@test.com")).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    for booking in bookings {
        assert_eq!(booking["client_email"], "y@test.com");
        assert!(booking["booking_id"].is_i64());
        assert!(booking["class_name"].is_string());
    }

    let (status, body) = send(&app.router, get("/bookings?email=x@test.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = send(&app.router, get("/bookings")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_bookings_repeated_email_uses_first() {
    let app = create_test_app(&default_classes()).await;
    send(&app.router, post_json("/book", booking_body(1, "a@test.com"))).await;
    send(&app.router, post_json("/book", booking_body(2, "b@test.com"))).await;

    let uri = "/bookings?email=a@test.com&email=b@test.com";
    let (status, body) = send(&app.router, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["client_email"], "a@test.com");
}

fn temp_db_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("fitbook-{}-{}.db", std::process::id(), nanos))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_bookings_on_file_database() {
    let path = temp_db_path();
    let db = DbClient::from_url(&format!("sqlite://{}", path.display()))
        .await
        .unwrap();
    let app = create_test_app_with_db(db, &[("Spin", "2025-06-10 07:00:00", 3)]).await;

    let mut handles = Vec::new();
    for i in 0..40 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let body = booking_body(1, &format!("c{}@test.com", i));
            send(&router, post_json("/book", body)).await.0.as_u16()
        }));
    }
    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            201 => created += 1,
            409 => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!((created, conflicts), (3, 37));

    let class = app.state.classes.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(class.available_slots, 0);
    assert_eq!(app.state.bookings.count_for_class(1).await.unwrap(), 3);

    app.state.db.pool().close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

#[tokio::test]
async fn test_change_timezone_rebases_classes() {
    let app = create_test_app(&default_classes()).await;

    let (status, body) = send(
        &app.router,
        post_json("/admin/change_timezone", json!({ "new_timezone": "UTC" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "All class times updated to new base timezone: UTC" })
    );

    let (_, body) = send(&app.router, get("/timezone")).await;
    assert_eq!(body, json!({ "base_timezone": "UTC" }));

    let (_, in_utc) = send(&app.router, get("/classes?timezone=UTC")).await;
    let (_, in_kolkata) = send(&app.router, get("/classes?timezone=Asia/Kolkata")).await;
    assert_eq!(in_utc[0]["datetime"], "2025-06-10 01:30:00");
    assert_eq!(in_kolkata[0]["datetime"], "2025-06-10 07:00:00");
    assert_ne!(in_utc[0]["datetime"], in_kolkata[0]["datetime"]);
}

#[tokio::test]
async fn test_change_timezone_invalid_mutates_nothing() {
    let app = create_test_app(&default_classes()).await;
    let before = app.state.classes.find_all().await.unwrap();

    let (status, body) = send(
        &app.router,
        post_json("/change_timezone", json!({ "new_timezone": "Invalid/Zone" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid timezone" }));

    let (status, body) = send(&app.router, post_json("/change_timezone", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": ["Missing new_timezone in request body"] }));

    let (status, _) = send(&app.router, post_raw("/change_timezone", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.state.classes.find_all().await.unwrap(), before);
    let (_, body) = send(&app.router, get("/timezone")).await;
    assert_eq!(body, json!({ "base_timezone": "Asia/Kolkata" }));
}

#[tokio::test]
async fn test_booked_at_uses_base_timezone_after_rebase() {
    let app = create_test_app(&default_classes()).await;
    send(
        &app.router,
        post_json("/change_timezone", json!({ "new_timezone": "UTC" })),
    )
    .await;

    let (status, _) = send(&app.router, post_json("/book", booking_body(1, "z@test.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let rows = app.state.bookings.find_with_class(Some("z@test.com")).await.unwrap();
    let stored = chrono::NaiveDateTime::parse_from_str(&rows[0].booked_at, "%Y-%m-%d %H:%M:%S")
        .unwrap();
    let drift = (chrono::Utc::now().naive_utc() - stored).num_seconds().abs();
    assert!(drift < 60, "booked_at {} is not UTC", rows[0].booked_at);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(&[]).await;
    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "database": "ok" }));
}
