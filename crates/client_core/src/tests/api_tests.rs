use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct Capture {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn spawn_api_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn login_success_parses_the_wire_profile() {
    let app = Router::new().route(
        "/api/login",
        post(|| async {
            Json(json!({
                "success": true,
                "user": {
                    "username": "boss",
                    "firstName": "Pat",
                    "lastName": "Banks",
                    "email": "boss@example.com",
                    "phone": "555-0100",
                    "role": "admin"
                }
            }))
        }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let profile = api.authenticate("boss", "pw").await.expect("login");
    assert_eq!(profile.username, "boss");
    assert_eq!(profile.first_name, "Pat");
    assert!(profile.role.is_admin());
}

#[tokio::test]
async fn login_rejection_carries_the_server_message() {
    let app = Router::new().route(
        "/api/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "message": "Invalid credentials"})),
            )
        }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let err = api.authenticate("boss", "nope").await.expect_err("must reject");
    assert!(
        matches!(err, AuthError::InvalidCredentials { ref message } if message == "Invalid credentials")
    );
}

#[tokio::test]
async fn login_rejection_without_message_uses_stock_text() {
    let app = Router::new().route(
        "/api/login",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"success": false}))) }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let err = api.authenticate("boss", "nope").await.expect_err("must reject");
    assert_eq!(err.to_string(), "Invalid username or password");
}

#[tokio::test]
async fn refused_connection_maps_to_unreachable() {
    // Bind to grab a free port, then drop it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = HttpSchedulerApi::new(format!("http://{addr}"));

    let err = api.authenticate("boss", "pw").await.expect_err("must fail");
    assert!(matches!(err, AuthError::Unreachable(_)));

    let err = api.fetch_schedules("boss").await.expect_err("must fail");
    assert!(matches!(err, FetchError::Unreachable(_)));
}

#[tokio::test]
async fn schedules_fetch_targets_the_username_and_preserves_order() {
    let (tx, rx) = oneshot::channel();
    let capture = Capture {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/api/schedules/:username",
            get(
                |State(capture): State<Capture>, Path(username): Path<String>| async move {
                    if let Some(tx) = capture.tx.lock().await.take() {
                        let _ = tx.send(json!(username));
                    }
                    Json(json!([
                        {"date": "2024-01-15", "day": "Monday", "startTime": "09:00", "endTime": "17:00"},
                        {"date": "2024-01-16", "day": "Tuesday", "startTime": "12:00", "endTime": "20:00"}
                    ]))
                },
            ),
        )
        .with_state(capture);
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let entries = api.fetch_schedules("jdoe").await.expect("fetch");
    assert_eq!(rx.await.expect("username"), json!("jdoe"));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].day, "Monday");
    assert_eq!(entries[1].start_time, "12:00");
}

#[tokio::test]
async fn forbidden_employee_fetch_maps_to_unauthorized() {
    let app = Router::new().route(
        "/api/employees",
        get(|| async { StatusCode::FORBIDDEN }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let err = api.fetch_employees().await.expect_err("must fail");
    assert!(matches!(err, FetchError::Unauthorized));
}

#[tokio::test]
async fn employees_fetch_parses_the_roster() {
    let app = Router::new().route(
        "/api/employees",
        get(|| async {
            Json(json!([
                {"username": "jdoe", "firstName": "Jane", "lastName": "Doe",
                 "email": "jdoe@example.com", "role": "employee"}
            ]))
        }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let records = api.fetch_employees().await.expect("fetch");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].first_name, "Jane");
    assert!(!records[0].role.is_admin());
}

#[tokio::test]
async fn generate_posts_the_stock_weekly_constraints() {
    let (tx, rx) = oneshot::channel();
    let capture = Capture {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/api/generate-schedule",
            post(
                |State(capture): State<Capture>, Json(payload): Json<Value>| async move {
                    if let Some(tx) = capture.tx.lock().await.take() {
                        let _ = tx.send(payload);
                    }
                    Json(json!({"success": true, "message": "Schedules generated successfully"}))
                },
            ),
        )
        .with_state(capture);
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let ack = api
        .generate_schedule(&GenerateScheduleRequest::default_weekly())
        .await
        .expect("generate");
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("Schedules generated successfully"));

    let payload = rx.await.expect("payload");
    assert_eq!(payload["maxShifts"], 5);
    assert_eq!(payload["dayRequirements"]["monday"]["opening"], 1);
    assert_eq!(payload["dayRequirements"]["friday"]["midday"], 2);
    assert_eq!(payload["dayRequirements"]["saturday"]["closing"], 2);
}

#[tokio::test]
async fn generate_rejection_passes_the_body_through() {
    let app = Router::new().route(
        "/api/generate-schedule",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "No feasible schedule found"})),
            )
        }),
    );
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let ack = api
        .generate_schedule(&GenerateScheduleRequest::default_weekly())
        .await
        .expect("business rejection is not a transport error");
    assert!(!ack.success);
    assert_eq!(ack.message.as_deref(), Some("No feasible schedule found"));
}

#[tokio::test]
async fn create_employee_submits_the_joined_name() {
    let (tx, rx) = oneshot::channel();
    let capture = Capture {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/api/employees",
            post(
                |State(capture): State<Capture>, Json(payload): Json<Value>| async move {
                    if let Some(tx) = capture.tx.lock().await.take() {
                        let _ = tx.send(payload);
                    }
                    Json(json!({"success": true}))
                },
            ),
        )
        .with_state(capture);
    let api = HttpSchedulerApi::new(spawn_api_server(app).await);

    let request = NewEmployeeRequest {
        username: "jdoe".to_string(),
        name: "Jane Doe".to_string(),
        email: "jdoe@example.com".to_string(),
        phone: None,
        password: None,
    };
    let ack = api.create_employee(&request).await.expect("create");
    assert!(ack.success);

    let payload = rx.await.expect("payload");
    assert_eq!(payload["username"], "jdoe");
    assert_eq!(payload["name"], "Jane Doe");
    // Optional fields are omitted entirely rather than sent as null.
    assert!(payload.get("phone").is_none());
}
