//! End-to-end HTTP tests over the in-memory repository.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use student_records::{app, AppError, AppState, InMemoryStudentRepository, StudentRepository, StudentTx, TxMode};
use tower::ServiceExt;

fn test_app() -> Router {
    let repo = Arc::new(InMemoryStudentRepository::new());
    app(AppState::new(repo), 64 * 1024)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn student(name: &str, email: &str, course: &str, age: i64) -> Value {
    json!({ "name": name, "email": email, "course": course, "age": age })
}

#[tokio::test]
async fn student_lifecycle_scenario() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/api/students", Some(student("Ann Lee", "ann@x.com", "CS", 20))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Ann Lee", "email": "ann@x.com", "course": "CS", "age": 20 })
    );

    let (status, body) = send(&app, Method::POST, "/api/students", Some(student("Ann Two", "ann@x.com", "Math", 30))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, body) = send(&app, Method::GET, "/api/students?search=CS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["content"][0]["id"], 1);

    let (status, body) = send(&app, Method::PUT, "/api/students/1", Some(student("Ann Lee", "ann@x.com", "CS", 17))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "age");
    assert_eq!(body["error"]["details"][0]["message"], "Age must be at least 18");

    let (status, body) = send(&app, Method::DELETE, "/api/students/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, "/api/students/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Student not found with id: 1");
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = test_app();
    send(&app, Method::POST, "/api/students", Some(student("Ann Lee", "ann@x.com", "CS", 20))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/students/1",
        Some(student("Ann Smith", "smith@x.com", "Biology", 21)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Ann Smith", "email": "smith@x.com", "course": "Biology", "age": 21 })
    );

    let (status, body) = send(&app, Method::GET, "/api/students/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "smith@x.com");
}

#[tokio::test]
async fn update_to_taken_email_conflicts() {
    let app = test_app();
    send(&app, Method::POST, "/api/students", Some(student("Ann Lee", "ann@x.com", "CS", 20))).await;
    send(&app, Method::POST, "/api/students", Some(student("Bob Ray", "bob@x.com", "CS", 22))).await;

    let (status, _) = send(&app, Method::PUT, "/api/students/2", Some(student("Bob Ray", "ann@x.com", "CS", 22))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::PUT, "/api/students/2", Some(student("Bob Ray", "bob@x.com", "CS", 23))).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(Method::GET, "/api/students/99", None)]
#[case(Method::DELETE, "/api/students/99", None)]
#[case(Method::PUT, "/api/students/99", Some(student("Ann Lee", "ann@x.com", "CS", 20)))]
#[tokio::test]
async fn unknown_id_is_not_found(#[case] method: Method, #[case] uri: &str, #[case] body: Option<Value>) {
    let app = test_app();
    let (status, body) = send(&app, method, uri, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn pagination_reports_totals() {
    let app = test_app();
    for i in 0..5 {
        let email = format!("s{i}@x.com");
        send(&app, Method::POST, "/api/students", Some(student(&format!("Student {i}"), &email, "CS", 20))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/students?page=0&size=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_elements"], 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["first"], true);
    assert_eq!(body["last"], false);

    let (_, body) = send(&app, Method::GET, "/api/students?page=0&size=2&sortBy=id&sortDir=desc", None).await;
    assert_eq!(body["content"][0]["id"], 5);
    assert_eq!(body["content"][1]["id"], 4);

    let (_, body) = send(&app, Method::GET, "/api/students?page=2&size=2", None).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
    assert_eq!(body["last"], true);
}

#[tokio::test]
async fn search_is_case_insensitive_and_may_be_empty() {
    let app = test_app();
    send(&app, Method::POST, "/api/students", Some(student("Ann Lee", "ann@x.com", "Computer Science", 20))).await;
    send(&app, Method::POST, "/api/students", Some(student("Bob Ray", "bob@x.com", "History", 22))).await;

    let (_, body) = send(&app, Method::GET, "/api/students?search=computer", None).await;
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["content"][0]["name"], "Ann Lee");

    let (_, body) = send(&app, Method::GET, "/api/students?search=RAY", None).await;
    assert_eq!(body["content"][0]["name"], "Bob Ray");

    let (status, body) = send(&app, Method::GET, "/api/students?search=chemistry", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_elements"], 0);
    assert_eq!(body["content"], json!([]));

    // blank search lists everything
    let (_, body) = send(&app, Method::GET, "/api/students?search=%20%20", None).await;
    assert_eq!(body["total_elements"], 2);
}

#[tokio::test]
async fn search_keyword_keeps_surrounding_spaces() {
    let app = test_app();
    send(&app, Method::POST, "/api/students", Some(student("Ann Lee", "ann@x.com", "CS", 20))).await;
    send(&app, Method::POST, "/api/students", Some(student("Joann", "joann@x.com", "CS", 22))).await;

    let (_, body) = send(&app, Method::GET, "/api/students?search=ann", None).await;
    assert_eq!(body["total_elements"], 2);

    let (_, body) = send(&app, Method::GET, "/api/students?search=Ann%20", None).await;
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["content"][0]["name"], "Ann Lee");
}

#[tokio::test]
async fn oversized_page_is_capped_not_rejected() {
    let app = test_app();
    for i in 0..3 {
        let email = format!("s{i}@x.com");
        send(&app, Method::POST, "/api/students", Some(student(&format!("Student {i}"), &email, "CS", 20))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/students?size=150", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["size"], 100);
    assert_eq!(body["content"].as_array().unwrap().len(), 3);
    assert_eq!(body["total_pages"], 1);
}

#[tokio::test]
async fn missing_fields_are_all_reported() {
    let app = test_app();
    let (status, body) = send(&app, Method::POST, "/api/students", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "course", "age"]);
}

#[rstest]
#[case("/api/students/abc")]
#[case("/api/students?page=-1")]
#[case("/api/students?size=0")]
#[case("/api/students?sortBy=password")]
#[tokio::test]
async fn malformed_requests_are_bad_requests(#[case] uri: &str) {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/students")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_ready() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "student-records");
}

struct UnreachableStorage;

#[async_trait]
impl StudentRepository for UnreachableStorage {
    async fn begin(&self, _mode: TxMode) -> Result<Box<dyn StudentTx>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn unreachable_storage_is_not_ready() {
    let app = app(AppState::new(Arc::new(UnreachableStorage)), 64 * 1024);

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "database": "unavailable" }));

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/students/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "internal server error");
}
