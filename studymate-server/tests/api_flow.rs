//! End-to-end API flows against the in-memory store

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use studymate_server::{build_router, AppState, ServerConfig};

fn app() -> Router {
    build_router(AppState::in_memory(), &ServerConfig::default()).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn partner_lifecycle() {
    let app = app();
    let payload = json!({"name": "Alice", "subject": "Math", "experience": 3, "partnerCount": 0});

    let (status, created) = send(&app, "POST", "/partners", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["success"], json!(true));
    let id = created["insertedId"].as_str().unwrap().to_owned();

    let (status, partner) = send(&app, "GET", &format!("/partners/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(partner["_id"], json!(id));
    assert_eq!(partner["name"], json!("Alice"));
    assert_eq!(partner["subject"], json!("Math"));
    assert_eq!(partner["experience"], json!(3));
    assert_eq!(partner["partnerCount"], json!(0));

    let (status, body) = send(&app, "PATCH", &format!("/partners/{}/increase-count", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let (_, partner) = send(&app, "GET", &format!("/partners/{}", id), None).await;
    assert_eq!(partner["partnerCount"], json!(1));

    let (status, _) = send(&app, "PATCH", &format!("/partners/{}/decrease-count", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, partner) = send(&app, "GET", &format!("/partners/{}", id), None).await;
    assert_eq!(partner["partnerCount"], json!(0));

    let (status, body) = send(&app, "PATCH", &format!("/partners/{}/decrease-count", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));
    let (_, partner) = send(&app, "GET", &format!("/partners/{}", id), None).await;
    assert_eq!(partner["partnerCount"], json!(0));
}

#[tokio::test]
async fn unknown_partner_is_404() {
    let app = app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/partners/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", &format!("/partners/{}/increase-count", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn caller_supplied_id_is_ignored() {
    let app = app();
    let (_, created) = send(&app, "POST", "/partners", Some(json!({"_id": "mine", "name": "Bo"}))).await;
    let id = created["insertedId"].as_str().unwrap();
    assert_ne!(id, "mine");

    let (_, partner) = send(&app, "GET", &format!("/partners/{}", id), None).await;
    assert_eq!(partner["_id"], json!(id));
}

#[tokio::test]
async fn list_filters_and_sorts() {
    let app = app();
    for (subject, experience) in [("Mathematics", 5), ("Physics", 2), ("Applied Math", 1), ("math club", 8)] {
        send(
            &app,
            "POST",
            "/partners",
            Some(json!({"subject": subject, "experience": experience})),
        )
        .await;
    }

    let (status, partners) = send(&app, "GET", "/partners?subject=math", None).await;
    assert_eq!(status, StatusCode::OK);
    let subjects: Vec<_> = partners.as_array().unwrap().iter().map(|p| p["subject"].clone()).collect();
    assert_eq!(subjects, vec![json!("Mathematics"), json!("Applied Math"), json!("math club")]);

    let (_, asc) = send(&app, "GET", "/partners?sort=asc", None).await;
    let asc: Vec<i64> = asc.as_array().unwrap().iter().map(|p| p["experience"].as_i64().unwrap()).collect();
    assert!(asc.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(asc.len(), 4);

    let (_, desc) = send(&app, "GET", "/partners?subject=MATH&sort=desc", None).await;
    let desc: Vec<i64> = desc.as_array().unwrap().iter().map(|p| p["experience"].as_i64().unwrap()).collect();
    assert_eq!(desc, vec![8, 5, 1]);
}

#[tokio::test]
async fn partner_request_lifecycle() {
    let app = app();
    let email = "sam@example.com";

    let (status, created) = send(
        &app,
        "POST",
        "/partner-requests",
        Some(json!({
            "requestedBy": email,
            "partnerName": "Alice",
            "subject": "Math",
            "studyMode": "Online"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["insertedId"].as_str().unwrap().to_owned();

    let (_, requests) = send(&app, "GET", &format!("/partner-requests?email={}", email), None).await;
    let requests = requests.as_array().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let requested_at = requests[0]["requestedAt"].clone();
    assert!(requested_at.is_string());

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/partner-requests/{}", id),
        Some(json!({"subject": "Biology", "partnerName": "", "studyMode": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"success": true, "updatedFields": {"subject": "Biology"}}));

    let (_, requests) = send(&app, "GET", &format!("/partner-requests?email={}", email), None).await;
    assert_eq!(requests[0]["subject"], json!("Biology"));
    assert_eq!(requests[0]["partnerName"], json!("Alice"));
    assert_eq!(requests[0]["studyMode"], json!("Online"));
    assert_eq!(requests[0]["requestedAt"], requested_at);

    let (status, body) = send(&app, "DELETE", &format!("/partner-requests/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, _) = send(&app, "DELETE", &format!("/partner-requests/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_without_email_are_empty() {
    let app = app();
    send(
        &app,
        "POST",
        "/partner-requests",
        Some(json!({"requestedBy": "sam@example.com"})),
    )
    .await;

    let (status, requests) = send(&app, "GET", "/partner-requests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(requests, json!([]));

    let (_, requests) = send(&app, "GET", "/partner-requests?email=", None).await;
    assert_eq!(requests, json!([]));
}

#[tokio::test]
async fn request_id_errors() {
    let app = app();

    let (status, _) = send(&app, "DELETE", "/partner-requests/12345", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/partner-requests/{}", missing),
        Some(json!({"subject": "Chemistry"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_request_keeps_others() {
    let app = app();
    send(
        &app,
        "POST",
        "/partner-requests",
        Some(json!({"requestedBy": "kim@example.com"})),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/partner-requests/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, requests) = send(&app, "GET", "/partner-requests?email=kim@example.com", None).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn wrong_method_on_known_path_is_json_404() {
    let app = app();

    let (status, body) = send(&app, "DELETE", "/partners", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));

    let (status, body) = send(&app, "PUT", "/partner-requests", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn bad_query_string_is_json_400() {
    let app = app();

    let (status, body) = send(&app, "GET", "/partners?subject=a&subject=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation_error"));

    let (status, body) = send(&app, "GET", "/partner-requests?email=a&email=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation_error"));
}

#[tokio::test]
async fn patch_without_body_is_empty_update() {
    let app = app();
    let (_, created) = send(
        &app,
        "POST",
        "/partner-requests",
        Some(json!({"partnerName": "Lee", "requestedBy": "sam@example.com"})),
    )
    .await;
    let id = created["insertedId"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, "PATCH", &format!("/partner-requests/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "updatedFields": {}}));

    let (_, requests) = send(&app, "GET", "/partner-requests?email=sam@example.com", None).await;
    assert_eq!(requests[0]["partnerName"], json!("Lee"));

    let missing = "00000000-0000-4000-8000-000000000000";
    let (status, _) = send(&app, "PATCH", &format!("/partner-requests/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
