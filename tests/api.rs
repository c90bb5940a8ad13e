//! HTTP surface driven through the router without binding a socket

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use countdown::{create_router, TimerEventType, TimerManager};

use common::Recorder;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn start_extend_find_and_cancel_over_http() {
    let manager = TimerManager::new();
    let kitchen = Recorder::attach(&manager, Some("kitchen"));
    let app = create_router(manager.clone());

    let (status, body) = call(
        &app,
        Method::POST,
        "/timers",
        Some(json!({"minutes": 5, "name": "pasta", "device_id": "kitchen"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seconds_left"], 300);
    let timer_id = body["timer_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/timers/{timer_id}/add"),
        Some(json!({"minutes": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seconds_left"], 360);

    let (status, body) = call(
        &app,
        Method::POST,
        "/timers/find",
        Some(json!({"name": " Pasta", "device_id": "kitchen"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer_id"], timer_id.as_str());

    let (status, body) = call(&app, Method::GET, "/timers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timers"].as_array().unwrap().len(), 1);
    assert_eq!(body["timers"][0]["start_minutes"], 5);

    let (status, _) = call(&app, Method::DELETE, &format!("/timers/{timer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::POST,
        "/timers/find",
        Some(json!({"name": "pasta", "device_id": "kitchen"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    assert_eq!(
        kitchen.types(),
        vec![TimerEventType::Started, TimerEventType::Updated, TimerEventType::Cancelled]
    );
}

#[tokio::test]
async fn remove_time_shortens_the_timer() {
    let manager = TimerManager::new();
    let app = create_router(manager.clone());

    let (_, body) = call(&app, Method::POST, "/timers", Some(json!({"hours": 1}))).await;
    let timer_id = body["timer_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/timers/{timer_id}/remove"),
        Some(json!({"minutes": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let left = body["seconds_left"].as_u64().unwrap();
    assert!((1799..=1800).contains(&left), "unexpected seconds left: {left}");
}

#[tokio::test]
async fn cancelling_unknown_timer_is_not_an_error() {
    let app = create_router(TimerManager::new());
    let (status, _) = call(&app, Method::DELETE, "/timers/does-not-exist", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_active_timers() {
    let manager = TimerManager::new();
    let app = create_router(manager.clone());
    call(&app, Method::POST, "/timers", Some(json!({"seconds": 90}))).await;

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_timers"], 1);
}
