// Integration tests for instance creation and termination
// All provisioning goes through the mock provider; no cloud calls.

mod common;

use axum_test::TestServer;
use common::{create_test_app, running_instance};
use serde_json::json;
use solovm_providers::mock::MockProvider;
use std::sync::Arc;

#[tokio::test]
async fn test_create_requires_instance_type() {
    let provider = Arc::new(MockProvider::new());
    let server = TestServer::new(create_test_app(provider.clone(), 80)).unwrap();

    let response = server.post("/create").json(&json!({})).await;

    // Missing parameters are business outcomes: transport status stays 200.
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "error");
    assert_eq!(
        body["message"],
        "instance_type is not provided in the request."
    );
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn test_create_launches_single_instance() {
    let provider = Arc::new(MockProvider::new());
    let server = TestServer::new(create_test_app(provider.clone(), 80)).unwrap();

    let response = server
        .post("/create")
        .json(&json!({ "instance_type": "t3.micro" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "success");
    assert!(body["data"]["instanceId"]
        .as_str()
        .unwrap()
        .starts_with("i-"));
    assert_eq!(body["data"]["state"], "pending");
    assert!(body["data"]["publicIp"].is_null());

    assert_eq!(provider.create_calls(), 1);
    let user_data = provider.last_user_data().unwrap();
    assert!(user_data.contains("instance type t3.micro"));
}

#[tokio::test]
async fn test_create_rejected_while_instance_active() {
    let provider = Arc::new(
        MockProvider::new().with_instance(running_instance("i-0aa11bb22cc33dd44", "203.0.113.9")),
    );
    let server = TestServer::new(create_test_app(provider.clone(), 80)).unwrap();

    let response = server
        .post("/create")
        .json(&json!({ "instance_type": "t3.micro" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("i-0aa11bb22cc33dd44"));
    assert!(message.contains("already running"));
    assert!(message.contains("203.0.113.9"));

    // The guard must short-circuit before any provider creation call.
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn test_create_rejects_unknown_instance_type() {
    let provider = Arc::new(MockProvider::new());
    let server = TestServer::new(create_test_app(provider.clone(), 80)).unwrap();

    let response = server
        .post("/create")
        .json(&json!({ "instance_type": "bogus.large" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "error");
    assert!(body["message"].as_str().unwrap().contains("bogus.large"));
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn test_terminate_requires_instance_id() {
    let provider = Arc::new(MockProvider::new());
    let server = TestServer::new(create_test_app(provider, 80)).unwrap();

    let response = server.delete("/terminate").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "error");
    assert_eq!(
        body["message"],
        "instance_id is not provided in the request."
    );
}

#[tokio::test]
async fn test_terminate_returns_state_transition() {
    let provider = Arc::new(
        MockProvider::new().with_instance(running_instance("i-0aa11bb22cc33dd44", "203.0.113.9")),
    );
    let server = TestServer::new(create_test_app(provider, 80)).unwrap();

    let response = server
        .delete("/terminate?instance_id=i-0aa11bb22cc33dd44")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "success");
    assert_eq!(body["data"]["instanceId"], "i-0aa11bb22cc33dd44");
    assert_eq!(body["data"]["previousState"], "running");
    assert_eq!(body["data"]["currentState"], "shutting-down");
}

#[tokio::test]
async fn test_terminate_unknown_instance_surfaces_provider_error() {
    let provider = Arc::new(MockProvider::new());
    let server = TestServer::new(create_test_app(provider, 80)).unwrap();

    let response = server.delete("/terminate?instance_id=i-deadbeef").await;

    // No local existence check: the provider's own error comes back.
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("i-deadbeef"));
    assert!(message.contains("does not exist"));
}
