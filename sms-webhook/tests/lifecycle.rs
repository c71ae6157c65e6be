//! Registration lifecycle against a mocked gateway.

use std::time::Duration;

use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smsgate::config::GatewayCredentials;
use smsgate::{GatewayClient, RegistrationState, WebhookLifecycle};

const CALLBACK: &str = "https://receiver.example.com/webhook/sms-received";

fn lifecycle_for(server: &MockServer) -> WebhookLifecycle {
    let client = GatewayClient::new(
        server.uri(),
        GatewayCredentials {
            username: "user".to_string(),
            password: "pass".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap();
    WebhookLifecycle::new(client, CALLBACK)
}

async fn mount_register(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(basic_auth("user", "pass"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": id,
            "url": CALLBACK,
            "event": "sms:received"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn deregisters_the_registered_id_exactly_once() {
    let server = MockServer::start().await;
    mount_register(&server, "abc123").await;

    Mock::given(method("DELETE"))
        .and(path("/webhooks/abc123"))
        .and(basic_auth("user", "pass"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut lifecycle = lifecycle_for(&server);

    let registration = lifecycle.register().await.unwrap().cloned().unwrap();
    assert_eq!(registration.id, "abc123");
    assert_eq!(lifecycle.state(), &RegistrationState::Registered(registration));

    lifecycle.deregister().await;
    lifecycle.deregister().await;

    assert_eq!(lifecycle.state(), &RegistrationState::Deregistered);

    let deletes: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].url.path(), "/webhooks/abc123");
}

#[tokio::test]
async fn registration_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut lifecycle = lifecycle_for(&server);

    assert!(lifecycle.register().await.is_err());
    assert_eq!(lifecycle.state(), &RegistrationState::NotRegistered);

    // Nothing to clean up
    lifecycle.deregister().await;
    let deletes = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .count();
    assert_eq!(deletes, 0);
}

#[tokio::test]
async fn deregistration_failure_is_swallowed() {
    let server = MockServer::start().await;
    mount_register(&server, "abc123").await;

    Mock::given(method("DELETE"))
        .and(path("/webhooks/abc123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut lifecycle = lifecycle_for(&server);
    lifecycle.register().await.unwrap();

    lifecycle.deregister().await;

    assert_eq!(lifecycle.state(), &RegistrationState::Deregistered);
}

#[tokio::test]
async fn register_is_only_valid_once() {
    let server = MockServer::start().await;
    mount_register(&server, "abc123").await;

    let mut lifecycle = lifecycle_for(&server);
    lifecycle.register().await.unwrap();

    assert!(lifecycle.register().await.is_err());
}
