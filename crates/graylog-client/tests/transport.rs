use graylog_client::{ClientConfig, GraylogClient, Method};
use graylog_core::{ErrorCategory, GraylogError};
use serde_json::{Value, json};
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GraylogClient {
    let config = ClientConfig::new(&server.uri(), "admin", "secret")
        .unwrap()
        .with_x_requested_by("graylog-rs-tests");
    GraylogClient::new(config).unwrap()
}

#[tokio::test]
async fn sends_auth_and_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputs"))
        .and(basic_auth("admin", "secret"))
        .and(header("X-Requested-By", "graylog-rs-tests"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "inputs": []})))
        .expect(1)
        .mount(&server)
        .await;

    let value: Value = client_for(&server).get("system/inputs").await.unwrap();
    assert_eq!(value["total"], json!(0));
}

#[tokio::test]
async fn default_requested_by_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-Requested-By", "terraform-provider-graylog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        GraylogClient::new(ClientConfig::new(&server.uri(), "admin", "secret").unwrap()).unwrap();
    client
        .call(Method::Get, "system/inputs", None::<&()>)
        .await
        .unwrap();
}

#[tokio::test]
async fn serializes_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/system/inputs"))
        .and(body_json(json!({"title": "t", "port": 514})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "in1"})))
        .expect(1)
        .mount(&server)
        .await;

    let value: Value = client_for(&server)
        .post("system/inputs", &json!({"title": "t", "port": 514}))
        .await
        .unwrap();
    assert_eq!(value, json!({"id": "in1"}));
}

#[tokio::test]
async fn non_success_status_is_api_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"message\":\"bad\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get::<Value>("system/inputs/x")
        .await
        .unwrap_err();
    match &err {
        GraylogError::Api { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body, "{\"message\":\"bad\"}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "API request failed with status 400: {\"message\":\"bad\"}"
    );
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client_for(&server)
        .call(Method::Delete, "system/inputs/x", None::<&()>)
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn undecodable_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get::<Value>("system/inputs")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let err = client.get::<Value>("system/inputs").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
}
