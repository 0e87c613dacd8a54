use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use surge_core::auth::TokenSource;
use surge_core::workflows::{WorkflowRef, WorkflowsClient};
use surge_core::SurgeError;

fn workflow_ref() -> WorkflowRef {
    WorkflowRef {
        project: "demo".to_string(),
        location: "northamerica-south1".to_string(),
        workflow: "workflow-alloydb-run".to_string(),
    }
}

fn executions_path() -> &'static str {
    "/v1/projects/demo/locations/northamerica-south1/workflows/workflow-alloydb-run/executions"
}

fn client(server: &MockServer) -> WorkflowsClient {
    WorkflowsClient::new(TokenSource::Fixed("test-token".to_string())).with_base_url(server.uri())
}

#[tokio::test]
async fn create_execution_posts_once_and_returns_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(executions_path()))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/locations/northamerica-south1/workflows/workflow-alloydb-run/executions/abc",
            "state": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let execution = client(&server)
        .create_execution(&workflow_ref(), None)
        .await
        .expect("execution");

    assert!(execution.name.ends_with("/executions/abc"));
    assert_eq!(execution.state.as_deref(), Some("ACTIVE"));
}

#[tokio::test]
async fn create_execution_forwards_json_argument() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(executions_path()))
        .and(body_json(json!({ "argument": "{\"clientId\": 7}" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "executions/with-arg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let execution = client(&server)
        .create_execution(&workflow_ref(), Some("{\"clientId\": 7}".to_string()))
        .await
        .expect("execution");

    assert_eq!(execution.name, "executions/with-arg");
}

#[tokio::test]
async fn create_execution_propagates_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(executions_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine exploded"))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_execution(&workflow_ref(), None)
        .await
        .expect_err("remote failure");

    match err {
        SurgeError::Remote {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "engine exploded");
        }
        other => panic!("expected Remote error, got {other:?}"),
    }
}
