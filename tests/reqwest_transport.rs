use launchdarkly_provider::{
    Error, FeatureFlagState, ProjectState, Provider, ProviderConfig, Resource,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run `operation` against the mock server on a blocking thread. The blocking client must not
/// be created or dropped on the async runtime.
async fn blocking<T: Send + 'static>(
    server: &MockServer,
    operation: impl FnOnce(&Provider) -> T + Send + 'static,
) -> T {
    let _ = env_logger::builder().is_test(true).try_init();
    let base_url = format!("{}/api/v2/", server.uri());
    tokio::task::spawn_blocking(move || {
        let provider = ProviderConfig::from_access_token("api-token")
            .base_url(base_url)
            .retry_delay(|_: std::time::Duration| {})
            .to_provider()
            .unwrap();
        operation(&provider)
    })
    .await
    .unwrap()
}

fn flag() -> FeatureFlagState {
    FeatureFlagState {
        id: Some("flag".to_owned()),
        project_key: "proj".to_owned(),
        key: "flag".to_owned(),
        name: "Flag".to_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn reads_with_authenticated_bodiless_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/projects/proj"))
        .and(header("Authorization", "api-token"))
        .and(header("Content-Type", "application/json; charset=utf-8"))
        .and(body_string("null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "5f0c",
            "key": "proj",
            "name": "Project",
            "environments": [{
                "key": "production",
                "name": "Production",
                "color": "417505",
                "apiKey": "sdk-1",
                "mobileKey": "mob-1",
            }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = blocking(&server, |provider| ProjectState::import("proj", provider))
        .await
        .unwrap();

    assert_eq!(project.id.as_deref(), Some("proj"));
    assert_eq!(project.name, "Project");
}

#[tokio::test]
async fn retries_rate_limited_flag_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/flags/proj/flag"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/flags/proj/flag"))
        .and(body_json(json!([
            {"op": "replace", "path": "/name", "value": "Flag"},
            {"op": "replace", "path": "/description", "value": ""},
            {"op": "replace", "path": "/temporary", "value": true},
            {"op": "replace", "path": "/includeInSnippet", "value": false},
            {"op": "replace", "path": "/tags", "value": []},
            {"op": "replace", "path": "/customProperties", "value": {}},
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "flag"})))
        .expect(1)
        .mount(&server)
        .await;

    blocking(&server, |provider| flag().update(provider))
        .await
        .unwrap();
}

#[tokio::test]
async fn unexpected_status_carries_request_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/flags/proj/flag"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let err = blocking(&server, |provider| flag().delete(provider))
        .await
        .unwrap_err();
    let uri = server.uri();

    match err {
        Error::UnexpectedStatus {
            method,
            url,
            status,
            body,
        } => {
            assert_eq!(method, "DELETE");
            assert_eq!(url, format!("{uri}/api/v2/flags/proj/flag"));
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_of_missing_flag_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/flags/proj/flag"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let state = blocking(&server, |provider| {
        let mut state = flag();
        state.delete(provider).map(|()| state)
    })
    .await
    .unwrap();

    assert_eq!(state.id, None);
}

#[test]
fn unreachable_api_is_a_network_error() {
    let provider = ProviderConfig::from_access_token("api-token")
        .base_url("http://127.0.0.1:1/api/v2")
        .to_provider()
        .unwrap();

    let err = ProjectState::lookup(&provider, "proj").unwrap_err();
    assert!(matches!(err, Error::Network(_)), "{err:?}");
}
