//! HTTP client tests against a mock backend

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use secrecy::ExposeSecret;

use seedctl::authn::session::{Session, SessionManager, SessionStore};
use seedctl::errors::SeedError;
use seedctl::http::projects::{ProjectFiles, Upload};
use seedctl::http::HttpClient;
use seedctl::wizard::payload::build_create_request;
use seedctl::wizard::state::WizardState;

fn client_for(server: &ServerGuard, session: Option<Session>) -> (HttpClient, Arc<SessionManager>) {
    let session = Arc::new(SessionManager::in_memory(session));
    let client = HttpClient::new(&server.url(), Duration::from_secs(5))
        .unwrap()
        .with_session(session.clone() as Arc<dyn SessionStore>);
    (client, session)
}

fn logged_in() -> Option<Session> {
    Some(Session::new("access-1", "refresh-1"))
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/projects")
        .match_header("authorization", "Bearer access-1")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"","data":[]}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    let projects = client.list_projects().await.unwrap();

    assert!(projects.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/me")
        .match_header("authorization", Matcher::Missing)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"","data":{"name":"dev@example.com","username":"dev"}}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server, None);
    let user = client.me().await.unwrap();

    assert_eq!(user.username, "dev");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_an_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/projects/4/detail")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"message":"Project not found","data":null}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    match client.project_detail(4).await {
        Err(SeedError::ApiError(message)) => assert_eq!(message, "Project not found"),
        other => panic!("unexpected: {:?}", other.map(|d| d.id)),
    }
}

#[tokio::test]
async fn test_unauthorized_is_an_auth_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_status(401)
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    assert!(matches!(
        client.list_projects().await,
        Err(SeedError::AuthError(_))
    ));
}

#[tokio::test]
async fn test_refresh_sends_refresh_token_and_stores_new_access_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/token/refresh")
        .match_header("refresh", "refresh-1")
        .match_header("authorization", Matcher::Missing)
        .with_header("authorization", "Bearer access-2")
        .with_body("")
        .create_async()
        .await;

    let (client, session) = client_for(&server, logged_in());
    let token = client.refresh_token().await.unwrap();

    assert_eq!(token, "access-2");
    let current = session.current().await.unwrap();
    assert_eq!(current.access_token.expose_secret(), "access-2");
    assert_eq!(current.refresh_token.expose_secret(), "refresh-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_opaque_token_is_not_refreshed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/token/refresh")
        .expect(0)
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    client.ensure_fresh_token(60).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_repository_cursor_is_followed() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/gitlab/projects")
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"message":"","data":{
                "repositories":[{"id":1,"name":"web","http_url_to_repo":"https://example.com/g/web.git"}],
                "nextCursor":"c2"}}"#,
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/gitlab/projects")
        .match_query(Matcher::UrlEncoded("cursor".into(), "c2".into()))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"message":"","data":{
                "repositories":[{"id":2,"name":"api","http_url_to_repo":"https://example.com/g/api.git","default_branch":"main"}],
                "nextCursor":null}}"#,
        )
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    let repos = client.all_repositories().await.unwrap();

    let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(repos[1].default_branch.as_deref(), Some("main"));
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_create_project_sends_multipart_parts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/projects")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="projectRequest""#.into()),
            Matcher::Regex(r#"name="clientEnvFile"; filename="front.env""#.into()),
            Matcher::Regex(r#"name="serverEnvFile"; filename="back.env""#.into()),
            Matcher::Regex(r#"name="pemFile"; filename="key.pem""#.into()),
            Matcher::Regex(r#""structure":"MONO""#.into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"message":"created","data":{"id":12,"projectName":"web","createdAt":"2025-05-01T10:00:00"}}"#,
        )
        .create_async()
        .await;

    let mut state = WizardState::default();
    state.source.repo_url = "https://example.com/g/web.git".to_string();
    state.source.client_name = "frontend".to_string();
    state.source.server_name = "backend".to_string();
    state.server.ip = "10.0.0.2".to_string();

    let (client, _) = client_for(&server, logged_in());
    let created = client
        .create_project(
            &build_create_request(&state),
            ProjectFiles {
                client_env: Upload::new("front.env", b"A=1".to_vec()),
                server_env: Upload::new("back.env", b"B=2".to_vec()),
                pem: Upload::new("key.pem", b"-----BEGIN-----".to_vec()),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.map(|p| p.id), Some(12));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_build_endpoints_are_not_enveloped() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/jenkins/3/builds")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            r##"{"builds":[{"buildNumber":8,"buildName":"#8","date":"05.01","time":"10:00","status":"SUCCESS"}],"hasNext":true,"nextStart":5}"##,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/jenkins/3/builds/8/log")
        .with_body("Started by GitLab push\nFinished: SUCCESS\n")
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    let page = client.list_builds(3, 0, 5).await.unwrap();
    assert_eq!(page.builds[0].build_number, 8);
    assert_eq!(page.next_start, Some(5));

    let log = client.build_log(3, 8).await.unwrap();
    assert!(log.ends_with("Finished: SUCCESS\n"));
}

#[tokio::test]
async fn test_status_endpoint_maps_codes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/projects/9/status")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"","data":{"serverStatus":"FAIL_WTIH_AI","isServerLive":false}}"#)
        .create_async()
        .await;

    let (client, _) = client_for(&server, logged_in());
    let status = client.project_status(9).await.unwrap();
    let report = seedctl::models::status::StatusReport::from(status);

    assert_eq!(report.status, seedctl::models::status::ServerStatus::FailWithAi);
    assert!(report.status.is_terminal());
    assert!(!report.is_server_live);
}
