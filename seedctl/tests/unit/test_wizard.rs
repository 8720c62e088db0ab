//! Wizard navigation and submission tests

use std::sync::Arc;
use std::time::Duration;

use mockito::Server;

use openapi_client::models::{ApplicationTemplate, RepoStructure};

use seedctl::authn::session::{Session, SessionManager, SessionStore};
use seedctl::errors::SeedError;
use seedctl::filesys::file::File;
use seedctl::http::HttpClient;
use seedctl::stores::wizard::WizardStore;
use seedctl::wizard::state::{Attachment, EnvInfo, ServerInfo, SourceInfo};
use seedctl::wizard::steps::StepError;

fn source() -> SourceInfo {
    SourceInfo {
        gitlab_id: 3,
        repo_url: "https://example.com/g/shop.git".to_string(),
        default_branch: "main".to_string(),
        structure: RepoStructure::Mono,
        client_name: "web".to_string(),
        server_name: "api".to_string(),
    }
}

fn redis() -> ApplicationTemplate {
    ApplicationTemplate {
        image_name: "redis".to_string(),
        default_ports: vec![6379],
        description: "In-memory store".to_string(),
        image_envs: vec![],
    }
}

/// A store with every step filled, backed by real files in `dir`
async fn complete_store(dir: &std::path::Path) -> WizardStore {
    for name in ["key.pem", "front.env", "back.env"] {
        std::fs::write(dir.join(name), format!("{name} contents")).unwrap();
    }

    let mut store = WizardStore::load(File::new(dir.join("wizard.json"))).await;
    store.set_source(source());
    store.set_server(ServerInfo {
        ip: "192.168.0.10".to_string(),
        pem: Some(Attachment::local(dir.join("key.pem"))),
    });
    store.add_app(&redis(), "7");
    store.set_env(EnvInfo {
        front_env: Some(Attachment::local(dir.join("front.env"))),
        back_env: Some(Attachment::local(dir.join("back.env"))),
        ..EnvInfo::default()
    });
    store
}

#[tokio::test]
async fn test_next_is_blocked_until_the_step_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = WizardStore::load(File::new(dir.path().join("wizard.json"))).await;

    assert_eq!(
        store.next().unwrap_err(),
        StepError::MissingField {
            field: "Repository"
        }
    );
    assert_eq!(store.wizard().current_id(), 1);

    store.set_source(source());
    assert_eq!(store.next().unwrap().slug, "server");

    store.set_server(ServerInfo {
        ip: "300.1.1.1".to_string(),
        pem: Some(Attachment::local(dir.path().join("key.pem"))),
    });
    assert!(matches!(store.next(), Err(StepError::InvalidIp(_))));
    assert_eq!(store.wizard().current_id(), 2);

    assert_eq!(store.prev().slug, "gitlab");
    assert_eq!(store.prev().slug, "gitlab");
}

#[tokio::test]
async fn test_goto_validates_intermediate_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = WizardStore::load(File::new(dir.path().join("wizard.json"))).await;
    store.set_source(source());

    // The server step is empty, so the jump stops there
    tokio_test::assert_err!(store.goto("env"));
    assert_eq!(store.wizard().current_id(), 2);

    let mut store = complete_store(dir.path()).await;
    assert_eq!(tokio_test::assert_ok!(store.goto("complete")).id, 5);
    assert!(store.wizard().is_last());
    assert_eq!(store.wizard().progress_percent(), 100);
    assert_eq!(store.goto("gitlab").unwrap().id, 1);
}

#[tokio::test]
async fn test_submit_success_clears_the_wizard() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = complete_store(dir.path()).await;
    store.save().await.unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/projects")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"","data":{"id":21,"projectName":"shop","createdAt":"2025-05-01T10:00:00"}}"#)
        .create_async()
        .await;
    let session = Arc::new(SessionManager::in_memory(Some(Session::new("a", "r"))));
    let client = HttpClient::new(&server.url(), Duration::from_secs(5))
        .unwrap()
        .with_session(session as Arc<dyn SessionStore>);

    let created = tokio_test::assert_ok!(seedctl::wizard::submit::submit(&mut store, &client).await);

    assert_eq!(created.map(|p| p.id), Some(21));
    assert!(store.state().apps.is_empty());
    assert_eq!(store.wizard().current_id(), 1);
    assert!(!dir.path().join("wizard.json").exists());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_failure_keeps_the_wizard() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = complete_store(dir.path()).await;

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/projects")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let client = HttpClient::new(&server.url(), Duration::from_secs(5)).unwrap();

    let result = seedctl::wizard::submit::submit(&mut store, &client).await;

    assert!(matches!(result, Err(SeedError::HttpStatus { status: 500, .. })));
    assert_eq!(store.state().apps.len(), 1);
    assert_eq!(store.state().server.ip, "192.168.0.10");
}

#[tokio::test]
async fn test_submit_requires_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = complete_store(dir.path()).await;
    let mut server_info = store.state().server.clone();
    server_info.pem = Attachment::remote("/srv/keys/key.pem");
    store.set_server(server_info);

    let client = HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let result = seedctl::wizard::submit::submit(&mut store, &client).await;

    assert!(matches!(
        result,
        Err(SeedError::ValidationError(StepError::MissingFile(_)))
    ));
}
