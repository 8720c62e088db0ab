//! Persisted store tests

use std::time::Duration;

use mockito::Server;

use seedctl::filesys::file::File;
use seedctl::http::HttpClient;
use seedctl::stores::projects::{ProjectStore, LOAD_ERROR};
use seedctl::stores::theme::{ThemeMode, ThemeStore};
use seedctl::stores::user::UserStore;

const TWO_PROJECTS: &str = r#"{"success":true,"message":"","data":[
    {"id":1,"projectName":"web","createdAt":"2025-05-01T10:00:00","httpsEnabled":true,"buildStatus":"SUCCESS"},
    {"id":2,"projectName":"api","createdAt":"2025-05-02T10:00:00","buildStatus":null}
]}"#;

#[tokio::test]
async fn test_project_list_is_cached_until_forced() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::new(dir.path().join("projects.json"));

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/projects")
        .with_header("content-type", "application/json")
        .with_body(TWO_PROJECTS)
        .expect(2)
        .create_async()
        .await;
    let client = HttpClient::new(&server.url(), Duration::from_secs(5)).unwrap();

    let mut store = ProjectStore::load(file.clone()).await;
    assert_eq!(store.load_projects(&client, false).await.len(), 2);
    assert!(store.fetched_at().is_some());
    assert!(!store.is_loading());

    // A second process sees the cache without hitting the backend
    let mut reloaded = ProjectStore::load(file.clone()).await;
    assert_eq!(reloaded.projects().len(), 2);
    assert_eq!(reloaded.load_projects(&client, false).await[0].project_name, "web");

    reloaded.load_projects(&client, true).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_project_load_failure_keeps_cache() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::new(dir.path().join("projects.json"));

    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/projects")
        .with_header("content-type", "application/json")
        .with_body(TWO_PROJECTS)
        .create_async()
        .await;
    let client = HttpClient::new(&server.url(), Duration::from_secs(5)).unwrap();
    let mut store = ProjectStore::load(file).await;
    store.load_projects(&client, false).await;
    ok.remove_async().await;

    server
        .mock("GET", "/projects")
        .with_status(503)
        .create_async()
        .await;
    let count = store.load_projects(&client, true).await.len();

    assert_eq!(count, 2);
    assert_eq!(store.error(), Some(LOAD_ERROR));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_invalidate_drops_cache_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/projects")
        .with_header("content-type", "application/json")
        .with_body(TWO_PROJECTS)
        .create_async()
        .await;
    let client = HttpClient::new(&server.url(), Duration::from_secs(5)).unwrap();

    let mut store = ProjectStore::load(File::new(&path)).await;
    store.load_projects(&client, false).await;
    assert!(path.exists());

    store.invalidate().await.unwrap();
    assert!(store.projects().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_user_fetch_failure_clears_user() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::new(dir.path().join("user.json"));

    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/users/me")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"","data":{"userId":5,"name":"dev@example.com","username":"dev"}}"#)
        .create_async()
        .await;
    let client = HttpClient::new(&server.url(), Duration::from_secs(5)).unwrap();

    let mut store = UserStore::load(file.clone()).await;
    assert!(store.is_hydrated());
    assert_eq!(store.fetch_user(&client).await.unwrap().user_id, Some(5));
    assert_eq!(
        UserStore::load(file.clone()).await.user().map(|u| u.username.as_str()),
        Some("dev")
    );
    ok.remove_async().await;

    server
        .mock("GET", "/users/me")
        .with_status(401)
        .create_async()
        .await;
    assert!(store.fetch_user(&client).await.is_err());
    assert!(store.user().is_none());
    assert!(UserStore::load(file).await.user().is_none());
}

#[tokio::test]
async fn test_theme_persists_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let file = File::new(dir.path().join("theme.json"));

    let mut store = ThemeStore::load(file.clone()).await;
    assert_eq!(store.mode(), None);
    assert_eq!(store.effective_mode(), ThemeMode::Dark);
    assert_eq!(store.toggle_mode(), ThemeMode::Light);
    store.save().await.unwrap();

    let store = ThemeStore::load(file).await;
    assert_eq!(store.mode(), Some(ThemeMode::Light));
}
