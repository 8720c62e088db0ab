//! Project creation wizard store

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use openapi_client::models::{ApplicationTemplate, ProjectDetail, RepoStructure};

use crate::errors::SeedError;
use crate::filesys::file::File;
use crate::storage::persisted::{self, LoadOutcome, Persisted};
use crate::wizard::state::{AppEntry, EnvInfo, ServerInfo, SourceInfo, WizardState};
use crate::wizard::steps::{step_by_slug, StepDescriptor, StepError, Wizard};

/// What is written to `wizard.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardSnapshot {
    pub current_step: u8,
    pub state: WizardState,
}

impl Persisted for WizardSnapshot {
    const SCHEMA_VERSION: u32 = 1;
    const NAME: &'static str = "wizard";

    /// Unversioned files hold the bare state and no step
    fn migrate(from_version: u32, data: Value) -> Option<Self> {
        match from_version {
            0 => serde_json::from_value::<WizardState>(data)
                .ok()
                .map(|state| WizardSnapshot {
                    current_step: 1,
                    state,
                }),
            _ => None,
        }
    }
}

/// Wizard state plus position, backed by a file
pub struct WizardStore {
    file: File,
    wizard: Wizard,
    state: WizardState,
}

impl WizardStore {
    pub async fn load(file: File) -> Self {
        let (snapshot, outcome): (WizardSnapshot, _) = persisted::load(&file).await;
        if let LoadOutcome::Discarded(reason) = &outcome {
            info!("Starting a fresh wizard: {:?}", reason);
        }
        Self {
            file,
            wizard: Wizard::at(snapshot.current_step),
            state: snapshot.state,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn set_source(&mut self, source: SourceInfo) {
        self.state.source = source;
    }

    pub fn set_server(&mut self, server: ServerInfo) {
        self.state.server = server;
    }

    pub fn set_apps(&mut self, apps: Vec<AppEntry>) {
        self.state.apps = apps;
    }

    pub fn set_env(&mut self, env: EnvInfo) {
        self.state.env = env;
    }

    /// Switching layout invalidates the directory or branch names
    pub fn set_structure(&mut self, structure: RepoStructure) {
        if self.state.source.structure != structure {
            self.state.source.structure = structure;
            self.state.source.client_name.clear();
            self.state.source.server_name.clear();
        }
    }

    pub fn app_index(&self, image_name: &str) -> Option<usize> {
        self.state
            .apps
            .iter()
            .position(|app| app.image_name == image_name)
    }

    /// Add an application, or return the index of the one with the same
    /// image name.
    pub fn add_app(&mut self, template: &ApplicationTemplate, tag: &str) -> usize {
        if let Some(index) = self.app_index(&template.image_name) {
            debug!("{} already added", template.image_name);
            return index;
        }
        self.state.apps.push(AppEntry::from_template(template, tag));
        self.state.apps.len() - 1
    }

    pub fn remove_app(&mut self, index: usize) -> Option<AppEntry> {
        if index < self.state.apps.len() {
            Some(self.state.apps.remove(index))
        } else {
            None
        }
    }

    pub fn set_app_tag(&mut self, index: usize, tag: &str) -> Result<(), SeedError> {
        let app = self.app_mut(index)?;
        app.tag = tag.to_string();
        Ok(())
    }

    /// Change a port, refusing one another application already uses
    pub fn set_app_port(&mut self, index: usize, port: u16) -> Result<(), SeedError> {
        let taken = self
            .state
            .apps
            .iter()
            .enumerate()
            .any(|(i, app)| i != index && app.port == port);
        if taken {
            return Err(StepError::DuplicatePort(port).into());
        }
        self.app_mut(index)?.port = port;
        Ok(())
    }

    fn app_mut(&mut self, index: usize) -> Result<&mut AppEntry, SeedError> {
        self.state
            .apps
            .get_mut(index)
            .ok_or_else(|| SeedError::NotFound(format!("application #{}", index + 1)))
    }

    /// Validate the current step and advance
    pub fn next(&mut self) -> Result<&'static StepDescriptor, StepError> {
        self.wizard.next(&self.state)
    }

    pub fn prev(&mut self) -> &'static StepDescriptor {
        self.wizard.prev()
    }

    /// Prefill from an existing project for editing
    pub fn load_from_detail(&mut self, detail: &ProjectDetail) {
        self.state = WizardState::from(detail);
        self.wizard = Wizard::default();
    }

    /// Jump to the step with `slug`, validating every step passed on the way
    pub fn goto(&mut self, slug: &str) -> Result<&'static StepDescriptor, StepError> {
        self.wizard.goto(step_by_slug(slug).id, &self.state)
    }

    pub async fn save(&self) -> Result<(), SeedError> {
        let snapshot = WizardSnapshot {
            current_step: self.wizard.current_id(),
            state: self.state.clone(),
        };
        persisted::save(&self.file, &snapshot).await
    }

    /// Forget everything, including the file on disk
    pub async fn reset(&mut self) -> Result<(), SeedError> {
        self.state = WizardState::default();
        self.wizard = Wizard::default();
        self.file.delete().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, ports: Vec<u16>) -> ApplicationTemplate {
        ApplicationTemplate {
            image_name: name.to_string(),
            default_ports: ports,
            description: String::new(),
            image_envs: vec![],
        }
    }

    async fn store() -> (tempfile::TempDir, WizardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = WizardStore::load(File::new(dir.path().join("wizard.json"))).await;
        (dir, store)
    }

    #[tokio::test]
    async fn test_add_app_dedupes_and_picks_port() {
        let (_dir, mut store) = store().await;
        assert_eq!(store.add_app(&template("redis", vec![6379, 6380]), "7"), 0);
        assert_eq!(store.add_app(&template("custom", vec![]), "latest"), 1);
        assert_eq!(store.add_app(&template("redis", vec![1]), "8"), 0);

        let apps = &store.state().apps;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].port, 6379);
        assert_eq!(apps[0].tag, "7");
        assert_eq!(apps[1].port, 8080);
    }

    #[tokio::test]
    async fn test_set_app_port_rejects_taken_port() {
        let (_dir, mut store) = store().await;
        store.add_app(&template("redis", vec![6379]), "7");
        store.add_app(&template("mysql", vec![3306]), "8");

        assert!(store.set_app_port(1, 6379).is_err());
        assert_eq!(store.state().apps[1].port, 3306);
        store.set_app_port(1, 3307).unwrap();
        store.set_app_port(1, 3307).unwrap();
        assert!(store.set_app_tag(5, "x").is_err());
    }

    #[tokio::test]
    async fn test_set_structure_clears_names() {
        let (_dir, mut store) = store().await;
        let mut source = SourceInfo::default();
        source.client_name = "web".to_string();
        source.server_name = "api".to_string();
        store.set_source(source);

        store.set_structure(RepoStructure::Mono);
        assert_eq!(store.state().source.client_name, "web");
        store.set_structure(RepoStructure::Multi);
        assert!(store.state().source.client_name.is_empty());
        assert!(store.state().source.server_name.is_empty());
    }

    #[tokio::test]
    async fn test_step_survives_reload_and_reset_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("wizard.json"));
        let mut store = WizardStore::load(file.clone()).await;

        let mut source = SourceInfo::default();
        source.repo_url = "https://example.com/g/app.git".to_string();
        source.client_name = "web".to_string();
        source.server_name = "api".to_string();
        store.set_source(source);
        store.next().unwrap();
        store.save().await.unwrap();

        let mut reloaded = WizardStore::load(file.clone()).await;
        assert_eq!(reloaded.wizard().current_id(), 2);
        assert_eq!(reloaded.state().source.client_name, "web");

        reloaded.reset().await.unwrap();
        assert!(!file.exists().await);
        assert_eq!(reloaded.wizard().current_id(), 1);
        assert_eq!(reloaded.state(), &WizardState::default());
    }

    #[tokio::test]
    async fn test_unversioned_state_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("wizard.json"));
        file.write_json(&serde_json::json!({
            "server": { "ip": "10.0.0.9" }
        }))
        .await
        .unwrap();

        let store = WizardStore::load(file).await;
        assert_eq!(store.state().server.ip, "10.0.0.9");
        assert_eq!(store.wizard().current_id(), 1);
        assert_eq!(store.state().env.node, "22");
    }
}
