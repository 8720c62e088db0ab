//! Application state management

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::options::AppOptions;
use crate::authn::session::{SessionManager, SessionStore};
use crate::errors::SeedError;
use crate::http::client::HttpClient;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::stores::projects::ProjectStore;
use crate::stores::theme::ThemeStore;
use crate::stores::user::UserStore;
use crate::stores::wizard::WizardStore;

/// Refresh the access token when it expires within this many seconds
const REFRESH_MARGIN_SECS: i64 = 60;

/// Read the settings file, falling back to defaults
pub async fn load_settings(layout: &StorageLayout) -> Settings {
    let file = layout.settings_file();
    let settings = if file.exists().await {
        match file.read_json::<Settings>().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Unable to read settings file, using defaults: {}", e);
                Settings::default()
            }
        }
    } else {
        Settings::default()
    };
    settings.with_env_overrides()
}

/// Main application state
pub struct AppState {
    pub layout: StorageLayout,

    pub options: AppOptions,

    /// Stored credentials
    pub session: Arc<SessionManager>,

    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,
}

impl AppState {
    pub async fn init(layout: StorageLayout, options: AppOptions) -> Result<Self, SeedError> {
        layout.setup().await?;

        let session = Arc::new(SessionManager::load(layout.session_file()).await?);
        let http_client = HttpClient::new(&options.backend_base_url, options.request_timeout)?
            .with_session(session.clone() as Arc<dyn SessionStore>);

        debug!("Using backend {}", http_client.base_url());
        Ok(Self {
            layout,
            options,
            session,
            http_client: Arc::new(http_client),
        })
    }

    /// Fail unless a session is stored, refreshing a token about to expire
    pub async fn require_login(&self) -> Result<(), SeedError> {
        if !self.session.is_logged_in().await {
            return Err(SeedError::AuthError(
                "Not logged in. Run `seedctl login` first.".to_string(),
            ));
        }
        self.http_client
            .ensure_fresh_token(REFRESH_MARGIN_SECS)
            .await
    }

    pub async fn wizard_store(&self) -> WizardStore {
        WizardStore::load(self.layout.wizard_file()).await
    }

    pub async fn project_store(&self) -> ProjectStore {
        ProjectStore::load(self.layout.projects_file()).await
    }

    pub async fn user_store(&self) -> UserStore {
        UserStore::load(self.layout.user_file()).await
    }

    pub async fn theme_store(&self) -> ThemeStore {
        ThemeStore::load(self.layout.theme_file()).await
    }
}
