use std::sync::Arc;

use anyhow::Context as _;
use api_client::ApiClient;
use lasambus_core::constants::{ENV_BACKEND_URL, ENV_HTTP_TIMEOUT_SECS, ENV_STATE_DIR};
use lasambus_core::{resolve_route, ClientConfig, FileStorage, SessionStore, ViewNavigator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the tracing subscriber. Logs go to stderr so stdout carries only program output.
///
/// # Errors
///
/// Returns an error if a built-in filter directive fails to parse.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lasambus=info".parse()?)
                .add_directive("api_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

/// Reads the client configuration from the environment, after loading `.env` if present.
///
/// # Errors
///
/// Returns an error if a configured value is invalid.
pub fn load_config() -> anyhow::Result<ClientConfig> {
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env_values(
        std::env::var(ENV_BACKEND_URL).ok(),
        std::env::var(ENV_STATE_DIR).ok(),
        std::env::var(ENV_HTTP_TIMEOUT_SECS).ok(),
    )?;
    tracing::debug!(
        backend = %config.backend_url(),
        state_dir = %config.state_dir().display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Everything a front end needs, wired together once at startup.
pub struct AppContext {
    pub config: ClientConfig,
    pub session: SessionStore,
    pub navigator: Arc<ViewNavigator>,
    pub api: ApiClient,
}

impl AppContext {
    /// Rehydrates the session from the state directory and builds the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let session = SessionStore::load(FileStorage::new(config.state_dir()));
        let navigator = Arc::new(ViewNavigator::new(resolve_route(
            session.current().as_ref(),
        )));
        let api = ApiClient::new(&config, session.clone(), navigator.clone())
            .context("failed to build HTTP client")?;
        Ok(Self {
            config,
            session,
            navigator,
            api,
        })
    }

    /// Startup in one call: `.env`, configuration, context.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the client cannot be built.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(load_config()?)
    }
}
