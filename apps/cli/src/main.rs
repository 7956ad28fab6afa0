mod analysis;
mod app;
mod config;
mod errors;
mod extractor;
mod models;
mod project;
mod screen;
mod settings;
mod theme;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::GeminiClient;
use crate::app::App;
use crate::config::Config;
use crate::settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the screens on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting MatchSkill v{}", env!("CARGO_PKG_VERSION"));

    let store = SettingsStore::new(
        config
            .settings_path
            .clone()
            .unwrap_or_else(SettingsStore::default_path),
    );
    let loaded = store.load();
    if loaded.recovered {
        warn!(
            "settings at {} were unreadable; continuing with defaults",
            store.path().display()
        );
        eprintln!("Aviso: suas preferências salvas estavam corrompidas e foram redefinidas.");
    }
    info!("settings loaded from {}", store.path().display());

    let analyzer = Arc::new(GeminiClient::new());
    info!("analysis client initialized (model: {})", analysis::MODEL);

    let mut app = App::new(loaded.settings, store, analyzer);
    app.run().await
}
