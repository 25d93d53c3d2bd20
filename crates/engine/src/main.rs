//! D&D Helper Engine - Main entry point.
//!
//! Opens the configured character store, brings every stored character up to
//! the current schema, and logs a summary line per character.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dndhelper_engine::infrastructure::config::AppConfig;
use dndhelper_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dndhelper_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting D&D Helper Engine");

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    tracing::info!(
        store = ?config.store,
        data_path = %config.data_path.display(),
        "Configuration loaded"
    );

    let app = App::from_config(&config);

    app.use_cases
        .management
        .migrate_all()
        .await
        .context("Failed to migrate stored characters")?;

    let characters = app
        .use_cases
        .management
        .list()
        .await
        .context("Failed to load characters")?;

    if characters.is_empty() {
        tracing::info!("No characters stored");
    }
    for character in &characters {
        let hp = character.hit_points();
        tracing::info!(
            character_id = %character.id(),
            class = %character.class_name(),
            level = character.level(),
            hp = %format!("{}/{}", hp.current(), hp.max()),
            temp_hp = hp.temp(),
            dying = character.is_dying(),
            resources = character
                .resources()
                .map(|r| r.class_resources().len())
                .unwrap_or(0),
            "{}",
            character.name()
        );
    }
    tracing::info!(count = characters.len(), "Character store ready");

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
