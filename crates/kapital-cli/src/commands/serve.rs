//! Server command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use kapital_core::config::ServerSettings;
use kapital_core::AppConfig;
use kapital_server::ServerConfig;

use super::open_db;

/// Server settings from the config file with command-line overrides applied
pub fn server_settings(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
) -> ServerSettings {
    let mut settings = config.server.clone();
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if static_dir.is_some() {
        settings.static_dir = static_dir;
    }
    settings
}

pub async fn cmd_serve(db_path: &Path, settings: &ServerSettings) -> Result<()> {
    println!("🚀 Starting Kapital web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", settings.host, settings.port);
    if let Some(dir) = &settings.static_dir {
        println!("   Static files: {}", dir.display());
    }
    if settings.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", settings.allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path)?;
    let static_dir = settings
        .static_dir
        .as_deref()
        .map(|d| d.to_str().context("Static dir is not valid UTF-8"))
        .transpose()?;

    kapital_server::serve_with_config(
        db,
        &settings.host,
        settings.port,
        static_dir,
        ServerConfig::from(settings),
    )
    .await
    .context("Server error")?;

    Ok(())
}
