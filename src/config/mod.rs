mod types;

pub use types::*;

use crate::{Error, Result};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `.env`, an optional YAML file and the process
/// environment, in that order of increasing precedence.
pub async fn load() -> Result<Config> {
    check_env_file(dotenvy::dotenv())?;

    let path = config_path(env::var("CONFIG_PATH").ok(), Path::new(DEFAULT_CONFIG_PATH));
    load_from(path.as_deref(), |key| env::var(key).ok()).await
}

/// Reads `path` when given (a missing file is an error), falls back to
/// defaults otherwise, then applies overrides from `lookup`.
pub async fn load_from<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path).await?,
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config.apply_overrides(lookup)?;

    Ok(config)
}

/// An explicit path always wins; the default file is used only if present.
fn config_path(explicit: Option<String>, default: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(PathBuf::from(path)),
        None if default.exists() => Some(default.to_path_buf()),
        None => None,
    }
}

// A missing .env is normal outside local development; a broken one is not.
fn check_env_file(result: dotenvy::Result<PathBuf>) -> Result<()> {
    match result {
        Ok(path) => {
            debug!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::config(format!("Failed to read .env file: {}", e))),
    }
}

async fn read_file(path: &Path) -> Result<Config> {
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Applies environment overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
        }

        if let Some(env) = lookup("APP_ENV") {
            self.server.environment = env.parse()?;
        }

        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = dir.into();
        }

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }

        Ok(())
    }
}
