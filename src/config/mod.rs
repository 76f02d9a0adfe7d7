use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::prefs::FileStore;

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("client_manager.log")
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: Option<String>,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Base URL of a running server; the browser fetches from it when set
    pub api_url: Option<String>,

    /// Where sort preferences are kept
    pub prefs_path: Option<PathBuf>,

    /// Log destination for the terminal browser
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Run embedded migrations on connect
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get the database URL, failing when it is not configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not set in environment"))
    }

    /// Preference file, falling back to the user's config directory
    pub fn prefs_path(&self) -> PathBuf {
        self.prefs_path
            .clone()
            .or_else(FileStore::default_path)
            .unwrap_or_else(|| PathBuf::from("client_manager_prefs.json"))
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_variables_are_missing() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(!config.auto_migrate);
        assert!(config.database_url().is_err());
    }

    #[test]
    fn variables_override_defaults() {
        let config: Config = envy::from_iter(vec![
            ("PORT".to_string(), "8080".to_string()),
            ("DATABASE_URL".to_string(), "postgres://localhost/clients".to_string()),
            ("PREFS_PATH".to_string(), "/tmp/prefs.json".to_string()),
            ("AUTO_MIGRATE".to_string(), "true".to_string()),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/clients");
        assert_eq!(config.prefs_path(), PathBuf::from("/tmp/prefs.json"));
        assert!(config.auto_migrate);
    }
}
