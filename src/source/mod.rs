//! Where client records come from. Each source answers one question:
//! "give me every client", with no filtering, paging or ordering.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::Database;
use crate::models::Client;

#[derive(Clone)]
pub enum RecordSource {
    /// Reads the `clients` table directly
    Database(Database),
    /// Fetches `GET {base_url}/api/clients` from a running server
    Http { client: reqwest::Client, base_url: String },
    /// A fixed set of records loaded from a JSON file
    Fixture(Arc<Vec<Client>>),
}

impl RecordSource {
    pub fn http(base_url: impl Into<String>) -> Self {
        RecordSource::Http {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn fixture(clients: Vec<Client>) -> Self {
        RecordSource::Fixture(Arc::new(clients))
    }

    pub fn from_fixture_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        let clients: Vec<Client> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse fixture {}", path.display()))?;
        Ok(Self::fixture(clients))
    }

    pub fn describe(&self) -> String {
        match self {
            RecordSource::Database(_) => "database".to_string(),
            RecordSource::Http { base_url, .. } => format!("server at {base_url}"),
            RecordSource::Fixture(clients) => format!("fixture ({} clients)", clients.len()),
        }
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        match self {
            RecordSource::Database(db) => db.list_clients().await,
            RecordSource::Http { client, base_url } => {
                let url = format!("{}/api/clients", base_url.trim_end_matches('/'));
                let clients = client
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("request to {url} failed"))?
                    .error_for_status()?
                    .json::<Vec<Client>>()
                    .await
                    .with_context(|| format!("invalid client list from {url}"))?;
                Ok(clients)
            }
            RecordSource::Fixture(clients) => Ok(clients.as_ref().clone()),
        }
    }
}
