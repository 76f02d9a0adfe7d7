use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a client record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    Individual,
    Company,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "Individual",
            ClientType::Company => "Company",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown client type: {0:?}")]
pub struct UnknownClientType(pub String);

impl TryFrom<String> for ClientType {
    type Error = UnknownClientType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Individual" => Ok(ClientType::Individual),
            "Company" => Ok(ClientType::Company),
            _ => Err(UnknownClientType(value)),
        }
    }
}

/// A client record as served by `/api/clients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub email: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Row shape of the `clients` table; `client_type` is stored as text
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ClientRow {
    pub client_id: i64,
    pub name: String,
    pub client_type: String,
    pub email: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = UnknownClientType;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            client_id: row.client_id,
            name: row.name,
            client_type: ClientType::try_from(row.client_type)?,
            email: row.email,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
