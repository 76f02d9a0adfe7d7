use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::models::{Client, ClientRow};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url()?)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Every client in the collection; no filtering or ordering is applied
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, name, client_type, email, status, created_at, updated_at
            FROM clients
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        let clients = rows
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(clients)
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    info!("database connection established");

    if config.auto_migrate {
        sqlx::migrate!().run(db.get_pool()).await?;
        info!("migrations applied");
    }

    Ok(db)
}
