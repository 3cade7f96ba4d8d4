//! Harness for tests that need a real Postgres. Each harness migrates a
//! private schema so suites can share one database.

use anyhow::{Context, Result, bail};
use migration::{Migrator, MigratorTrait};
use platform_db::DatabaseSettings;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;
use url::Url;
use uuid::Uuid;

pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

pub struct PgHarness {
    pub db: DatabaseConnection,
    admin: DatabaseConnection,
    schema: String,
}

impl PgHarness {
    /// `None` when `TEST_DATABASE_URL` is unset, so the suite is skipped.
    pub async fn from_env() -> Result<Option<Self>> {
        match std::env::var(TEST_DATABASE_URL) {
            Ok(raw) if !raw.trim().is_empty() => Self::connect(raw.trim()).await.map(Some),
            _ => Ok(None),
        }
    }

    pub async fn connect(raw_url: &str) -> Result<Self> {
        let url = Url::parse(raw_url).context("TEST_DATABASE_URL is not a valid url")?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            bail!("TEST_DATABASE_URL must point at Postgres, got {}", url.scheme());
        }

        let schema = format!("hr_test_{}", Uuid::new_v4().simple());
        let admin = Database::connect(url.as_str()).await?;
        admin
            .execute(Statement::from_string(
                admin.get_database_backend(),
                format!("CREATE SCHEMA {schema}"),
            ))
            .await?;

        let mut options = DatabaseSettings::new(url.as_str()).connect_options();
        options.set_schema_search_path(schema.clone());
        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        info!(%schema, host = url.host_str().unwrap_or_default(), "test schema migrated");

        Ok(Self { db, admin, schema })
    }

    pub async fn teardown(self) -> Result<()> {
        self.db.close().await?;
        self.admin
            .execute(Statement::from_string(
                self.admin.get_database_backend(),
                format!("DROP SCHEMA {} CASCADE", self.schema),
            ))
            .await?;
        Ok(())
    }
}
