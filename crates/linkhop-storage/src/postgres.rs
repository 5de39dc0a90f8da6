use async_trait::async_trait;
use linkhop_core::repository::{ReadRepository, Repository, Result};
use linkhop_core::{format_instant, LinkRow, NewLink, ShortCode, StorageError};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{info, trace};
use typed_builder::TypedBuilder;

/// DDL for the `links` table.
pub const LINKS_DDL: &str = include_str!("../ddl/postgres/links.sql");

/// Connection pool settings for [`PgRepository::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolSettings {
    #[builder(default = 10)]
    pub max_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Postgres implementation of the link store contract.
///
/// Timestamps are stored as `TIMESTAMPTZ` and rendered back as UTC ISO-8601
/// strings with millisecond precision, the same shape the in-memory store
/// produces.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

// Column list shared by every query returning a full row.
const ROW_COLUMNS: &str = r#"
    id,
    code,
    long_url,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS.MS"Z"') AS created_at,
    to_char(expires_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS.MS"Z"') AS expires_at,
    clicks
"#;

impl PgRepository {
    /// Creates a repository from an existing Postgres connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new Postgres connection pool.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(LINKS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        info!("Ensured links schema");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn link_row(row: &PgRow) -> Result<LinkRow> {
    Ok(LinkRow {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        code: row.try_get("code").map_err(map_sqlx_error)?,
        long_url: row.try_get("long_url").map_err(map_sqlx_error)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        expires_at: row.try_get("expires_at").map_err(map_sqlx_error)?,
        clicks: row.try_get("clicks").map_err(map_sqlx_error)?,
    })
}

#[async_trait]
impl ReadRepository for PgRepository {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<LinkRow>> {
        trace!(code = %code, "Looking up link in postgres");

        let query = format!("SELECT {ROW_COLUMNS} FROM links WHERE code = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(link_row).transpose()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert(&self, link: NewLink) -> Result<LinkRow> {
        let query = format!(
            "INSERT INTO links (code, long_url, created_at, expires_at) \
             VALUES ($1, $2, $3::timestamptz, $4::timestamptz) \
             RETURNING {ROW_COLUMNS}"
        );

        let result = sqlx::query(&query)
            .bind(link.code.as_str())
            .bind(&link.long_url)
            .bind(format_instant(link.created_at))
            .bind(format_instant(link.expires_at))
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => link_row(&row),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::UniqueViolation(link.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
