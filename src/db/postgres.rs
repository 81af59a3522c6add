// PgStore — PostgreSQL backend implementing the RegistryStore trait.
//
// Uses sqlx PgPool for native async queries. All queries use runtime
// parameter binding (not compile-time macros) to avoid requiring
// DATABASE_URL at compile time.
//
// Key differences from SQLite:
// - TIMESTAMPTZ instead of TEXT for first_seen_at
// - $1/$2 parameter syntax (handled by sqlx)
// - INSERT ... RETURNING tells us directly whether our row won

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx_core::pool::Pool;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};

use super::models::{ClaimOutcome, Platform, RecordCounts, SocialLinkRecord};
use super::traits::RegistryStore;

/// Type alias for the PostgreSQL connection pool.
pub type PgPool = Pool<Postgres>;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run all pending migrations.
    ///
    /// Holds a session-level advisory lock so two instances starting
    /// together don't race to apply the same migration. The lock is bound
    /// to the backend session that took it, so lock and unlock run on one
    /// dedicated connection; the migrations themselves use the pool. The
    /// unlock runs even if a migration fails.
    async fn run_migrations(&self) -> Result<()> {
        // ASCII "SOCIALGD" as a big-endian i64.
        const MIGRATION_LOCK_KEY: i64 = 0x534F4349414C4744_u64 as i64;

        let mut lock_conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection for migration advisory lock")?;

        sqlx_core::query::query("SELECT pg_advisory_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to acquire migration advisory lock")?;

        let migration_result: Result<()> = async {
            sqlx_core::query::query(
                "CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .execute(&self.pool)
            .await?;

            let migrations = [
                (
                    1,
                    include_str!("../../migrations/postgres/0001_initial.sql"),
                ),
                (
                    2,
                    include_str!("../../migrations/postgres/0002_token_index.sql"),
                ),
            ];

            for (version, sql) in migrations {
                let applied: bool = sqlx_core::query::query(
                    "SELECT COUNT(*) > 0 FROM schema_version WHERE version = $1",
                )
                .bind(version)
                .fetch_one(&self.pool)
                .await
                .map(|row| row.get::<bool, _>(0))
                .unwrap_or(false);

                if !applied {
                    // Each migration and its schema_version insert commit together.
                    let mut tx = self.pool.begin().await?;
                    sqlx_core::raw_sql::raw_sql(sql).execute(&mut *tx).await?;
                    tx.commit()
                        .await
                        .with_context(|| format!("Migration v{version} failed"))?;
                }
            }

            Ok(())
        }
        .await;

        let unlock_result = sqlx_core::query::query("SELECT pg_advisory_unlock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to release migration advisory lock");

        // Migration error takes priority over unlock error.
        migration_result?;
        unlock_result?;

        Ok(())
    }
}

fn row_to_record(row: &PgRow) -> Result<SocialLinkRecord> {
    let normalized_link: String = row.try_get("normalized_link")?;
    let platform: String = row.try_get("platform_type")?;
    let platform_type: Platform = platform
        .parse()
        .with_context(|| format!("Bad platform_type stored for {normalized_link}"))?;
    Ok(SocialLinkRecord {
        platform_type,
        first_seen_at: row.try_get::<DateTime<Utc>, _>("first_seen_at")?,
        first_seen_in_token: row.try_get("first_seen_in_token")?,
        normalized_link,
    })
}

#[async_trait]
impl RegistryStore for PgStore {
    async fn lookup(&self, normalized_link: &str) -> Result<Option<SocialLinkRecord>> {
        let row = sqlx_core::query::query(
            "SELECT normalized_link, platform_type, first_seen_at, first_seen_in_token
             FROM social_links WHERE normalized_link = $1",
        )
        .bind(normalized_link)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert_if_absent(&self, record: &SocialLinkRecord) -> Result<ClaimOutcome> {
        // ON CONFLICT DO NOTHING waits for any in-flight insert of the same
        // key to commit, so the follow-up SELECT sees the winner.
        let inserted = sqlx_core::query::query(
            "INSERT INTO social_links (normalized_link, platform_type, first_seen_at, first_seen_in_token)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (normalized_link) DO NOTHING
             RETURNING normalized_link",
        )
        .bind(&record.normalized_link)
        .bind(record.platform_type.as_str())
        .bind(record.first_seen_at)
        .bind(&record.first_seen_in_token)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_some() {
            return Ok(ClaimOutcome::Inserted);
        }

        match self.lookup(&record.normalized_link).await? {
            Some(existing) => Ok(ClaimOutcome::AlreadyExists(existing)),
            None => anyhow::bail!(
                "Insert of {} conflicted but no existing row was found",
                record.normalized_link
            ),
        }
    }

    async fn links_for_token(&self, token_mint: &str) -> Result<Vec<SocialLinkRecord>> {
        let rows = sqlx_core::query::query(
            "SELECT normalized_link, platform_type, first_seen_at, first_seen_in_token
             FROM social_links WHERE first_seen_in_token = $1
             ORDER BY first_seen_at ASC, normalized_link ASC",
        )
        .bind(token_mint)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn table_count(&self) -> Result<i64> {
        let row = sqlx_core::query::query(
            "SELECT COUNT(*)::bigint FROM information_schema.tables
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>(0))
    }

    async fn record_counts(&self) -> Result<RecordCounts> {
        let rows = sqlx_core::query::query(
            "SELECT platform_type, COUNT(*)::bigint FROM social_links GROUP BY platform_type",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = RecordCounts::default();
        for row in &rows {
            let platform: Platform = row.try_get::<String, _>(0)?.parse()?;
            let count = row.try_get::<i64, _>(1)?;
            counts.add(platform, u64::try_from(count).unwrap_or(0));
        }
        Ok(counts)
    }

    async fn all_records(&self) -> Result<Vec<SocialLinkRecord>> {
        let rows = sqlx_core::query::query(
            "SELECT normalized_link, platform_type, first_seen_at, first_seen_in_token
             FROM social_links ORDER BY first_seen_at ASC, normalized_link ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_record).collect()
    }
}
