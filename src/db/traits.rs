// Registry store trait — backend-agnostic async interface for the link registry.
//
// Implementors: SqliteStore (wraps rusqlite), PgStore (wraps sqlx),
// MemoryStore (in-process map, used by tests and `serve --memory`).
// All methods are async so both sync (rusqlite via Mutex) and native async
// (sqlx) backends fit behind a single interface.
//
// No update or delete methods: a record's owner is written once by
// insert_if_absent and never changes.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ClaimOutcome, RecordCounts, SocialLinkRecord};

#[async_trait]
pub trait RegistryStore: Send + Sync {
    // --- Provenance ---

    /// Fetch the record for a normalized link, if one has been claimed.
    async fn lookup(&self, normalized_link: &str) -> Result<Option<SocialLinkRecord>>;

    /// Store `record` unless its normalized link is already claimed.
    ///
    /// Must be a single atomic step: under concurrent calls for the same
    /// link exactly one caller sees `Inserted`, every other caller sees
    /// `AlreadyExists` carrying the winner.
    async fn insert_if_absent(&self, record: &SocialLinkRecord) -> Result<ClaimOutcome>;

    /// Every link first claimed by `token_mint`, oldest claim first.
    async fn links_for_token(&self, token_mint: &str) -> Result<Vec<SocialLinkRecord>>;

    // --- Lifecycle / admin ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    /// Number of claimed links per platform.
    async fn record_counts(&self) -> Result<RecordCounts>;

    /// Every record, oldest claim first. Used when copying between backends.
    async fn all_records(&self) -> Result<Vec<SocialLinkRecord>>;
}
