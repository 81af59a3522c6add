// SqliteStore — rusqlite backend implementing the RegistryStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// No method awaits while holding the guard, so one slow query only blocks
// other store calls, never the runtime.
//
// The free functions in queries.rs hold the SQL so they can be tested
// against a bare Connection.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{ClaimOutcome, RecordCounts, SocialLinkRecord};
use super::traits::RegistryStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl RegistryStore for SqliteStore {
    async fn lookup(&self, normalized_link: &str) -> Result<Option<SocialLinkRecord>> {
        let conn = self.conn.lock().await;
        super::queries::lookup_link(&conn, normalized_link)
    }

    async fn insert_if_absent(&self, record: &SocialLinkRecord) -> Result<ClaimOutcome> {
        let conn = self.conn.lock().await;
        super::queries::insert_link_if_absent(&conn, record)
    }

    async fn links_for_token(&self, token_mint: &str) -> Result<Vec<SocialLinkRecord>> {
        let conn = self.conn.lock().await;
        super::queries::links_for_token(&conn, token_mint)
    }

    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn record_counts(&self) -> Result<RecordCounts> {
        let conn = self.conn.lock().await;
        super::queries::count_by_platform(&conn)
    }

    async fn all_records(&self) -> Result<Vec<SocialLinkRecord>> {
        let conn = self.conn.lock().await;
        super::queries::all_links(&conn)
    }
}
