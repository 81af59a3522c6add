// MemoryStore — in-process RegistryStore backed by a HashMap.
//
// Used by the test suites and by `serve --memory` for throwaway runs.
// insert_if_absent goes through the map's entry API while the mutex is held,
// so check and insert are one step.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{ClaimOutcome, RecordCounts, SocialLinkRecord};
use super::traits::RegistryStore;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SocialLinkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn lookup(&self, normalized_link: &str) -> Result<Option<SocialLinkRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(normalized_link).cloned())
    }

    async fn insert_if_absent(&self, record: &SocialLinkRecord) -> Result<ClaimOutcome> {
        let mut records = self.records.lock().await;
        match records.entry(record.normalized_link.clone()) {
            Entry::Occupied(existing) => Ok(ClaimOutcome::AlreadyExists(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(ClaimOutcome::Inserted)
            }
        }
    }

    async fn links_for_token(&self, token_mint: &str) -> Result<Vec<SocialLinkRecord>> {
        let records = self.records.lock().await;
        let mut held: Vec<SocialLinkRecord> = records
            .values()
            .filter(|r| r.first_seen_in_token == token_mint)
            .cloned()
            .collect();
        held.sort_by(oldest_first);
        Ok(held)
    }

    async fn table_count(&self) -> Result<i64> {
        Ok(1)
    }

    async fn record_counts(&self) -> Result<RecordCounts> {
        let records = self.records.lock().await;
        let mut counts = RecordCounts::default();
        for record in records.values() {
            counts.add(record.platform_type, 1);
        }
        Ok(counts)
    }

    async fn all_records(&self) -> Result<Vec<SocialLinkRecord>> {
        let records = self.records.lock().await;
        let mut all: Vec<SocialLinkRecord> = records.values().cloned().collect();
        all.sort_by(oldest_first);
        Ok(all)
    }
}

fn oldest_first(a: &SocialLinkRecord, b: &SocialLinkRecord) -> std::cmp::Ordering {
    a.first_seen_at
        .cmp(&b.first_seen_at)
        .then_with(|| a.normalized_link.cmp(&b.normalized_link))
}
