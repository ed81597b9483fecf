//! # Report Cache
//!
//! A single-slot cache for the most recently generated report. There is no
//! history, no size bound and no expiry; `createdAt` is stamped on every
//! write so an expiry policy can be layered on later.
//!
//! ## Record Format
//!
//! ```json
//! {"content": { ...report... }, "createdAt": 1767225600000}
//! ```
//!
//! `createdAt` is epoch milliseconds. A record whose `content` is `{}` is
//! still returned by [`ReportStore::get`]; deciding that it is not a usable
//! cache hit is [`StoredReport::is_usable`]'s job.

use bizlic_core::Report;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::keys;
use crate::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

/// A persisted report with its write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub content: Report,
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl StoredReport {
    /// Only a non-empty report counts as a cache hit.
    pub fn is_usable(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Single-slot report cache.
pub trait ReportStore: Send + Sync {
    /// Current record, or `None` when absent or unreadable.
    fn get(&self) -> Option<StoredReport>;

    /// Replace the slot with `content`, stamped with the current time.
    fn set(&self, content: &Report) -> Result<StoredReport, StoreError>;

    /// Empty the slot. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// [`ReportStore`] over any [`KeyValueStore`], using one durable key.
#[derive(Debug, Clone)]
pub struct KvReportStore<S> {
    kv: S,
    key: String,
}

/// Report cache persisted as a file under the state directory.
pub type FileReportStore = KvReportStore<FileKeyValueStore>;

/// Report cache held in memory.
pub type InMemoryReportStore = KvReportStore<MemoryKeyValueStore>;

impl<S: KeyValueStore> KvReportStore<S> {
    /// Cache under the default `saved_report_v1` key.
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, keys::REPORT)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// The backing key-value store.
    pub fn backend(&self) -> &S {
        &self.kv
    }
}

impl InMemoryReportStore {
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStore::new())
    }
}

impl<S: KeyValueStore> ReportStore for KvReportStore<S> {
    fn get(&self) -> Option<StoredReport> {
        let raw = match self.kv.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "stored report unreadable; treating as absent");
                return None;
            }
        };
        match serde_json::from_str::<StoredReport>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "stored report malformed; treating as absent");
                None
            }
        }
    }

    fn set(&self, content: &Report) -> Result<StoredReport, StoreError> {
        let record = StoredReport {
            content: content.clone(),
            // Stored at millisecond precision; stamp what a later read returns.
            created_at: Utc::now().trunc_subsecs(3),
        };
        let raw = serde_json::to_string(&record).map_err(|source| StoreError::Serialization {
            key: self.key.clone(),
            source,
        })?;
        self.kv.write(&self.key, &raw)?;
        tracing::debug!(key = %self.key, created_at = %record.created_at, "report cached");
        Ok(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(&self.key)?;
        tracing::debug!(key = %self.key, "report cache cleared");
        Ok(())
    }
}
