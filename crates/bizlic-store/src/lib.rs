//! # bizlic-store — Durable State for the Report Pipeline
//!
//! Everything the pipeline persists between invocations lives behind the
//! [`KeyValueStore`] trait: one durable key per record, JSON text values.
//!
//! ## Persisted Layout
//!
//! | Key | Record |
//! |-----|--------|
//! | `saved_report_v1` | `{content: Report, createdAt: epoch-millis}` |
//! | `step1` / `step2` / `step3` | wizard step records |
//! | `finalBusinessData` | finalized intake payload |
//!
//! ## Failure Policy
//!
//! Reads fail soft: an unreadable or unparsable record is logged and treated
//! as absent. Writes and removals surface [`StoreError`] so the caller can
//! decide whether a failed write matters.

pub mod error;
pub mod kv;
pub mod report;
pub mod wizard;

pub use error::StoreError;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use report::{FileReportStore, InMemoryReportStore, KvReportStore, ReportStore, StoredReport};
pub use wizard::{WizardStep, WizardStore};

/// Durable keys used by the pipeline.
pub mod keys {
    /// Single-slot report cache.
    pub const REPORT: &str = "saved_report_v1";
    /// Finalized wizard payload submitted for generation.
    pub const INTAKE_PAYLOAD: &str = "finalBusinessData";
}
