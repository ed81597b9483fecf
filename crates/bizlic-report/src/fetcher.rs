//! # Report Fetcher
//!
//! Cache-first report loading.
//!
//! ## Load Logic
//!
//! 1. Unless a refresh is forced, a usable cached record (non-empty
//!    `content`) is returned as-is. No request is issued.
//! 2. Otherwise one request is sent to the [`ReportSource`].
//! 3. A report carrying the service's error marker becomes
//!    [`ServiceError::Rejected`] and is not persisted.
//! 4. Any other report is written to the store, then returned.
//! 5. When a forced refresh fails, the store is cleared before the error is
//!    returned. An implicit load never touches the store on failure.
//!
//! Each call mutates the store at most once and never retries.

use bizlic_client::{ReportSource, ServiceError};
use bizlic_core::{IntakePayload, Report};
use bizlic_store::{ReportStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a loaded report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Served from the store; no request was issued.
    Cache { created_at: DateTime<Utc> },
    /// Freshly generated by the service.
    Network,
}

impl Provenance {
    pub fn is_cache(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }
}

/// A report together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReport {
    pub report: Report,
    pub provenance: Provenance,
}

/// Loads reports through a [`ReportStore`] in front of a [`ReportSource`].
#[derive(Debug)]
pub struct ReportFetcher<S, R> {
    store: S,
    source: R,
}

impl<S: ReportStore, R: ReportSource> ReportFetcher<S, R> {
    pub fn new(store: S, source: R) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the report for `payload`, from cache unless `force_refresh`.
    pub async fn load(
        &self,
        payload: &IntakePayload,
        force_refresh: bool,
    ) -> Result<LoadedReport, ServiceError> {
        if !force_refresh {
            if let Some(cached) = self.cached() {
                return Ok(cached);
            }
        }

        match self.generate(payload).await {
            Ok(report) => {
                if let Err(e) = self.store.set(&report) {
                    tracing::warn!(error = %e, "failed to cache generated report");
                }
                Ok(LoadedReport {
                    report,
                    provenance: Provenance::Network,
                })
            }
            Err(e) => {
                if force_refresh {
                    tracing::info!(error = %e, "forced refresh failed; clearing cached report");
                    if let Err(clear_err) = self.store.clear() {
                        tracing::warn!(error = %clear_err, "failed to clear cached report");
                    }
                }
                Err(e)
            }
        }
    }

    /// Drop the cached report.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    fn cached(&self) -> Option<LoadedReport> {
        let record = self.store.get()?;
        if !record.is_usable() {
            tracing::debug!("cached report is empty; treating as a miss");
            return None;
        }
        tracing::info!(created_at = %record.created_at, "serving report from cache");
        Some(LoadedReport {
            report: record.content,
            provenance: Provenance::Cache {
                created_at: record.created_at,
            },
        })
    }

    async fn generate(&self, payload: &IntakePayload) -> Result<Report, ServiceError> {
        tracing::info!("requesting a new report");
        let report = self.source.generate(payload).await?;
        if report.has_error_marker() {
            let message = report.error.unwrap_or_default();
            tracing::warn!(%message, "service flagged the report as an error; not caching");
            return Err(ServiceError::Rejected {
                endpoint: "report generation".into(),
                message,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use bizlic_store::{InMemoryReportStore, KeyValueStore, MemoryKeyValueStore, KvReportStore};
    use parking_lot::Mutex;
    use serde_json::{json, Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted reply of [`FakeSource`].
    #[derive(Debug, Clone)]
    pub(crate) enum Reply {
        Report(Value),
        Server(u16, &'static str),
        Malformed(&'static str),
    }

    /// Report source that counts calls and answers from a script.
    #[derive(Debug, Clone)]
    pub(crate) struct FakeSource {
        pub(crate) calls: Arc<AtomicUsize>,
        reply: Arc<Mutex<Reply>>,
    }

    impl FakeSource {
        pub(crate) fn new(reply: Reply) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Arc::new(Mutex::new(reply)),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn set_reply(&self, reply: Reply) {
            *self.reply.lock() = reply;
        }
    }

    #[async_trait]
    impl ReportSource for FakeSource {
        async fn generate(&self, _payload: &IntakePayload) -> Result<Report, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let endpoint = "POST /api/generate-report".to_string();
            match self.reply.lock().clone() {
                Reply::Report(value) => Ok(serde_json::from_value(value).unwrap()),
                Reply::Server(status, message) => Err(ServiceError::Server {
                    endpoint,
                    status,
                    message: message.into(),
                }),
                Reply::Malformed(raw) => Err(ServiceError::MalformedResponse {
                    endpoint,
                    reason: "expected value".into(),
                    raw: raw.into(),
                }),
            }
        }
    }

    /// A store whose writes always fail.
    struct ReadOnlyStore(InMemoryReportStore);

    impl ReportStore for ReadOnlyStore {
        fn get(&self) -> Option<bizlic_store::StoredReport> {
            self.0.get()
        }
        fn set(&self, _content: &Report) -> Result<bizlic_store::StoredReport, StoreError> {
            Err(StoreError::InvalidKey("read-only".into()))
        }
        fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey("read-only".into()))
        }
    }

    pub(crate) fn payload() -> IntakePayload {
        let mut fields = Map::new();
        fields.insert("business_name".into(), json!("Falafel Haifa"));
        fields.insert("business_type".into(), json!("restaurant"));
        IntakePayload::new(fields)
    }

    fn report(value: Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn cached_report_is_served_without_network() {
        let store = InMemoryReportStore::in_memory();
        let cached = report(json!({"business_name": "Cached", "matched_rules": [{"id": 1}]}));
        let record = store.set(&cached).unwrap();
        let source = FakeSource::new(Reply::Server(500, "should not be called"));
        let fetcher = ReportFetcher::new(store, source.clone());

        let loaded = fetcher.load(&payload(), false).await.unwrap();
        assert_eq!(source.calls(), 0);
        assert_eq!(loaded.report, cached);
        assert_eq!(
            loaded.provenance,
            Provenance::Cache {
                created_at: record.created_at
            }
        );
    }

    #[tokio::test]
    async fn empty_cached_content_is_a_miss() {
        let kv = MemoryKeyValueStore::new();
        kv.write(bizlic_store::keys::REPORT, r#"{"content": {}, "createdAt": 123}"#)
            .unwrap();
        let source = FakeSource::new(Reply::Report(json!({"business_name": "Fresh"})));
        let fetcher = ReportFetcher::new(KvReportStore::new(kv), source.clone());

        let loaded = fetcher.load(&payload(), false).await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(loaded.provenance, Provenance::Network);
        let stored = fetcher.store().get().unwrap();
        assert_eq!(stored.content.business_name.as_deref(), Some("Fresh"));
        assert!(stored.created_at.timestamp_millis() > 123);
    }

    #[tokio::test]
    async fn cached_content_with_only_null_fields_is_a_hit() {
        let kv = MemoryKeyValueStore::new();
        kv.write(
            bizlic_store::keys::REPORT,
            r#"{"content": {"matched_rules": [], "business_name": null}, "createdAt": 123}"#,
        )
        .unwrap();
        let source = FakeSource::new(Reply::Report(json!({"business_name": "Fresh"})));
        let fetcher = ReportFetcher::new(KvReportStore::new(kv), source.clone());

        let loaded = fetcher.load(&payload(), false).await.unwrap();
        assert_eq!(source.calls(), 0);
        assert!(loaded.provenance.is_cache());
        assert_eq!(loaded.report.business_name, None);
    }

    #[tokio::test]
    async fn network_payload_is_persisted_as_received() {
        let received = json!({"matched_rules": [], "business_name": null});
        let source = FakeSource::new(Reply::Report(received.clone()));
        let fetcher = ReportFetcher::new(InMemoryReportStore::in_memory(), source.clone());

        fetcher.load(&payload(), false).await.unwrap();
        let again = fetcher.load(&payload(), false).await.unwrap();
        assert!(again.provenance.is_cache());
        assert_eq!(source.calls(), 1);
        assert_eq!(serde_json::to_value(&again.report).unwrap(), received);
    }

    #[tokio::test]
    async fn miss_fetches_and_persists() {
        let source = FakeSource::new(Reply::Report(json!({"business_type": "cafe"})));
        let fetcher = ReportFetcher::new(InMemoryReportStore::in_memory(), source.clone());

        let first = fetcher.load(&payload(), false).await.unwrap();
        assert_eq!(first.provenance, Provenance::Network);

        let second = fetcher.load(&payload(), false).await.unwrap();
        assert!(second.provenance.is_cache());
        assert_eq!(second.report, first.report);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_cache() {
        let store = InMemoryReportStore::in_memory();
        store.set(&report(json!({"business_type": "old"}))).unwrap();
        let source = FakeSource::new(Reply::Report(json!({"business_type": "new"})));
        let fetcher = ReportFetcher::new(store, source.clone());

        let loaded = fetcher.load(&payload(), true).await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(loaded.report.business_type.as_deref(), Some("new"));
        assert_eq!(
            fetcher.store().get().unwrap().content.business_type.as_deref(),
            Some("new")
        );
    }

    #[tokio::test]
    async fn forced_failure_clears_store() {
        let store = InMemoryReportStore::in_memory();
        store.set(&report(json!({"business_type": "stale"}))).unwrap();
        let source = FakeSource::new(Reply::Server(503, "overloaded"));
        let fetcher = ReportFetcher::new(store, source);

        let err = fetcher.load(&payload(), true).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(fetcher.store().get().is_none());
    }

    #[tokio::test]
    async fn implicit_failure_leaves_store_untouched() {
        let kv = MemoryKeyValueStore::new();
        kv.write(bizlic_store::keys::REPORT, r#"{"content": {}, "createdAt": 123}"#)
            .unwrap();
        let source = FakeSource::new(Reply::Malformed("<html>"));
        let fetcher = ReportFetcher::new(KvReportStore::new(kv.clone()), source);

        let err = fetcher.load(&payload(), false).await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse { .. }));
        assert_eq!(
            kv.read(bizlic_store::keys::REPORT).unwrap().as_deref(),
            Some(r#"{"content": {}, "createdAt": 123}"#)
        );
    }

    #[tokio::test]
    async fn error_marker_is_rejected_and_not_persisted() {
        let source = FakeSource::new(Reply::Report(json!({"error": "quota exceeded"})));
        let fetcher = ReportFetcher::new(InMemoryReportStore::in_memory(), source);

        let err = fetcher.load(&payload(), false).await.unwrap_err();
        match err {
            ServiceError::Rejected { message, .. } => assert_eq!(message, "quota exceeded"),
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(fetcher.store().get().is_none());
    }

    #[tokio::test]
    async fn store_write_failure_still_returns_report() {
        let source = FakeSource::new(Reply::Report(json!({"business_type": "bar"})));
        let fetcher = ReportFetcher::new(ReadOnlyStore(InMemoryReportStore::in_memory()), source);

        let loaded = fetcher.load(&payload(), false).await.unwrap();
        assert_eq!(loaded.report.business_type.as_deref(), Some("bar"));

        let source = FakeSource::new(Reply::Server(500, "boom"));
        let fetcher = ReportFetcher::new(ReadOnlyStore(InMemoryReportStore::in_memory()), source);
        assert!(fetcher.load(&payload(), true).await.is_err());
    }
}
