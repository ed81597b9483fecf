//! Persistence of wizard step records and the finalized payload.
//!
//! The report pipeline only reads the finalized payload; step records are
//! owned by the wizard.

use bizlic_core::{IntakePayload, WizardCollector};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::keys;
use crate::kv::KeyValueStore;

/// A wizard form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Business,
    Details,
    Features,
}

impl WizardStep {
    pub fn key(self) -> &'static str {
        match self {
            Self::Business => "step1",
            Self::Details => "step2",
            Self::Features => "step3",
        }
    }
}

/// Reads and writes wizard state through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct WizardStore<S> {
    kv: S,
}

impl<S: KeyValueStore> WizardStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Rebuild the collector from whatever step records exist.
    pub fn load(&self) -> WizardCollector {
        WizardCollector::from_records(
            self.read_record(WizardStep::Business.key()),
            self.read_record(WizardStep::Details.key()),
            self.read_record(WizardStep::Features.key()),
        )
    }

    /// Persist the collector's record for `step`. A step with no record is a no-op.
    pub fn save_step(&self, collector: &WizardCollector, step: WizardStep) -> Result<(), StoreError> {
        let record = match step {
            WizardStep::Business => collector.business(),
            WizardStep::Details => collector.details(),
            WizardStep::Features => collector.features(),
        };
        let Some(record) = record else {
            return Ok(());
        };
        self.write_json(step.key(), record)
    }

    /// Persist the finalized payload consumed by the report fetcher.
    pub fn save_payload(&self, payload: &IntakePayload) -> Result<(), StoreError> {
        self.write_json(keys::INTAKE_PAYLOAD, payload)
    }

    /// The finalized payload, or `None` when absent or unreadable.
    pub fn load_payload(&self) -> Option<IntakePayload> {
        self.read_record(keys::INTAKE_PAYLOAD).map(IntakePayload::new)
    }

    fn read_record(&self, key: &str) -> Option<Map<String, Value>> {
        let raw = match self.kv.read(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "wizard record unreadable; treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "wizard record malformed; treating as absent");
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.kv.write(key, &raw)
    }
}
