//! # Intake Wizard
//!
//! Three form steps collect the business profile submitted for report
//! generation:
//!
//! | Step | Fields |
//! |------|--------|
//! | business | `business_name`, `business_type` |
//! | details  | `area_sqm`, `seating_capacity`, `employees`, `city` |
//! | features | `has_gas`, `serves_meat`, `has_delivery`, `has_alcohol` |
//!
//! Each step record is additive: the details record carries the business
//! fields forward, the features record carries the details record forward.
//! The finalized payload merges all three records, later records winning on
//! key collisions. Only presence is checked; values are free text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::lenient;
use crate::priority::FeatureFlag;

/// Fallback shown in the summary for missing values.
const SUMMARY_FALLBACK: &str = "-";

/// Location type shown when the wizard did not collect one.
const DEFAULT_LOCATION_TYPE: &str = "residential area";

/// Finalized wizard output: the request body of the report-generation call.
///
/// The schema is open; the service reads the fields it knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakePayload(Map<String, Value>);

impl IntakePayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First step: who the business is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessStep {
    business_name: String,
    business_type: String,
}

impl BusinessStep {
    /// Both fields are required and must not be blank.
    pub fn new(
        business_name: impl Into<String>,
        business_type: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let business_name = required(business_name.into(), "business_name")?;
        let business_type = required(business_type.into(), "business_type")?;
        Ok(Self {
            business_name,
            business_type,
        })
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("business_name".into(), Value::String(self.business_name.clone()));
        fields.insert("business_type".into(), Value::String(self.business_type.clone()));
        fields
    }
}

/// Second step: size and location. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsStep {
    pub area_sqm: Option<String>,
    pub seating_capacity: Option<String>,
    pub employees: Option<String>,
    pub city: Option<String>,
}

impl DetailsStep {
    fn fields(&self) -> Map<String, Value> {
        [
            ("area_sqm", &self.area_sqm),
            ("seating_capacity", &self.seating_capacity),
            ("employees", &self.employees),
            ("city", &self.city),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| (key.to_string(), Value::String(v.trim().to_string())))
        })
        .collect()
    }
}

/// Third step: the four boolean features. Unchecked flags are recorded as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeaturesStep {
    pub has_gas: bool,
    pub serves_meat: bool,
    pub has_delivery: bool,
    pub has_alcohol: bool,
}

impl FeaturesStep {
    pub fn is_set(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::Gas => self.has_gas,
            FeatureFlag::Meat => self.serves_meat,
            FeatureFlag::Delivery => self.has_delivery,
            FeatureFlag::Alcohol => self.has_alcohol,
        }
    }

    fn fields(&self) -> Map<String, Value> {
        FeatureFlag::ALL
            .iter()
            .map(|flag| (flag.key().to_string(), Value::Bool(self.is_set(*flag))))
            .collect()
    }
}

/// Accumulates step records into the final payload.
///
/// Records are plain JSON maps so they can be persisted per step and
/// reloaded by a later invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardCollector {
    business: Option<Map<String, Value>>,
    details: Option<Map<String, Value>>,
    features: Option<Map<String, Value>>,
}

impl WizardCollector {
    /// Rebuild a collector from previously persisted step records.
    pub fn from_records(
        business: Option<Map<String, Value>>,
        details: Option<Map<String, Value>>,
        features: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            business,
            details,
            features,
        }
    }

    pub fn business(&self) -> Option<&Map<String, Value>> {
        self.business.as_ref()
    }

    pub fn details(&self) -> Option<&Map<String, Value>> {
        self.details.as_ref()
    }

    pub fn features(&self) -> Option<&Map<String, Value>> {
        self.features.as_ref()
    }

    /// Record the business step, replacing any earlier business record.
    pub fn record_business(&mut self, step: &BusinessStep) -> &Map<String, Value> {
        self.business.insert(step.fields())
    }

    /// Record the details step on top of the business record.
    pub fn record_details(&mut self, step: &DetailsStep) -> &Map<String, Value> {
        let mut record = self.business.clone().unwrap_or_default();
        record.extend(step.fields());
        self.details.insert(record)
    }

    /// Record the features step on top of the details record.
    pub fn record_features(&mut self, step: &FeaturesStep) -> &Map<String, Value> {
        let mut record = self.details.clone().unwrap_or_default();
        record.extend(step.fields());
        self.features.insert(record)
    }

    /// Merge all step records into the payload submitted for generation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingField`] if the merged record lacks a
    /// non-blank `business_name` or `business_type`.
    pub fn finalize(&self) -> Result<IntakePayload, ModelError> {
        let merged = self.merged();
        for key in ["business_name", "business_type"] {
            let present = merged
                .get(key)
                .and_then(lenient::scalar_text)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(ModelError::MissingField(key));
            }
        }
        Ok(IntakePayload::new(merged))
    }

    /// Summary of everything collected so far, with fallbacks for gaps.
    pub fn summary(&self) -> WizardSummary {
        let merged = self.merged();
        let text = |key: &str| merged.get(key).and_then(lenient::scalar_text).filter(|v| !v.is_empty());
        WizardSummary {
            business_name: text("business_name").unwrap_or_else(|| SUMMARY_FALLBACK.into()),
            business_type: text("business_type").unwrap_or_else(|| SUMMARY_FALLBACK.into()),
            area_sqm: text("area_sqm").unwrap_or_else(|| SUMMARY_FALLBACK.into()),
            seating_capacity: text("seating_capacity").unwrap_or_else(|| SUMMARY_FALLBACK.into()),
            location_type: text("location_type").unwrap_or_else(|| DEFAULT_LOCATION_TYPE.into()),
            features: FeatureFlag::ALL
                .into_iter()
                .filter(|flag| merged.get(flag.key()).is_some_and(lenient::truthy))
                .collect(),
        }
    }

    fn merged(&self) -> Map<String, Value> {
        [&self.business, &self.details, &self.features]
            .into_iter()
            .flatten()
            .fold(Map::new(), |mut acc, record| {
                acc.extend(record.clone());
                acc
            })
    }
}

/// Review screen shown before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSummary {
    pub business_name: String,
    pub business_type: String,
    pub area_sqm: String,
    pub seating_capacity: String,
    pub location_type: String,
    pub features: Vec<FeatureFlag>,
}

fn required(value: String, field: &'static str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
