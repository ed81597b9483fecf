//! # Fixed Vocabularies — Priorities and Feature Flags
//!
//! Both vocabularies have a fixed display order that the presenter relies
//! on. Adding a variant forces every `match` in the workspace to handle it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority bucket of a regulatory rule.
///
/// The display order is fixed: Critical, High, Medium, Low, Unspecified.
/// Any label that does not classify as one of the four named buckets folds
/// into [`Priority::Unspecified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Unspecified,
}

impl Priority {
    /// All buckets in display order.
    pub const ALL: [Priority; 5] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::Unspecified,
    ];

    /// Display label of the bucket.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unspecified => "Unspecified",
        }
    }

    /// Classify a raw priority label from the service.
    ///
    /// English labels match case-insensitively. The Hebrew labels the
    /// generation service emits are accepted as aliases.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unspecified;
        };
        match raw.trim().to_lowercase().as_str() {
            "critical" | "קריטי" => Self::Critical,
            "high" | "גבוה" => Self::High,
            "medium" | "בינוני" => Self::Medium,
            "low" | "נמוך" => Self::Low,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean business feature collected by the wizard and echoed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureFlag {
    Gas,
    Meat,
    Delivery,
    Alcohol,
}

impl FeatureFlag {
    /// All flags in badge order: gas, meat, delivery, alcohol.
    pub const ALL: [FeatureFlag; 4] = [
        FeatureFlag::Gas,
        FeatureFlag::Meat,
        FeatureFlag::Delivery,
        FeatureFlag::Alcohol,
    ];

    /// Payload key carrying the flag.
    pub fn key(self) -> &'static str {
        match self {
            Self::Gas => "has_gas",
            Self::Meat => "serves_meat",
            Self::Delivery => "has_delivery",
            Self::Alcohol => "has_alcohol",
        }
    }

    /// Badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gas => "Uses gas",
            Self::Meat => "Serves meat",
            Self::Delivery => "Offers delivery",
            Self::Alcohol => "Sells alcohol",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
