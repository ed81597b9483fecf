//! # Report Payload Model
//!
//! The structured output of the report-generation service. Only the fields
//! the pipeline consumes are typed; the object is also kept exactly as
//! received, and that is what serializes back out. A persisted report is
//! therefore byte-for-byte the payload the service returned.
//!
//! ## Decoding
//!
//! All typed fields decode leniently (see `lenient`). A report with any
//! subset of fields absent is valid. A report is only rejected when the
//! payload is not a JSON object at all.
//!
//! ## Recommendations
//!
//! The service has emitted two incompatible shapes over time:
//!
//! ```json
//! "recommendations": ["step 1", "step 2"]
//! "recommendations": {"before_opening": [...], "during_setup": [...], "after_opening": [...]}
//! ```
//!
//! Both decode into [`Recommendations`]. Any other shape (a bare string, a
//! mapping without phase keys) decodes as [`Recommendations::Absent`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::lenient::{self, Fields};
use crate::priority::{FeatureFlag, Priority};

/// Phase keys of the phased recommendation schema, in display order.
const PHASE_KEYS: [&str; 3] = ["before_opening", "during_setup", "after_opening"];

const REPORT_FIELDS: [&str; 16] = [
    "business_name",
    "business_type",
    "area_sqm",
    "seating_capacity",
    "city",
    "has_gas",
    "serves_meat",
    "has_delivery",
    "has_alcohol",
    "executive_summary",
    "recommendations",
    "estimated_cost",
    "estimated_time",
    "matched_rules",
    "matched_rules_count",
    "error",
];

const RULE_FIELDS: [&str; 7] = [
    "id",
    "title",
    "category",
    "priority",
    "actions",
    "estimated_cost",
    "estimated_time",
];

/// A generated licensing report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Report {
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub area_sqm: Option<Value>,
    pub seating_capacity: Option<Value>,
    pub city: Option<Value>,
    pub has_gas: Option<bool>,
    pub serves_meat: Option<bool>,
    pub has_delivery: Option<bool>,
    pub has_alcohol: Option<bool>,
    pub executive_summary: Option<String>,
    pub recommendations: Recommendations,
    pub estimated_cost: Option<String>,
    pub estimated_time: Option<String>,
    /// One entry per element of the received array, objects or not.
    pub matched_rules: Vec<Rule>,
    /// Server-declared total; may legitimately differ from `matched_rules.len()`.
    pub matched_rules_count: Option<u64>,
    /// Explicit error marker set by the service instead of report content.
    pub error: Option<String>,
    /// Attributes the pipeline does not interpret.
    pub extra: Map<String, Value>,
    source: Map<String, Value>,
}

impl From<Map<String, Value>> for Report {
    fn from(source: Map<String, Value>) -> Self {
        let fields = Fields::new(&source);
        Self {
            business_name: fields.text("business_name"),
            business_type: fields.text("business_type"),
            area_sqm: fields.scalar("area_sqm"),
            seating_capacity: fields.scalar("seating_capacity"),
            city: fields.scalar("city"),
            has_gas: fields.flag("has_gas"),
            serves_meat: fields.flag("serves_meat"),
            has_delivery: fields.flag("has_delivery"),
            has_alcohol: fields.flag("has_alcohol"),
            executive_summary: fields.text("executive_summary"),
            recommendations: fields
                .get("recommendations")
                .map(Recommendations::from_value)
                .unwrap_or_default(),
            estimated_cost: fields.text("estimated_cost"),
            estimated_time: fields.text("estimated_time"),
            matched_rules: rules(fields.get("matched_rules")),
            matched_rules_count: fields.count("matched_rules_count"),
            error: fields.text("error"),
            extra: fields.extra(&REPORT_FIELDS),
            source,
        }
    }
}

impl From<Report> for Map<String, Value> {
    fn from(report: Report) -> Self {
        report.source
    }
}

impl Report {
    /// `true` when the report was decoded from `{}`. A key whose value is
    /// null or unusable still counts. An empty report is never a valid
    /// cache hit.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// The object as the service returned it.
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// `true` when the service flagged this payload as an error.
    pub fn has_error_marker(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Whether a feature flag is set. Absent flags read as unset.
    pub fn flag(&self, flag: FeatureFlag) -> bool {
        let value = match flag {
            FeatureFlag::Gas => self.has_gas,
            FeatureFlag::Meat => self.serves_meat,
            FeatureFlag::Delivery => self.has_delivery,
            FeatureFlag::Alcohol => self.has_alcohol,
        };
        value.unwrap_or(false)
    }

    /// Rule count to display: the server-declared total when present,
    /// otherwise the number of rules actually returned.
    pub fn rule_count(&self) -> u64 {
        self.matched_rules_count
            .unwrap_or(self.matched_rules.len() as u64)
    }

    pub fn area_sqm_text(&self) -> Option<String> {
        self.area_sqm.as_ref().and_then(lenient::scalar_text)
    }

    pub fn seating_capacity_text(&self) -> Option<String> {
        self.seating_capacity.as_ref().and_then(lenient::scalar_text)
    }

    pub fn city_text(&self) -> Option<String> {
        self.city.as_ref().and_then(lenient::scalar_text)
    }
}

/// One regulatory requirement matched to the business profile.
///
/// An entry that is not an object decodes with every field absent, so it
/// lands in the uncategorized, unspecified-priority buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Rule {
    /// Integer or string identifier, as the rule files define it.
    pub id: Option<Value>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub actions: Vec<String>,
    pub estimated_cost: Option<String>,
    pub estimated_time: Option<String>,
    pub extra: Map<String, Value>,
    source: Value,
}

impl From<Value> for Rule {
    fn from(source: Value) -> Self {
        let empty = Map::new();
        let fields = Fields::new(source.as_object().unwrap_or(&empty));
        Self {
            id: fields.scalar("id"),
            title: fields.text("title"),
            category: fields.text("category"),
            priority: fields.text("priority"),
            actions: fields.strings("actions"),
            estimated_cost: fields.text("estimated_cost"),
            estimated_time: fields.text("estimated_time"),
            extra: fields.extra(&RULE_FIELDS),
            source,
        }
    }
}

impl From<Rule> for Value {
    fn from(rule: Rule) -> Self {
        rule.source
    }
}

impl Rule {
    /// Category bucket for rules without one.
    pub const UNCATEGORIZED: &'static str = "Uncategorized";

    /// The entry as the service returned it.
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Category key used for grouping. Blank categories count as missing.
    pub fn category_key(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => Self::UNCATEGORIZED,
        }
    }

    /// Priority bucket of this rule.
    pub fn priority_bucket(&self) -> Priority {
        Priority::classify(self.priority.as_deref())
    }

    /// Identifier as display text; empty when absent.
    pub fn id_text(&self) -> String {
        self.id
            .as_ref()
            .and_then(lenient::scalar_text)
            .unwrap_or_default()
    }
}

fn rules(value: Option<&Value>) -> Vec<Rule> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let odd = items.iter().filter(|item| !item.is_object()).count();
    if odd > 0 {
        tracing::debug!(total = items.len(), odd, "matched_rules entries that are not objects");
    }
    items.iter().cloned().map(Rule::from).collect()
}

/// Recommendations in either of the two schemas the service has emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Recommendations {
    /// No usable recommendations.
    #[default]
    Absent,
    /// Single ordered list.
    Flat(Vec<String>),
    /// Three ordered lists keyed by opening phase.
    Phased(PhasedRecommendations),
}

/// Recommendations keyed by opening phase. A missing phase is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhasedRecommendations {
    pub before_opening: Vec<String>,
    pub during_setup: Vec<String>,
    pub after_opening: Vec<String>,
}

impl Recommendations {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Classify a raw JSON value into one of the known shapes.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::Flat(lenient::string_items(value)),
            Value::Object(map) if PHASE_KEYS.iter().any(|k| map.contains_key(*k)) => {
                let phase = |key: &str| {
                    map.get(key)
                        .map(lenient::string_items)
                        .unwrap_or_default()
                };
                Self::Phased(PhasedRecommendations {
                    before_opening: phase(PHASE_KEYS[0]),
                    during_setup: phase(PHASE_KEYS[1]),
                    after_opening: phase(PHASE_KEYS[2]),
                })
            }
            Value::Null => Self::Absent,
            other => {
                tracing::debug!(shape = json_kind(other), "unrecognised recommendations shape");
                Self::Absent
            }
        }
    }
}

impl<'de> Deserialize<'de> for Recommendations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for Recommendations {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Flat(items) => items.serialize(serializer),
            Self::Phased(phased) => phased.serialize(serializer),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
