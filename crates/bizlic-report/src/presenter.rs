//! # Report Presenter
//!
//! Pure transform from a decoded [`Report`] to the [`PresentationModel`] a
//! view renders. No I/O, no clock, no randomness: the same report always
//! yields an equal model.
//!
//! ## Fallbacks
//!
//! Every section tolerates a partially populated report:
//!
//! | Section | Missing input | Shown |
//! |---------|---------------|-------|
//! | Header fields | absent or blank | `—` |
//! | Executive summary | absent | [`NO_SUMMARY`] |
//! | Recommendations | absent, unknown shape, empty list | [`NO_RECOMMENDATIONS`] |
//! | Phase column | missing or empty phase | `—` |
//! | Cost / time | absent | [`NOT_SPECIFIED`] |
//! | Requirements | no rules | [`NO_RULES`], no histograms |
//!
//! ## Grouping
//!
//! Rules are partitioned by category in first-seen order; within a category
//! the original order is kept. Rules without a category land in
//! [`Rule::UNCATEGORIZED`].

use bizlic_client::Answer;
use bizlic_core::{FeatureFlag, Priority, Recommendations, Report, Rule};
use serde::Serialize;

/// Fallback token for absent header fields and empty phase columns.
pub const FALLBACK: &str = "—";
/// Shown when the report carries no executive summary.
pub const NO_SUMMARY: &str = "No executive summary was provided.";
/// Shown when no usable recommendations exist.
pub const NO_RECOMMENDATIONS: &str = "No recommendations were provided.";
/// Shown for an absent cost or time estimate.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Shown when the report matched no rules.
pub const NO_RULES: &str = "No rules found";
/// Shown when an answer cites no sources.
pub const NO_SOURCES: &str = "No relevant sources were found.";

/// Phase column titles in display order.
pub const PHASE_TITLES: [&str; 3] = ["Before opening", "During setup", "After opening"];

/// Everything a view needs to render one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationModel {
    pub header: Header,
    pub executive_summary: String,
    pub recommendations: RecommendationsView,
    pub estimated_cost: String,
    pub estimated_time: String,
    pub rule_count: RuleCount,
    pub requirements: Requirements,
}

/// Business header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub business_name: String,
    pub business_type: String,
    pub area_sqm: String,
    pub seating_capacity: String,
    pub city: String,
    /// Set flags in badge order.
    pub badges: Vec<FeatureFlag>,
}

impl Header {
    pub fn badge_labels(&self) -> Vec<&'static str> {
        self.badges.iter().map(|flag| flag.label()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationsView {
    /// Three columns in fixed phase order.
    Phased { columns: [PhaseColumn; 3] },
    Flat { items: Vec<String> },
    Empty { placeholder: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseColumn {
    pub title: &'static str,
    pub items: Vec<String>,
    /// Set only when `items` is empty.
    pub placeholder: Option<&'static str>,
}

impl PhaseColumn {
    fn new(title: &'static str, items: &[String]) -> Self {
        Self {
            title,
            items: items.to_vec(),
            placeholder: items.is_empty().then_some(FALLBACK),
        }
    }
}

/// Rule count with both sources kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleCount {
    /// `matched_rules_count` as the service declared it.
    pub declared: Option<u64>,
    /// Number of rules actually returned.
    pub returned: usize,
}

impl RuleCount {
    /// Count to display: declared when present, otherwise returned.
    pub fn shown(&self) -> u64 {
        self.declared.unwrap_or(self.returned as u64)
    }

    pub fn text(&self) -> String {
        format!("Found {} relevant rules", self.shown())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirements {
    /// No rules matched. No histograms are produced.
    Empty { placeholder: &'static str },
    Grouped(RequirementsBreakdown),
}

impl Requirements {
    pub fn breakdown(&self) -> Option<&RequirementsBreakdown> {
        match self {
            Self::Grouped(breakdown) => Some(breakdown),
            Self::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsBreakdown {
    /// Category groups in first-seen order.
    pub groups: Vec<CategoryGroup>,
    /// One count per category, in discovery order.
    pub category_histogram: Vec<CategoryCount>,
    /// One count per priority bucket, in [`Priority::ALL`] order.
    pub priority_histogram: [PriorityCount; 5],
    /// Every rule in original order, with its full JSON.
    pub all_rules: Vec<RawRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub rules: Vec<RuleCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

/// One rule as shown inside its category group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCard {
    /// Position in `matched_rules`.
    pub index: usize,
    pub heading: String,
    pub priority: Priority,
    /// Priority as the service wrote it, or the bucket label when absent.
    pub priority_text: String,
    pub actions: Vec<String>,
    pub estimated_cost: Option<String>,
    pub estimated_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRule {
    pub heading: String,
    pub json: String,
}

/// Build the presentation model for `report`.
pub fn transform(report: &Report) -> PresentationModel {
    PresentationModel {
        header: header(report),
        executive_summary: report
            .executive_summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_SUMMARY.into()),
        recommendations: recommendations(&report.recommendations),
        estimated_cost: or_not_specified(report.estimated_cost.as_deref()),
        estimated_time: or_not_specified(report.estimated_time.as_deref()),
        rule_count: RuleCount {
            declared: report.matched_rules_count,
            returned: report.matched_rules.len(),
        },
        requirements: requirements(&report.matched_rules),
    }
}

fn header(report: &Report) -> Header {
    Header {
        business_name: or_fallback(report.business_name.clone()),
        business_type: or_fallback(report.business_type.clone()),
        area_sqm: or_fallback(report.area_sqm_text()),
        seating_capacity: or_fallback(report.seating_capacity_text()),
        city: or_fallback(report.city_text()),
        badges: FeatureFlag::ALL
            .into_iter()
            .filter(|flag| report.flag(*flag))
            .collect(),
    }
}

fn or_fallback(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| FALLBACK.into())
}

fn or_not_specified(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.into(),
    }
}

fn recommendations(recs: &Recommendations) -> RecommendationsView {
    match recs {
        Recommendations::Phased(phased) => RecommendationsView::Phased {
            columns: [
                PhaseColumn::new(PHASE_TITLES[0], &phased.before_opening),
                PhaseColumn::new(PHASE_TITLES[1], &phased.during_setup),
                PhaseColumn::new(PHASE_TITLES[2], &phased.after_opening),
            ],
        },
        Recommendations::Flat(items) if !items.is_empty() => RecommendationsView::Flat {
            items: items.clone(),
        },
        Recommendations::Flat(_) | Recommendations::Absent => RecommendationsView::Empty {
            placeholder: NO_RECOMMENDATIONS,
        },
    }
}

fn requirements(rules: &[Rule]) -> Requirements {
    if rules.is_empty() {
        return Requirements::Empty {
            placeholder: NO_RULES,
        };
    }

    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut priority_histogram = Priority::ALL.map(|priority| PriorityCount { priority, count: 0 });

    for (index, rule) in rules.iter().enumerate() {
        let card = rule_card(index, rule);
        priority_histogram[bucket_slot(card.priority)].count += 1;

        let category = rule.category_key();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.rules.push(card),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                rules: vec![card],
            }),
        }
    }

    let category_histogram = groups
        .iter()
        .map(|g| CategoryCount {
            category: g.category.clone(),
            count: g.rules.len(),
        })
        .collect();

    let all_rules = rules
        .iter()
        .map(|rule| RawRule {
            heading: rule_heading(rule),
            json: serde_json::to_string_pretty(rule).unwrap_or_else(|_| "{}".into()),
        })
        .collect();

    Requirements::Grouped(RequirementsBreakdown {
        groups,
        category_histogram,
        priority_histogram,
        all_rules,
    })
}

fn bucket_slot(priority: Priority) -> usize {
    match priority {
        Priority::Critical => 0,
        Priority::High => 1,
        Priority::Medium => 2,
        Priority::Low => 3,
        Priority::Unspecified => 4,
    }
}

fn rule_card(index: usize, rule: &Rule) -> RuleCard {
    let priority = rule.priority_bucket();
    RuleCard {
        index,
        heading: rule_heading(rule),
        priority,
        priority_text: rule
            .priority
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| priority.label().to_string()),
        actions: rule.actions.clone(),
        estimated_cost: rule.estimated_cost.clone().filter(|s| !s.is_empty()),
        estimated_time: rule.estimated_time.clone().filter(|s| !s.is_empty()),
    }
}

/// `id – title`, either side possibly empty.
fn rule_heading(rule: &Rule) -> String {
    format!(
        "{} – {}",
        rule.id_text(),
        rule.title.as_deref().unwrap_or_default()
    )
}

/// Answer to a follow-up question, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerModel {
    pub answer: String,
    pub sources: Vec<SourceCard>,
    /// Set only when `sources` is empty.
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCard {
    pub title: String,
    pub preview: String,
}

/// Build the answer model for `answer`.
pub fn present_answer(answer: &Answer) -> AnswerModel {
    let sources: Vec<SourceCard> = answer
        .sources
        .iter()
        .map(|s| SourceCard {
            title: if s.id.is_empty() {
                "Excerpt".to_string()
            } else {
                format!("Excerpt #{}", s.id)
            },
            preview: s.preview.clone(),
        })
        .collect();
    AnswerModel {
        answer: answer.answer.clone(),
        placeholder: sources.is_empty().then_some(NO_SOURCES),
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn report(value: Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    fn histogram(model: &PresentationModel) -> Vec<(Priority, usize)> {
        model
            .requirements
            .breakdown()
            .unwrap()
            .priority_histogram
            .iter()
            .map(|p| (p.priority, p.count))
            .collect()
    }

    #[test]
    fn fire_safety_scenario() {
        let model = transform(&report(json!({
            "matched_rules": [
                {"id": 1, "category": "Fire Safety", "priority": "High"},
                {"id": 2, "category": "Fire Safety", "priority": "Critical"}
            ]
        })));

        let breakdown = model.requirements.breakdown().unwrap();
        assert_eq!(breakdown.groups.len(), 1);
        assert_eq!(breakdown.groups[0].category, "Fire Safety");
        let ids: Vec<_> = breakdown.groups[0].rules.iter().map(|r| r.index).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(
            histogram(&model),
            vec![
                (Priority::Critical, 1),
                (Priority::High, 1),
                (Priority::Medium, 0),
                (Priority::Low, 0),
                (Priority::Unspecified, 0),
            ]
        );
        assert_eq!(model.rule_count.text(), "Found 2 relevant rules");
    }

    #[test]
    fn absent_rules_yield_empty_state() {
        let model = transform(&report(json!({"business_name": "Kiosk"})));
        assert_eq!(
            model.requirements,
            Requirements::Empty {
                placeholder: NO_RULES
            }
        );
        assert!(model.requirements.breakdown().is_none());
        assert_eq!(model.rule_count.shown(), 0);
        assert_eq!(model.rule_count.text(), "Found 0 relevant rules");
    }

    #[test]
    fn phased_recommendations_with_empty_middle_column() {
        let model = transform(&report(json!({
            "recommendations": {"before_opening": ["A"], "during_setup": [], "after_opening": ["B"]}
        })));
        let RecommendationsView::Phased { columns } = model.recommendations else {
            panic!("expected phased view");
        };
        assert_eq!(columns[0].title, "Before opening");
        assert_eq!(columns[0].items, vec!["A".to_string()]);
        assert_eq!(columns[0].placeholder, None);
        assert_eq!(columns[1].title, "During setup");
        assert!(columns[1].items.is_empty());
        assert_eq!(columns[1].placeholder, Some(FALLBACK));
        assert_eq!(columns[2].title, "After opening");
        assert_eq!(columns[2].items, vec!["B".to_string()]);
    }

    #[test]
    fn flat_and_missing_recommendations() {
        let flat = transform(&report(json!({"recommendations": ["one", "two"]})));
        assert_eq!(
            flat.recommendations,
            RecommendationsView::Flat {
                items: vec!["one".into(), "two".into()]
            }
        );

        for value in [json!({}), json!({"recommendations": []}), json!({"recommendations": "text"})] {
            assert_eq!(
                transform(&report(value)).recommendations,
                RecommendationsView::Empty {
                    placeholder: NO_RECOMMENDATIONS
                }
            );
        }
    }

    #[test]
    fn header_fallbacks_and_badges() {
        let model = transform(&report(json!({
            "business_type": "restaurant",
            "area_sqm": 80,
            "city": "",
            "has_alcohol": true,
            "has_gas": true,
            "serves_meat": false
        })));
        assert_eq!(model.header.business_name, FALLBACK);
        assert_eq!(model.header.business_type, "restaurant");
        assert_eq!(model.header.area_sqm, "80");
        assert_eq!(model.header.seating_capacity, FALLBACK);
        assert_eq!(model.header.city, FALLBACK);
        assert_eq!(model.header.badge_labels(), vec!["Uses gas", "Sells alcohol"]);
        assert_eq!(model.executive_summary, NO_SUMMARY);
        assert_eq!(model.estimated_cost, NOT_SPECIFIED);
        assert_eq!(model.estimated_time, NOT_SPECIFIED);
    }

    #[test]
    fn grouping_uses_first_seen_order_and_uncategorized_default() {
        let model = transform(&report(json!({
            "matched_rules": [
                {"id": 1, "category": "Health"},
                {"id": 2},
                {"id": 3, "category": "Fire"},
                {"id": 4, "category": "Health"},
                {"id": 5, "category": ""}
            ]
        })));
        let breakdown = model.requirements.breakdown().unwrap();
        let groups: Vec<(&str, Vec<usize>)> = breakdown
            .groups
            .iter()
            .map(|g| (g.category.as_str(), g.rules.iter().map(|r| r.index).collect()))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("Health", vec![0, 3]),
                ("Uncategorized", vec![1, 4]),
                ("Fire", vec![2]),
            ]
        );
        let counts: Vec<_> = breakdown
            .category_histogram
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(counts, vec![("Health", 2), ("Uncategorized", 2), ("Fire", 1)]);
    }

    #[test]
    fn unknown_priorities_fold_into_unspecified() {
        let model = transform(&report(json!({
            "matched_rules": [{"priority": "urgent"}, {"priority": "גבוה"}, {}]
        })));
        assert_eq!(
            histogram(&model),
            vec![
                (Priority::Critical, 0),
                (Priority::High, 1),
                (Priority::Medium, 0),
                (Priority::Low, 0),
                (Priority::Unspecified, 2),
            ]
        );
        let cards = &model.requirements.breakdown().unwrap().groups[0].rules;
        assert_eq!(cards[0].priority_text, "urgent");
        assert_eq!(cards[2].priority_text, "Unspecified");
    }

    #[test]
    fn declared_count_is_kept_alongside_returned() {
        let model = transform(&report(json!({
            "matched_rules_count": 12,
            "matched_rules": [{"id": 1}]
        })));
        assert_eq!(model.rule_count.declared, Some(12));
        assert_eq!(model.rule_count.returned, 1);
        assert_eq!(model.rule_count.text(), "Found 12 relevant rules");
    }

    #[test]
    fn all_rules_listing_keeps_order_and_full_json() {
        let model = transform(&report(json!({
            "matched_rules": [
                {"id": 7, "title": "Signage", "applies_when": {"city": ["Haifa"]}},
                {"title": "Untitled id"}
            ]
        })));
        let all = &model.requirements.breakdown().unwrap().all_rules;
        assert_eq!(all[0].heading, "7 – Signage");
        assert_eq!(all[1].heading, " – Untitled id");
        let parsed: Value = serde_json::from_str(&all[0].json).unwrap();
        assert_eq!(parsed["applies_when"], json!({"city": ["Haifa"]}));
        assert!(all[0].json.contains('\n'));
    }

    #[test]
    fn all_rules_listing_shows_rules_as_received() {
        let model = transform(&report(json!({
            "matched_rules": [
                {"id": 2, "title": {"he": "x"}, "zeta": 1, "alpha": 2},
                "stray entry"
            ]
        })));
        let breakdown = model.requirements.breakdown().unwrap();
        let parsed: Value = serde_json::from_str(&breakdown.all_rules[0].json).unwrap();
        assert_eq!(parsed, json!({"id": 2, "title": {"he": "x"}, "zeta": 1, "alpha": 2}));
        assert!(parsed.get("actions").is_none());
        assert_eq!(breakdown.all_rules[1].json, "\"stray entry\"");

        let total: usize = breakdown.priority_histogram.iter().map(|p| p.count).sum();
        assert_eq!(total, 2);
        assert_eq!(breakdown.category_histogram.len(), 1);
        assert_eq!(breakdown.category_histogram[0].category, Rule::UNCATEGORIZED);
    }

    #[test]
    fn answer_cards_and_placeholder() {
        let answer: Answer = serde_json::from_value(json!({
            "answer": "Yes.",
            "sources": [{"id": 3, "preview": "Fire code section 2"}]
        }))
        .unwrap();
        let model = present_answer(&answer);
        assert_eq!(model.sources[0].title, "Excerpt #3");
        assert_eq!(model.placeholder, None);

        let bare: Answer = serde_json::from_value(json!({"answer": "No idea."})).unwrap();
        assert_eq!(present_answer(&bare).placeholder, Some(NO_SOURCES));

        let unnamed: Answer = serde_json::from_value(json!({
            "answer": "Yes.",
            "sources": [{"preview": "Section 9"}]
        }))
        .unwrap();
        assert_eq!(present_answer(&unnamed).sources[0].title, "Excerpt");
    }
}
