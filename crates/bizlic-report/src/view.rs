//! # Views
//!
//! Rendering targets for the report and question panels. Output sinks are
//! injected at construction; nothing writes to a global stream.
//!
//! Two implementations ship with the crate:
//!
//! - [`TerminalView`]: human-readable text.
//! - [`JsonView`]: one JSON document per render, for scripting.
//!
//! Both track which regions are currently shown in [`ViewRegions`] so the
//! caller (and tests) can observe loading, error and provenance state.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use crate::presenter::{
    AnswerModel, PresentationModel, RecommendationsView, Requirements, FALLBACK,
};

/// Indicator shown when a report was served from the store.
pub const CACHE_NOTICE: &str = "Loaded from cache, no regeneration request issued";

/// Report panel contract.
pub trait ReportView: Send {
    /// Show the loading indicator, hiding any previous error.
    fn show_loading(&mut self);

    /// Show a single error message, hiding the loading indicator.
    fn show_error(&mut self, message: &str);

    /// Render `model`. Clears loading and error indicators first. When
    /// `from_cache` is set, the cache provenance indicator is shown.
    fn render(&mut self, model: &PresentationModel, from_cache: bool);
}

/// Question panel contract.
pub trait AnswerView: Send {
    fn show_asking(&mut self);

    fn show_answer_error(&mut self, message: &str);

    fn render_answer(&mut self, model: &AnswerModel);
}

/// Which regions of a view are currently visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewRegions {
    pub loading: bool,
    pub error: Option<String>,
    /// Provenance indicator; set only for reports served from the store.
    pub provenance: Option<&'static str>,
    pub content: bool,
}

impl ViewRegions {
    /// A new load hides whatever was rendered before.
    fn loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.provenance = None;
        self.content = false;
    }

    fn error(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_string());
        self.provenance = None;
        self.content = false;
    }

    fn rendered(&mut self, from_cache: bool) {
        self.loading = false;
        self.error = None;
        self.provenance = from_cache.then_some(CACHE_NOTICE);
        self.content = true;
    }
}

// ---------------------------------------------------------------------------
// TerminalView
// ---------------------------------------------------------------------------

/// Plain-text view writing to an injected sink.
#[derive(Debug)]
pub struct TerminalView<W> {
    out: W,
    regions: ViewRegions,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            regions: ViewRegions::default(),
        }
    }

    pub fn regions(&self) -> &ViewRegions {
        &self.regions
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write view output");
        }
    }
}

impl<W: Write + Send> ReportView for TerminalView<W> {
    fn show_loading(&mut self) {
        self.regions.loading();
        self.emit("Generating report...\n");
    }

    fn show_error(&mut self, message: &str) {
        self.regions.error(message);
        self.emit(&format!("Error: {message}\n"));
    }

    fn render(&mut self, model: &PresentationModel, from_cache: bool) {
        self.regions.rendered(from_cache);
        let text = report_text(model, from_cache);
        self.emit(&text);
    }
}

impl<W: Write + Send> AnswerView for TerminalView<W> {
    fn show_asking(&mut self) {
        self.regions.loading();
        self.emit("Searching the regulations...\n");
    }

    fn show_answer_error(&mut self, message: &str) {
        self.regions.error(message);
        self.emit(&format!("Error: {message}\n"));
    }

    fn render_answer(&mut self, model: &AnswerModel) {
        self.regions.rendered(false);
        let text = answer_text(model);
        self.emit(&text);
    }
}

fn report_text(model: &PresentationModel, from_cache: bool) -> String {
    let mut s = String::new();
    let h = &model.header;

    if from_cache {
        s.push_str(&format!("[{CACHE_NOTICE}]\n\n"));
    }
    s.push_str(&format!("Licensing report for: {}\n", h.business_name));
    s.push_str(&format!(
        "Business type: {} | Area (sqm): {} | Seats: {} | City: {}\n",
        h.business_type, h.area_sqm, h.seating_capacity, h.city
    ));
    let badges = h.badge_labels();
    if badges.is_empty() {
        s.push_str(&format!("Features: {FALLBACK}\n"));
    } else {
        s.push_str(&format!("Features: {}\n", badges.join(", ")));
    }

    s.push_str("\nExecutive summary\n");
    s.push_str(&format!("  {}\n", model.executive_summary));

    s.push_str("\nRecommendations\n");
    match &model.recommendations {
        RecommendationsView::Phased { columns } => {
            for column in columns {
                s.push_str(&format!("  {}:\n", column.title));
                match column.placeholder {
                    Some(placeholder) => s.push_str(&format!("    {placeholder}\n")),
                    None => column
                        .items
                        .iter()
                        .for_each(|item| s.push_str(&format!("    - {item}\n"))),
                }
            }
        }
        RecommendationsView::Flat { items } => {
            for item in items {
                s.push_str(&format!("  - {item}\n"));
            }
        }
        RecommendationsView::Empty { placeholder } => s.push_str(&format!("  {placeholder}\n")),
    }

    s.push_str(&format!("\nEstimated total cost: {}\n", model.estimated_cost));
    s.push_str(&format!("Estimated timeline: {}\n", model.estimated_time));

    s.push_str(&format!("\n{}\n", model.rule_count.text()));
    match &model.requirements {
        Requirements::Empty { placeholder } => s.push_str(&format!("  {placeholder}\n")),
        Requirements::Grouped(breakdown) => {
            for group in &breakdown.groups {
                s.push_str(&format!("\n  {} ({})\n", group.category, group.rules.len()));
                for card in &group.rules {
                    s.push_str(&format!("    {} [{}]\n", card.heading, card.priority_text));
                    for action in &card.actions {
                        s.push_str(&format!("      - {action}\n"));
                    }
                    if let Some(cost) = &card.estimated_cost {
                        s.push_str(&format!("      Estimated cost: {cost}\n"));
                    }
                    if let Some(time) = &card.estimated_time {
                        s.push_str(&format!("      Estimated time: {time}\n"));
                    }
                }
            }

            let by_category: Vec<String> = breakdown
                .category_histogram
                .iter()
                .map(|c| format!("{} {}", c.category, c.count))
                .collect();
            let by_priority: Vec<String> = breakdown
                .priority_histogram
                .iter()
                .map(|p| format!("{} {}", p.priority, p.count))
                .collect();
            s.push_str(&format!("\nRules by category: {}\n", by_category.join(", ")));
            s.push_str(&format!("Rules by priority: {}\n", by_priority.join(", ")));

            s.push_str("\nAll rules\n");
            for raw in &breakdown.all_rules {
                s.push_str(&format!("  {}\n", raw.heading));
                for line in raw.json.lines() {
                    s.push_str(&format!("    {line}\n"));
                }
            }
        }
    }
    s
}

fn answer_text(model: &AnswerModel) -> String {
    let mut s = format!("{}\n\nSources\n", model.answer);
    if let Some(placeholder) = model.placeholder {
        s.push_str(&format!("  {placeholder}\n"));
    }
    for card in &model.sources {
        s.push_str(&format!("  {}\n    {}\n", card.title, card.preview));
    }
    s
}

// ---------------------------------------------------------------------------
// JsonView
// ---------------------------------------------------------------------------

/// View emitting one JSON document per render or error.
///
/// Loading indicators produce no output.
#[derive(Debug)]
pub struct JsonView<W> {
    out: W,
    regions: ViewRegions,
}

impl<W: Write + Send> JsonView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            regions: ViewRegions::default(),
        }
    }

    pub fn regions(&self) -> &ViewRegions {
        &self.regions
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, document: &serde_json::Value) {
        let result = serde_json::to_writer_pretty(&mut self.out, document)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write view output");
        }
    }
}

impl<W: Write + Send> ReportView for JsonView<W> {
    fn show_loading(&mut self) {
        self.regions.loading();
    }

    fn show_error(&mut self, message: &str) {
        self.regions.error(message);
        self.emit(&json!({ "error": message }));
    }

    fn render(&mut self, model: &PresentationModel, from_cache: bool) {
        self.regions.rendered(from_cache);
        let document = json!({
            "from_cache": from_cache,
            "provenance": self.regions.provenance,
            "report": model,
        });
        self.emit(&document);
    }
}

impl<W: Write + Send> AnswerView for JsonView<W> {
    fn show_asking(&mut self) {
        self.regions.loading();
    }

    fn show_answer_error(&mut self, message: &str) {
        self.regions.error(message);
        self.emit(&json!({ "error": message }));
    }

    fn render_answer(&mut self, model: &AnswerModel) {
        self.regions.rendered(false);
        self.emit(&json!(model));
    }
}
