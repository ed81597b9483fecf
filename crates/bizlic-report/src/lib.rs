//! # bizlic-report — Report Pipeline
//!
//! ```text
//! IntakePayload ─▶ ReportFetcher ─▶ Report ─▶ transform ─▶ PresentationModel ─▶ ReportView
//!                   │        │
//!              ReportStore  ReportSource
//! ```
//!
//! - [`fetcher`]: cache-first loading with forced refresh.
//! - [`presenter`]: pure transform into a renderable model.
//! - [`view`]: view contracts plus terminal and JSON implementations.
//! - [`session`]: single-in-flight report and question panels.

pub mod fetcher;
pub mod presenter;
pub mod session;
pub mod view;

pub use fetcher::{LoadedReport, Provenance, ReportFetcher};
pub use presenter::{present_answer, transform, AnswerModel, PresentationModel};
pub use session::{Outcome, QuestionPanel, Rendered, ReportSession};
pub use view::{AnswerView, JsonView, ReportView, TerminalView, ViewRegions, CACHE_NOTICE};
