//! # bizlic-core — Foundational Types for the Licensing Report Pipeline
//!
//! Defines the data model shared by every other crate in the workspace:
//! the report payload returned by the generation service, its regulatory
//! rules, the fixed priority and feature-flag vocabularies, and the intake
//! wizard that produces the payload submitted for generation.
//!
//! ## Key Design Principles
//!
//! 1. **Tolerant decoding.** The generation service is model-backed and its
//!    output drifts. Every consumed field decodes leniently: a wrong-typed
//!    scalar becomes absent rather than failing the whole report.
//!
//! 2. **Tagged recommendation shapes.** Two historical schemas exist (flat
//!    list and phased mapping). They decode into one [`Recommendations`] enum
//!    so consumers match on shape instead of probing JSON.
//!
//! 3. **Opaque passthrough.** Reports and rules keep the JSON they were
//!    decoded from and serialize it back unchanged, so a persistence
//!    round-trip preserves attributes the pipeline does not read.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bizlic-*` crates (leaf of the DAG).
//! - No I/O. No `.unwrap()` outside tests.

pub mod error;
mod lenient;
pub mod priority;
pub mod report;
pub mod wizard;

pub use error::ModelError;
pub use priority::{FeatureFlag, Priority};
pub use report::{PhasedRecommendations, Recommendations, Report, Rule};
pub use wizard::{
    BusinessStep, DetailsStep, FeaturesStep, IntakePayload, WizardCollector, WizardSummary,
};
