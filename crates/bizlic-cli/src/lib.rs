//! # bizlic-cli — Command-Line Front End
//!
//! Provides the `bizlic` command.
//!
//! ## Subcommands
//!
//! - `bizlic wizard` — Intake wizard steps and summary.
//! - `bizlic report` — Load and render the report, from cache when possible.
//! - `bizlic regenerate` — Discard the saved report and generate a new one.
//! - `bizlic clear` — Discard the saved report.
//! - `bizlic ask` — Ask a follow-up question about the regulations.
//! - `bizlic health` — Probe the licensing service.
//!
//! ```bash
//! bizlic wizard business --name "Falafel Haifa" --type restaurant
//! bizlic wizard details --area-sqm 120 --seating-capacity 40 --city Haifa
//! bizlic wizard features --gas --delivery
//! bizlic wizard summary
//! bizlic report
//! bizlic ask "Do I need a separate permit for outdoor seating?"
//! ```

pub mod ask;
pub mod report;
pub mod wizard;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bizlic_client::{ServiceClient, ServiceConfig};
use bizlic_store::{FileKeyValueStore, FileReportStore, WizardStore};

/// State directory used when neither `--state-dir` nor `BIZLIC_STATE_DIR` is set.
pub const DEFAULT_STATE_DIR: &str = ".bizlic";

/// Resolved global options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CliContext {
    state_dir: PathBuf,
    api_url: Option<String>,
}

impl CliContext {
    /// Resolve global options. Flags win over environment variables.
    pub fn resolve(state_dir: Option<PathBuf>, api_url: Option<String>) -> Self {
        let state_dir = state_dir
            .or_else(|| std::env::var_os("BIZLIC_STATE_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
        Self { state_dir, api_url }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn report_store(&self) -> FileReportStore {
        FileReportStore::new(FileKeyValueStore::new(&self.state_dir))
    }

    pub fn wizard_store(&self) -> WizardStore<FileKeyValueStore> {
        WizardStore::new(FileKeyValueStore::new(&self.state_dir))
    }

    /// Service configuration from the environment, with `--api-url` applied.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let config = ServiceConfig::from_env().context("invalid service configuration")?;
        match &self.api_url {
            Some(url) => Ok(ServiceConfig::new(url)
                .with_context(|| format!("invalid --api-url: {url}"))?
                .with_timeout(config.timeout_secs)),
            None => Ok(config),
        }
    }

    pub fn client(&self) -> Result<ServiceClient> {
        let config = self.service_config()?;
        tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "service client configured");
        ServiceClient::new(&config).context("failed to build HTTP client")
    }
}

/// Build the runtime that drives service calls.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
