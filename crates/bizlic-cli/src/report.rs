//! # Report CLI — Show, regenerate, and clear the licensing report.
//!
//! ```bash
//! # Render the report, generating it only if nothing is saved yet:
//! bizlic report
//!
//! # Ask the service for a fresh report and print it as JSON:
//! bizlic report --refresh --json
//!
//! # Discard the saved report and generate a new one:
//! bizlic regenerate --yes
//! ```

use std::io::Stdout;

use anyhow::{Context, Result};
use clap::Args;

use bizlic_client::{ServiceClient, ServiceError};
use bizlic_core::IntakePayload;
use bizlic_report::{
    JsonView, Outcome, Rendered, ReportFetcher, ReportSession, ReportView, TerminalView,
};
use bizlic_store::{FileReportStore, ReportStore};

use crate::CliContext;

/// `report` subcommand arguments.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Request a new report even if one is saved.
    #[arg(long)]
    pub refresh: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// `regenerate` subcommand arguments.
#[derive(Args, Debug)]
pub struct RegenerateArgs {
    /// Confirm that the saved report should be discarded.
    #[arg(long)]
    pub yes: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Open,
    Refresh,
    Regenerate,
}

type Session<V> = ReportSession<FileReportStore, ServiceClient, V>;

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs, ctx: &CliContext) -> Result<u8> {
    let action = if args.refresh {
        Action::Refresh
    } else {
        Action::Open
    };
    run_action(action, args.json, ctx)
}

/// Execute the regenerate subcommand.
pub fn run_regenerate(args: &RegenerateArgs, ctx: &CliContext) -> Result<u8> {
    if !args.yes {
        println!(
            "This discards the saved report and sends a new generation request.\n\
             Re-run with --yes to confirm."
        );
        return Ok(2);
    }
    run_action(Action::Regenerate, args.json, ctx)
}

/// Execute the clear subcommand.
pub fn run_clear(ctx: &CliContext) -> Result<u8> {
    ctx.report_store()
        .clear()
        .with_context(|| format!("failed to clear saved report in {}", ctx.state_dir().display()))?;
    println!("Saved report cleared.");
    Ok(0)
}

fn run_action(action: Action, json: bool, ctx: &CliContext) -> Result<u8> {
    let payload = intake_payload(ctx);
    let fetcher = ReportFetcher::new(ctx.report_store(), ctx.client()?);
    let rt = crate::runtime()?;

    let result = if json {
        let session = ReportSession::new(fetcher, JsonView::new(std::io::stdout()));
        rt.block_on(dispatch(&session, action, &payload))
    } else {
        let session: Session<TerminalView<Stdout>> =
            ReportSession::new(fetcher, TerminalView::new(std::io::stdout()));
        rt.block_on(dispatch(&session, action, &payload))
    };

    Ok(exit_code(&result))
}

async fn dispatch<V: ReportView>(
    session: &Session<V>,
    action: Action,
    payload: &IntakePayload,
) -> Result<Outcome<Rendered>, ServiceError> {
    match action {
        Action::Open => session.open(payload).await,
        Action::Refresh => session.refresh(payload).await,
        Action::Regenerate => session.regenerate(payload).await,
    }
}

/// The saved business profile, or an empty payload when the wizard has not
/// been completed.
fn intake_payload(ctx: &CliContext) -> IntakePayload {
    ctx.wizard_store().load_payload().unwrap_or_else(|| {
        tracing::warn!("no saved business profile; run `bizlic wizard summary` first");
        IntakePayload::default()
    })
}

/// The view has already shown the outcome; only the exit code remains.
fn exit_code(result: &Result<Outcome<Rendered>, ServiceError>) -> u8 {
    match result {
        Ok(Outcome::Completed(rendered)) => {
            tracing::debug!(provenance = ?rendered.provenance, "report rendered");
            0
        }
        Ok(Outcome::Ignored) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "report request failed");
            1
        }
    }
}
