//! # bizlic CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bizlic_cli::ask::{run_ask, run_health, AskArgs};
use bizlic_cli::report::{run_clear, run_regenerate, run_report, RegenerateArgs, ReportArgs};
use bizlic_cli::wizard::{run_wizard, WizardArgs};
use bizlic_cli::CliContext;

/// Business licensing report CLI.
///
/// Collects a business profile, requests a licensing report from the
/// licensing service, renders it, and answers follow-up questions about
/// the regulations.
#[derive(Parser, Debug)]
#[command(name = "bizlic", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the licensing service. Overrides BIZLIC_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved report and wizard records.
    /// Overrides BIZLIC_STATE_DIR.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Intake wizard: business, details, features, summary.
    Wizard(WizardArgs),

    /// Show the licensing report, generating it if none is saved.
    Report(ReportArgs),

    /// Discard the saved report and generate a new one.
    Regenerate(RegenerateArgs),

    /// Discard the saved report.
    Clear,

    /// Ask a follow-up question about the regulations.
    Ask(AskArgs),

    /// Check that the licensing service is reachable.
    Health,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext::resolve(cli.state_dir, cli.api_url);
    tracing::debug!(state_dir = %ctx.state_dir().display(), "bizlic starting");

    let result = match cli.command {
        Commands::Wizard(args) => run_wizard(&args, &ctx),
        Commands::Report(args) => run_report(&args, &ctx),
        Commands::Regenerate(args) => run_regenerate(&args, &ctx),
        Commands::Clear => run_clear(&ctx),
        Commands::Ask(args) => run_ask(&args, &ctx),
        Commands::Health => run_health(&ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlic_cli::wizard::WizardCommand;

    #[test]
    fn cli_parse_report_flags() {
        let cli = Cli::try_parse_from(["bizlic", "report", "--refresh", "--json"]).unwrap();
        if let Commands::Report(args) = cli.command {
            assert!(args.refresh);
            assert!(args.json);
        } else {
            panic!("expected report command");
        }
    }

    #[test]
    fn cli_parse_report_defaults() {
        let cli = Cli::try_parse_from(["bizlic", "report"]).unwrap();
        if let Commands::Report(args) = cli.command {
            assert!(!args.refresh);
            assert!(!args.json);
        }
        assert_eq!(cli.verbose, 0);
        assert!(cli.api_url.is_none());
        assert!(cli.state_dir.is_none());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bizlic",
            "clear",
            "-vv",
            "--state-dir",
            "/tmp/state",
            "--api-url",
            "http://localhost:5001",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Clear));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/state")));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:5001"));
    }

    #[test]
    fn cli_parse_regenerate_yes() {
        let cli = Cli::try_parse_from(["bizlic", "regenerate", "--yes"]).unwrap();
        if let Commands::Regenerate(args) = cli.command {
            assert!(args.yes);
        } else {
            panic!("expected regenerate command");
        }
    }

    #[test]
    fn cli_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["bizlic", "ask", "Do", "I", "need", "a", "permit?"]).unwrap();
        if let Commands::Ask(args) = cli.command {
            assert_eq!(args.question.join(" "), "Do I need a permit?");
        } else {
            panic!("expected ask command");
        }
    }

    #[test]
    fn cli_parse_ask_requires_question() {
        assert!(Cli::try_parse_from(["bizlic", "ask"]).is_err());
    }

    #[test]
    fn cli_parse_wizard_business() {
        let cli = Cli::try_parse_from([
            "bizlic",
            "wizard",
            "business",
            "--name",
            "Falafel Haifa",
            "--type",
            "restaurant",
        ])
        .unwrap();
        let Commands::Wizard(args) = cli.command else {
            panic!("expected wizard command");
        };
        match args.command {
            WizardCommand::Business {
                name,
                business_type,
            } => {
                assert_eq!(name, "Falafel Haifa");
                assert_eq!(business_type, "restaurant");
            }
            other => panic!("expected business step, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_wizard_features() {
        let cli = Cli::try_parse_from(["bizlic", "wizard", "features", "--gas", "--alcohol"]).unwrap();
        let Commands::Wizard(args) = cli.command else {
            panic!("expected wizard command");
        };
        match args.command {
            WizardCommand::Features {
                gas,
                meat,
                delivery,
                alcohol,
            } => {
                assert!(gas && alcohol);
                assert!(!meat && !delivery);
            }
            other => panic!("expected features step, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_wizard_business_requires_name() {
        assert!(Cli::try_parse_from(["bizlic", "wizard", "business", "--type", "cafe"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
