//! # Question and Health CLI
//!
//! ```bash
//! bizlic ask "Is a fire safety permit required for a 40-seat cafe?"
//! bizlic health
//! ```

use anyhow::{Context, Result};
use clap::Args;

use bizlic_report::{AnswerView, JsonView, QuestionPanel, TerminalView};

use crate::CliContext;

/// `ask` subcommand arguments.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Print the answer as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the ask subcommand.
pub fn run_ask(args: &AskArgs, ctx: &CliContext) -> Result<u8> {
    let question = args.question.join(" ");
    let client = ctx.client()?;
    let rt = crate::runtime()?;

    let code = if args.json {
        rt.block_on(ask_with(QuestionPanel::new(client, JsonView::new(std::io::stdout())), &question))
    } else {
        rt.block_on(ask_with(QuestionPanel::new(client, TerminalView::new(std::io::stdout())), &question))
    };
    Ok(code)
}

async fn ask_with<V: AnswerView>(
    panel: QuestionPanel<bizlic_client::ServiceClient, V>,
    question: &str,
) -> u8 {
    match panel.ask(question).await {
        Ok(_) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "question failed");
            1
        }
    }
}

/// Execute the health subcommand.
pub fn run_health(ctx: &CliContext) -> Result<u8> {
    let client = ctx.client()?;
    let config = ctx.service_config()?;
    let rt = crate::runtime()?;

    let health = rt
        .block_on(client.health())
        .with_context(|| format!("health check against {} failed", config.base_url))?;

    let message = health.message.as_deref().unwrap_or("");
    println!("status:  {}", health.status);
    if !message.is_empty() {
        println!("message: {message}");
    }
    for (key, value) in &health.details {
        println!("{key}: {value}");
    }
    Ok(if health.is_ok() { 0 } else { 1 })
}
