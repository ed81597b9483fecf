//! # Wizard CLI — Collect the business profile step by step.
//!
//! Each step is persisted under its own key in the state directory, so the
//! steps can be run across separate invocations:
//!
//! ```bash
//! bizlic wizard business --name "Falafel Haifa" --type restaurant
//! bizlic wizard details --area-sqm 120 --city Haifa
//! bizlic wizard features --gas --meat
//! bizlic wizard summary
//! ```
//!
//! `summary` merges the steps and saves the payload the report is generated
//! from.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bizlic_core::{BusinessStep, DetailsStep, FeaturesStep, WizardSummary};
use bizlic_store::WizardStep;

use crate::CliContext;

/// Wizard subcommand arguments.
#[derive(Args, Debug)]
pub struct WizardArgs {
    #[command(subcommand)]
    pub command: WizardCommand,
}

#[derive(Subcommand, Debug)]
pub enum WizardCommand {
    /// Step 1: business name and type.
    Business {
        /// Business name.
        #[arg(long)]
        name: String,

        /// Business type (e.g., restaurant, cafe, bar).
        #[arg(long = "type")]
        business_type: String,
    },

    /// Step 2: size and location. Every field is optional.
    Details {
        #[arg(long)]
        area_sqm: Option<String>,

        #[arg(long)]
        seating_capacity: Option<String>,

        #[arg(long)]
        employees: Option<String>,

        #[arg(long)]
        city: Option<String>,
    },

    /// Step 3: business features. Omitted flags are recorded as unset.
    Features {
        /// The business uses gas.
        #[arg(long)]
        gas: bool,

        /// The business serves meat.
        #[arg(long)]
        meat: bool,

        /// The business offers delivery.
        #[arg(long)]
        delivery: bool,

        /// The business sells alcohol.
        #[arg(long)]
        alcohol: bool,
    },

    /// Review the collected profile and save it for report generation.
    Summary {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the wizard subcommand.
pub fn run_wizard(args: &WizardArgs, ctx: &CliContext) -> Result<u8> {
    let store = ctx.wizard_store();
    let mut wizard = store.load();

    match &args.command {
        WizardCommand::Business {
            name,
            business_type,
        } => {
            let step = BusinessStep::new(name.as_str(), business_type.as_str())?;
            wizard.record_business(&step);
            store
                .save_step(&wizard, WizardStep::Business)
                .context("failed to save business step")?;
            println!("Saved business step. Next: bizlic wizard details");
        }
        WizardCommand::Details {
            area_sqm,
            seating_capacity,
            employees,
            city,
        } => {
            if wizard.business().is_none() {
                tracing::warn!("details recorded before the business step");
            }
            wizard.record_details(&DetailsStep {
                area_sqm: area_sqm.clone(),
                seating_capacity: seating_capacity.clone(),
                employees: employees.clone(),
                city: city.clone(),
            });
            store
                .save_step(&wizard, WizardStep::Details)
                .context("failed to save details step")?;
            println!("Saved details step. Next: bizlic wizard features");
        }
        WizardCommand::Features {
            gas,
            meat,
            delivery,
            alcohol,
        } => {
            wizard.record_features(&FeaturesStep {
                has_gas: *gas,
                serves_meat: *meat,
                has_delivery: *delivery,
                has_alcohol: *alcohol,
            });
            store
                .save_step(&wizard, WizardStep::Features)
                .context("failed to save features step")?;
            println!("Saved features step. Next: bizlic wizard summary");
        }
        WizardCommand::Summary { json } => {
            let summary = wizard.summary();
            let payload = wizard
                .finalize()
                .context("the business step is incomplete; run `bizlic wizard business` first")?;
            store
                .save_payload(&payload)
                .context("failed to save business profile")?;
            tracing::info!(fields = payload.fields().len(), "business profile saved");

            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary_text(&summary));
                println!("\nProfile saved. Next: bizlic report");
            }
        }
    }
    Ok(0)
}

fn summary_text(summary: &WizardSummary) -> String {
    let features = if summary.features.is_empty() {
        "none".to_string()
    } else {
        summary
            .features
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Business name:     {}\n\
         Business type:     {}\n\
         Area (sqm):        {}\n\
         Seating capacity:  {}\n\
         Location type:     {}\n\
         Features:          {}\n",
        summary.business_name,
        summary.business_type,
        summary.area_sqm,
        summary.seating_capacity,
        summary.location_type,
        features
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlic_core::FeatureFlag;
    use serde_json::json;
    use std::path::PathBuf;

    fn ctx(dir: &std::path::Path) -> CliContext {
        CliContext::resolve(Some(PathBuf::from(dir)), None)
    }

    fn run(ctx: &CliContext, command: WizardCommand) -> Result<u8> {
        run_wizard(&WizardArgs { command }, ctx)
    }

    #[test]
    fn full_wizard_saves_payload() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(dir.path());

        run(
            &ctx,
            WizardCommand::Business {
                name: "Falafel Haifa".into(),
                business_type: "restaurant".into(),
            },
        )
        .unwrap();
        run(
            &ctx,
            WizardCommand::Details {
                area_sqm: Some("120".into()),
                seating_capacity: None,
                employees: Some("6".into()),
                city: Some("Haifa".into()),
            },
        )
        .unwrap();
        run(
            &ctx,
            WizardCommand::Features {
                gas: true,
                meat: false,
                delivery: true,
                alcohol: false,
            },
        )
        .unwrap();
        assert_eq!(run(&ctx, WizardCommand::Summary { json: true }).unwrap(), 0);

        let payload = ctx.wizard_store().load_payload().unwrap();
        assert_eq!(payload.get("business_name"), Some(&json!("Falafel Haifa")));
        assert_eq!(payload.get("employees"), Some(&json!("6")));
        assert_eq!(payload.get("has_delivery"), Some(&json!(true)));
        assert_eq!(payload.get("serves_meat"), Some(&json!(false)));
    }

    #[test]
    fn summary_without_business_step_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(dir.path());
        let err = run(&ctx, WizardCommand::Summary { json: false }).unwrap_err();
        assert!(format!("{err:#}").contains("business_name"));
        assert!(ctx.wizard_store().load_payload().is_none());
    }

    #[test]
    fn blank_business_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            &ctx(dir.path()),
            WizardCommand::Business {
                name: "  ".into(),
                business_type: "cafe".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("business_name"));
    }

    #[test]
    fn summary_text_lists_features() {
        let summary = WizardSummary {
            business_name: "Kiosk".into(),
            business_type: "cafe".into(),
            area_sqm: "-".into(),
            seating_capacity: "-".into(),
            location_type: "residential area".into(),
            features: vec![FeatureFlag::Gas, FeatureFlag::Alcohol],
        };
        let text = summary_text(&summary);
        assert!(text.contains("Features:          Uses gas, Sells alcohol"));
        assert!(text.contains("Location type:     residential area"));
    }
}
