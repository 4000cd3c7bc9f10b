//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::DispatcherSettings;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SettingsSummary>,
}

#[derive(Serialize)]
struct SettingsSummary {
    environment: String,
    max_concurrency: usize,
    deadline_margin_ms: u64,
    order_created_delay_ms: u64,
    user_registered_delay_ms: u64,
    notification_delay_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating settings");

    let result = validate_settings(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Settings validation failed")
    }
}

fn validate_settings(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(settings) => {
            let warnings = collect_warnings(&settings);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(SettingsSummary {
                    environment: settings.environment.clone(),
                    max_concurrency: settings.dispatcher.max_concurrency,
                    deadline_margin_ms: settings.dispatcher.deadline_margin_ms,
                    order_created_delay_ms: settings.handlers.order_created_delay_ms,
                    user_registered_delay_ms: settings.handlers.user_registered_delay_ms,
                    notification_delay_ms: settings.handlers.notification_delay_ms,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect non-fatal issues
fn collect_warnings(settings: &DispatcherSettings) -> Vec<String> {
    let mut warnings = Vec::new();

    if settings.dispatcher.max_concurrency == 1 {
        warnings.push("max_concurrency = 1 - messages are processed sequentially".to_string());
    }

    if settings.dispatcher.deadline_margin_ms == 0 {
        warnings.push(
            "deadline_margin_ms = 0 - the runtime may be killed before the report is returned"
                .to_string(),
        );
    }

    if settings.environment == "unknown" {
        warnings.push("environment not set - logs will report 'unknown'".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Settings are valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Environment: {}", summary.environment);
            println!("  Max concurrency: {}", summary.max_concurrency);
            println!("  Deadline margin: {}ms", summary.deadline_margin_ms);
            println!(
                "  Handler delays (ms): order_created={}, user_registered={}, notification={}",
                summary.order_created_delay_ms,
                summary.user_registered_delay_ms,
                summary.notification_delay_ms
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Settings are invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
