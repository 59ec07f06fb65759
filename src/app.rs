//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - loads the model artifact and reference dataset
//! - hands over to the TUI or prints a one-shot result

use clap::Parser;
use serde::Serialize;

use crate::cli::{Command, DemoArgs, PredictArgs, SourceArgs};
use crate::domain::{InferenceResult, ListingQuery, RunConfig};
use crate::error::AppError;

pub mod context;
pub mod inference;

pub use context::AppContext;

/// Entry point for the `lp` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; flags and the real environment still apply.
    dotenvy::dotenv().ok();

    // `lp` and `lp --model x.json` behave like `lp tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
        Command::Catalogue(args) => handle_catalogue(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    crate::logging::init(config.log_file.as_deref(), true)?;

    let ctx = AppContext::load(&config)?;
    crate::tui::run(&ctx)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.source);
    crate::logging::init(config.log_file.as_deref(), false)?;

    let ctx = AppContext::load(&config)?;
    let query = query_from_args(&args, &ctx);
    query.validate().map_err(AppError::startup)?;

    let result = ctx.classify(&query).inspect_err(|e| log::error!("{e}"))?;
    log::info!("scored listing: {} ({:.1}%)", result.label, result.confidence);

    if args.json {
        let out = PredictionJson::new(&query, &result);
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| AppError::io(format!("Failed to encode result JSON: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", crate::report::format_prediction(&query, &result));
    }
    Ok(())
}

fn handle_catalogue(args: SourceArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    crate::logging::init(config.log_file.as_deref(), false)?;

    let ctx = AppContext::load(&config)?;
    println!("{}", crate::report::format_catalogue(ctx.catalogue()));
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    crate::logging::init(None, false)?;

    let config = crate::data::DemoConfig {
        count: args.count,
        seed: args.seed,
    };
    let out = crate::data::write_demo(&args.out_dir, &config, args.force)?;
    println!("Wrote {} listings to {}", out.rows, out.dataset.display());
    println!("Wrote model artifact to {}", out.artifact.display());
    println!(
        "Try: lp --dataset {} --model {}",
        out.dataset.display(),
        out.artifact.display()
    );
    Ok(())
}

pub fn run_config_from_args(args: &SourceArgs) -> RunConfig {
    RunConfig {
        model_path: args.model.clone(),
        dataset_path: args.dataset.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Unset coordinates fall back to the dataset means, like the form does.
fn query_from_args(args: &PredictArgs, ctx: &AppContext) -> ListingQuery {
    let cat = ctx.catalogue();
    ListingQuery {
        room_type: args.room_type.clone(),
        neighbourhood: args.neighbourhood.clone(),
        minimum_nights: args.minimum_nights,
        availability_365: args.availability_365,
        number_of_reviews: args.number_of_reviews,
        reviews_per_month: args.reviews_per_month,
        number_of_reviews_ltm: args.number_of_reviews_ltm,
        calculated_host_listings_count: args.host_listings,
        latitude: args.latitude.unwrap_or(cat.mean_latitude),
        longitude: args.longitude.unwrap_or(cat.mean_longitude),
    }
}

#[derive(Debug, Serialize)]
struct PredictionJson<'a> {
    query: &'a ListingQuery,
    class: usize,
    label: &'static str,
    confidence: f64,
    message: String,
}

impl<'a> PredictionJson<'a> {
    fn new(query: &'a ListingQuery, result: &InferenceResult) -> Self {
        Self {
            query,
            class: result.class,
            label: result.label.display_name(),
            confidence: result.confidence,
            message: result.sentence(),
        }
    }
}

/// Rewrite argv so `lp` defaults to `lp tui`.
///
/// Rules:
/// - `lp`                      -> `lp tui`
/// - `lp --model m.json ...`   -> `lp tui --model m.json ...`
/// - `lp --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict" | "catalogue" | "demo");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_binary_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["lp"])), argv(&["lp", "tui"]));
    }

    #[test]
    fn leading_flags_belong_to_the_tui() {
        assert_eq!(
            rewrite_args(argv(&["lp", "--model", "m.json"])),
            argv(&["lp", "tui", "--model", "m.json"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["lp", "predict", "--room-type", "x"][..],
            &["lp", "catalogue"],
            &["lp", "demo", "-n", "10"],
            &["lp", "--help"],
            &["lp", "-V"],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn rewritten_default_parses_with_default_paths() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&["lp"]))).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        let config = run_config_from_args(&args);
        assert!(config.model_path.ends_with("final_model_pipeline.json") || std::env::var_os("LP_MODEL").is_some());
    }
}
