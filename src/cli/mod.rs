//! Command-line parsing for the Sevilla listing price classifier.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! form and inference code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_AVAILABILITY_365, DEFAULT_HOST_LISTINGS_COUNT, DEFAULT_MINIMUM_NIGHTS,
    DEFAULT_NUMBER_OF_REVIEWS, DEFAULT_NUMBER_OF_REVIEWS_LTM, DEFAULT_REVIEWS_PER_MONTH,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lp",
    version,
    about = "Classify Sevilla Airbnb listings as High Price or Low Price"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui(SourceArgs),
    /// Score a single listing given on the command line.
    Predict(PredictArgs),
    /// Print the neighbourhoods, room types and defaults derived from the dataset.
    Catalogue(SourceArgs),
    /// Write a synthetic reference dataset and an illustrative model artifact.
    Demo(DemoArgs),
}

/// Where the model artifact and reference dataset live.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Pipeline artifact (JSON).
    #[arg(long, env = "LP_MODEL", default_value = "final_model_pipeline.json")]
    pub model: PathBuf,

    /// Reference listings dataset (CSV).
    #[arg(long, env = "LP_DATASET", default_value = "sevilla.listings.csv")]
    pub dataset: PathBuf,

    /// Append log output to this file (the TUI otherwise logs nothing).
    #[arg(long, env = "LP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Listing attributes for `lp predict`.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Room type (must be one the model knows, e.g. "Entire home/apt").
    #[arg(long)]
    pub room_type: String,

    /// Neighbourhood (e.g. "Casco Antiguo").
    #[arg(long)]
    pub neighbourhood: String,

    /// Minimum nights per stay.
    #[arg(long, default_value_t = DEFAULT_MINIMUM_NIGHTS, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub minimum_nights: u32,

    /// Days per year the listing is available.
    #[arg(long, default_value_t = DEFAULT_AVAILABILITY_365, value_parser = clap::value_parser!(u32).range(0..=365))]
    pub availability_365: u32,

    /// Total number of reviews.
    #[arg(long, default_value_t = DEFAULT_NUMBER_OF_REVIEWS)]
    pub number_of_reviews: u32,

    /// Reviews received per month.
    #[arg(long, default_value_t = DEFAULT_REVIEWS_PER_MONTH)]
    pub reviews_per_month: f64,

    /// Reviews received over the last twelve months.
    #[arg(long, default_value_t = DEFAULT_NUMBER_OF_REVIEWS_LTM)]
    pub number_of_reviews_ltm: u32,

    /// Listings the host has in total.
    #[arg(long, default_value_t = DEFAULT_HOST_LISTINGS_COUNT, value_parser = clap::value_parser!(u32).range(1..))]
    pub host_listings: u32,

    /// Latitude (defaults to the dataset mean).
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude (defaults to the dataset mean).
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Options for `lp demo`.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Directory to write `sevilla.listings.csv` and `final_model_pipeline.json` into.
    #[arg(long, default_value = "demos")]
    pub out_dir: PathBuf,

    /// Number of synthetic listings.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub count: usize,

    /// Random seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Overwrite existing files.
    #[arg(long)]
    pub force: bool,
}
