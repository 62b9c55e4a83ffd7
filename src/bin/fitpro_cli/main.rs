// ABOUTME: FitPro CLI - nutrition targets, food database lookups, and diary summaries
// ABOUTME: Thin command-line front end over the fitpro library and domain crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Daily targets for a profile
//! fitpro-cli metrics --weight 72.5 --height 180 --birthday 1990-04-12 \
//!     --gender male --activity moderately_active --goal weight_loss --json
//!
//! # Search the food database
//! fitpro-cli search "greek yogurt"
//!
//! # Look up a packaged food
//! fitpro-cli barcode 3017620422003
//!
//! # Summarize a day of exported diary entries
//! fitpro-cli summary --entries diary.json --date 2025-03-14 --calories 2200
//! ```

mod commands;
mod helpers;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fitpro::config::AppConfig;
use fitpro::errors::{AppError, AppResult};
use fitpro::logging::LoggingConfig;
use fitpro_core::models::{ActivityLevel, Gender, Goal};
use std::path::PathBuf;
use tracing::{debug, info};

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "fitpro-cli",
    about = "FitPro nutrition tools",
    long_about = "Calculate daily nutrition targets, query the food database, and summarize exported diary days."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Calculate BMR, TDEE, and daily calorie and macro targets
    Metrics {
        /// Body weight in kg
        #[arg(long)]
        weight: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Date of birth (YYYY-MM-DD); takes precedence over --age
        #[arg(long)]
        birthday: Option<NaiveDate>,

        /// Age in whole years
        #[arg(long)]
        age: Option<u32>,

        /// male, female, or undisclosed
        #[arg(long)]
        gender: Gender,

        /// sedentary, lightly_active, moderately_active, very_active, extremely_active
        #[arg(long)]
        activity: ActivityLevel,

        /// weight_loss, weight_maintaining, or weight_gaining
        #[arg(long, default_value = "weight_maintaining")]
        goal: Goal,

        /// Print the targets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the food database by name
    Search {
        /// Search text
        query: String,
    },

    /// Look up a food by barcode
    Barcode {
        /// EAN or UPC code
        code: String,
    },

    /// Summarize diary entries exported as JSON
    Summary {
        /// File holding a JSON array of food entries, each with an optional `day` key
        #[arg(long)]
        entries: PathBuf,

        /// Only count entries of this diary day (UTC date of `logged_at` when an entry has no `day`)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Calorie target (kcal)
        #[arg(long)]
        calories: Option<f64>,

        /// Protein target (g)
        #[arg(long)]
        protein: Option<f64>,

        /// Carbohydrate target (g)
        #[arg(long)]
        carbs: Option<f64>,

        /// Fat target (g)
        #[arg(long)]
        fat: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose)
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    let config = AppConfig::from_env()?;
    debug!("{}", config.summary());
    info!("FitPro CLI");

    match cli.command {
        Command::Metrics {
            weight,
            height,
            birthday,
            age,
            gender,
            activity,
            goal,
            json,
        } => {
            commands::nutrition::metrics(commands::nutrition::MetricsArgs {
                weight_kg: weight,
                height_cm: height,
                birthday,
                age,
                gender,
                activity_level: activity,
                goal,
                json,
            })?;
        }
        Command::Search { query } => {
            commands::food::search(&config, &query).await?;
        }
        Command::Barcode { code } => {
            commands::food::barcode(&config, &code).await?;
        }
        Command::Summary {
            entries,
            date,
            calories,
            protein,
            carbs,
            fat,
        } => {
            commands::nutrition::summary(
                &entries,
                date,
                commands::nutrition::TargetArgs {
                    calories,
                    protein_g: protein,
                    carbs_g: carbs,
                    fat_g: fat,
                },
            )
            .await?;
        }
    }

    Ok(())
}
