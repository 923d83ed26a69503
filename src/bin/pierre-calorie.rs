// ABOUTME: Pierre calorie CLI - daily calorie and macro recommendations from the command line
// ABOUTME: Recommends, prints the backup formula, retrains, and resets the persisted model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Recommend for an explicit profile
//! pierre-calorie recommend --age 30 --height 180 --weight 90 --sex male --activity moderate --goal 80
//!
//! # Recommend for a profile stored as JSON
//! pierre-calorie recommend --profile profile.json
//!
//! # Recommend for a user known to the profile service
//! pierre-calorie recommend --user 42
//!
//! # Deterministic formula only, no model
//! pierre-calorie backup --age 30 --height 180 --weight 90 --sex male --activity moderate --goal 80
//!
//! # Force a retrain, optionally on synthetic data only
//! pierre-calorie train --synthetic
//!
//! # Delete the persisted model
//! pierre-calorie reset
//! ```

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use pierre_calorie_engine::config::EngineConfig;
use pierre_calorie_engine::logging::LoggingConfig;
use pierre_calorie_engine::{RecommendationEngine, TrainingMode};
use pierre_core::models::{ProfileRecord, UserProfile};
use pierre_intelligence::backup_recommendation;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pierre-calorie",
    about = "Pierre calorie and macro recommendations",
    long_about = "Daily calorie and macro recommendations from a trained regression model, with a deterministic backup formula."
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
    /// Recommend daily calories and macros
    Recommend {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Fetch the profile of this user from the profile service
        #[arg(long, conflicts_with = "profile")]
        user: Option<String>,
    },

    /// Print the backup formula result without touching the model
    Backup {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Retrain the model and persist it
    Train {
        /// Train on synthetic examples even if real data is available
        #[arg(long)]
        synthetic: bool,
    },

    /// Delete the persisted model
    Reset,
}

#[derive(Args)]
struct ProfileArgs {
    /// JSON file with a profile (camelCase fields)
    #[arg(long, conflicts_with_all = ["age", "height", "weight", "sex", "activity", "goal"])]
    profile: Option<PathBuf>,

    /// Age in years
    #[arg(long)]
    age: Option<f64>,

    /// Height in centimeters
    #[arg(long)]
    height: Option<f64>,

    /// Weight in kilograms
    #[arg(long)]
    weight: Option<f64>,

    /// Sex (male or female)
    #[arg(long)]
    sex: Option<String>,

    /// Activity level (sedentary, light, moderate, active, very_active)
    #[arg(long)]
    activity: Option<String>,

    /// Goal weight in kilograms
    #[arg(long)]
    goal: Option<f64>,
}

impl ProfileArgs {
    async fn into_record(self) -> Result<ProfileRecord> {
        if let Some(path) = self.profile {
            let raw = fs::read_to_string(&path).await?;
            return Ok(serde_json::from_str(&raw)?);
        }
        Ok(ProfileRecord {
            age: self.age,
            height: self.height,
            weight: self.weight,
            sex: self.sex,
            activity_level: self.activity,
            weight_goal: self.goal,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.verbose()
    } else {
        logging
    };
    logging.init()?;

    let config = EngineConfig::from_env()?;

    match cli.command {
        Command::Recommend { profile, user } => {
            let engine = RecommendationEngine::from_config(config)?;
            let recommendation = match user {
                Some(user_id) => engine.recommend_for_user(&user_id).await?,
                None => engine.recommend(&profile.into_record().await?).await?,
            };
            print_json(&recommendation)?;
        }
        Command::Backup { profile } => {
            let profile = UserProfile::try_from(&profile.into_record().await?)?;
            print_json(&backup_recommendation(&profile, &config.nutrition))?;
        }
        Command::Train { synthetic } => {
            let engine = RecommendationEngine::from_config(config)?;
            let mode = if synthetic {
                TrainingMode::SyntheticOnly
            } else {
                TrainingMode::PreferRealData
            };
            let report = engine.train(mode).await?;
            if !report.persisted {
                bail!("model trained but could not be saved");
            }
            print_json(&report)?;
        }
        Command::Reset => {
            let engine = RecommendationEngine::from_config(config)?;
            engine.reset().await?;
            info!("persisted model removed");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
