//! Train the fare model on a CSV extract and report held-out RMSE.
//!
//! Run with: cargo run --release -- --data train.csv --nrows 10000

use clap::Parser;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use taxifare::dataset::{load_rides, rides_to_frame, train_test_split};
use taxifare::{FeatureConfig, TrainConfig, Trainer};

#[derive(Parser, Debug)]
#[command(name = "taxifare", version, about = "Train and evaluate a taxi fare regression")]
struct Cli {
    /// Headed CSV of rides.
    #[arg(long)]
    data: PathBuf,

    /// Read at most this many rows (0 reads the whole file).
    #[arg(long, default_value_t = 10_000)]
    nrows: usize,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Seed for the train/test shuffle.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Zone pickup timestamps are converted into.
    #[arg(long, default_value = "America/New_York")]
    time_zone: String,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

/// Outcome of one training run.
#[derive(Debug, Serialize)]
struct EvaluationReport {
    rmse: f64,
    n_train: usize,
    n_test: usize,
    n_features: usize,
}

impl Cli {
    fn into_config(self) -> (TrainConfig, bool) {
        let nrows = (self.nrows > 0).then_some(self.nrows);
        let config = TrainConfig::new(self.data)
            .with_nrows(nrows)
            .with_test_size(self.test_size)
            .with_seed(self.seed)
            .with_features(FeatureConfig::new().with_time_zone(self.time_zone));
        (config, self.json)
    }
}

fn run(config: &TrainConfig) -> Result<EvaluationReport, Box<dyn Error>> {
    let rides = config.cleaning.clean(load_rides(&config.data, config.nrows)?);
    let (x, y) = rides_to_frame(&rides)?.split_target(&config.features.target)?;
    let split = train_test_split(&x, &y, config.test_size, config.seed)?;

    let n_train = split.y_train.len();
    let n_test = split.y_test.len();

    let mut trainer =
        Trainer::new(split.x_train, split.y_train)?.with_features(config.features.clone());
    let n_features = trainer.run()?.n_features();
    let rmse = trainer.evaluate(&split.x_test, &split.y_test)?;

    Ok(EvaluationReport {
        rmse,
        n_train,
        n_test,
        n_features,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (config, json) = Cli::parse().into_config();
    info!("starting run with {:?}", config);

    let report = run(&config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "rmse: {:.4} (train {} rows, test {} rows, {} features)",
            report.rmse, report.n_train, report.n_test, report.n_features
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["taxifare", "--data", "train.csv"]);
        let (config, json) = cli.into_config();
        assert_eq!(config.nrows, Some(10_000));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.features.time_zone, "America/New_York");
        assert!(!json);
    }

    #[test]
    fn test_cli_all_rows() {
        let cli = Cli::parse_from(["taxifare", "--data", "x.csv", "--nrows", "0", "--json"]);
        let (config, json) = cli.into_config();
        assert_eq!(config.nrows, None);
        assert!(json);
    }

    #[test]
    fn test_report_json() {
        let report = EvaluationReport {
            rmse: 5.25,
            n_train: 8,
            n_test: 2,
            n_features: 12,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rmse"], 5.25);
        assert_eq!(json["n_features"], 12);
    }
}
