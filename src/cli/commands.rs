// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands: `train`, `predict`, `evaluate` and `app`.

use std::fs;

use clap::{builder::RangedU64ValueParser, Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::ml::search::{ParamGrid, SearchSettings};
use crate::ml::trainer::FitSettings;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sleep-duration model on a survey spreadsheet
    Train(TrainArgs),

    /// Predict sleep duration for one person
    Predict(PredictArgs),

    /// Re-measure the saved model on a labelled spreadsheet
    Evaluate(EvaluateArgs),

    /// Run the interactive three-page predictor
    App(AppArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Survey export (.xlsx, .xls or .ods)
    #[arg(long)]
    pub data: String,

    /// Worksheet to read (default: the first one)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Where model.json, train_config.json and search_log.csv go
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Hyperparameter grid as a JSON file path or inline JSON object
    #[arg(long, value_parser = parse_grid)]
    pub grid: Option<ParamGrid>,

    /// Share of rows held out for the reported MAE / MSE
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Cross-validation folds per search round
    #[arg(long, default_value_t = 5, value_parser = at_least(2))]
    pub cv_folds: usize,

    /// Halving factor: candidates kept per round = ceil(n / factor)
    #[arg(long, default_value_t = 2, value_parser = at_least(2))]
    pub factor: usize,

    /// Seed for the splits, subsamples and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Minibatch size (capped at the number of training rows)
    #[arg(long, default_value_t = 200, value_parser = at_least(1))]
    pub batch_size: usize,

    /// Share of each fit's rows used for early stopping
    #[arg(long, default_value_t = 0.2)]
    pub validation_fraction: f64,

    /// Epochs without improvement before stopping
    #[arg(long, default_value_t = 10, value_parser = at_least(1))]
    pub n_iter_no_change: usize,

    /// Minimum validation-loss improvement that counts
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,
}

/// Counts parsed as `usize`, rejecting anything below `min`.
fn at_least(min: u64) -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(min..)
}

/// Accepts either inline JSON or a path to a JSON file.
fn parse_grid(raw: &str) -> Result<ParamGrid, String> {
    let text = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        fs::read_to_string(raw).map_err(|e| format!("cannot read grid file '{raw}': {e}"))?
    };
    let grid: ParamGrid = serde_json::from_str(&text).map_err(|e| format!("invalid grid JSON: {e}"))?;
    grid.candidates().map_err(|e| e.to_string())?;
    Ok(grid)
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:     a.data,
            sheet:         a.sheet,
            artifact_dir:  a.artifact_dir,
            test_fraction: a.test_fraction,
            grid:          a.grid.unwrap_or_default(),
            search: SearchSettings {
                cv_folds: a.cv_folds,
                factor:   a.factor,
                seed:     a.seed,
            },
            fit: FitSettings {
                batch_size:          a.batch_size,
                validation_fraction: a.validation_fraction,
                n_iter_no_change:    a.n_iter_no_change,
                tol:                 a.tol,
                seed:                a.seed,
            },
        }
    }
}

/// All arguments for the `predict` command.
///
/// Answers are accepted in the form's wording or in English,
/// case-insensitively.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Age in years
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub age: u32,

    /// Laki-laki | Perempuan (male | female)
    #[arg(long)]
    pub sex: String,

    /// Ya | Tidak (yes | no)
    #[arg(long)]
    pub physical_condition: String,

    /// Screen-time bucket, e.g. "< 2 jam", "2-4 jam", "> 4 jam"
    #[arg(long)]
    pub screen_time: String,

    /// Jarang | Kadang | Sering (rarely | sometimes | often)
    #[arg(long)]
    pub exercise: String,

    /// Ya | Tidak (yes | no)
    #[arg(long)]
    pub smokes_or_drinks: String,

    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Labelled survey export
    #[arg(long)]
    pub data: String,

    #[arg(long)]
    pub sheet: Option<String>,

    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}

#[derive(Args, Debug)]
pub struct AppArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_flow_into_config() {
        let cli = Cli::try_parse_from(["sleep-predictor", "train", "--data", "survey.xlsx"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(
            cfg,
            TrainConfig { data_path: "survey.xlsx".to_string(), ..TrainConfig::default() }
        );
    }

    #[test]
    fn test_inline_grid_is_parsed() {
        let json = r#"{"hidden_layer_sizes":[[4]],"activation":["tanh"],"alpha":[0.001],
                       "learning_rate_init":[0.01],"solver":["sgd"],"max_epochs":[5]}"#;
        let grid = parse_grid(json).unwrap();
        assert_eq!(grid.candidates().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_grid_axis_is_rejected_at_parse_time() {
        let json = r#"{"hidden_layer_sizes":[],"activation":["tanh"],"alpha":[0.001],
                       "learning_rate_init":[0.01],"solver":["sgd"],"max_epochs":[5]}"#;
        assert!(parse_grid(json).is_err());
    }

    #[test]
    fn test_zero_counts_are_rejected() {
        for flag in ["--batch-size", "--n-iter-no-change", "--cv-folds", "--factor"] {
            let args = ["sleep-predictor", "train", "--data", "survey.xlsx", flag, "0"];
            assert!(Cli::try_parse_from(args).is_err(), "{flag} 0 was accepted");
        }
    }

    #[test]
    fn test_single_fold_and_factor_one_are_rejected() {
        for flag in ["--cv-folds", "--factor"] {
            let args = ["sleep-predictor", "train", "--data", "survey.xlsx", flag, "1"];
            assert!(Cli::try_parse_from(args).is_err(), "{flag} 1 was accepted");
        }
    }

    #[test]
    fn test_explicit_counts_flow_into_config() {
        let args = [
            "sleep-predictor", "train", "--data", "survey.xlsx",
            "--batch-size", "1", "--n-iter-no-change", "3", "--cv-folds", "4", "--factor", "3",
        ];
        let Commands::Train(args) = Cli::try_parse_from(args).unwrap().command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!((cfg.fit.batch_size, cfg.fit.n_iter_no_change), (1, 3));
        assert_eq!((cfg.search.cv_folds, cfg.search.factor), (4, 3));
    }

    #[test]
    fn test_predict_rejects_zero_age() {
        let args = [
            "sleep-predictor", "predict", "--age", "0", "--sex", "male",
            "--physical-condition", "no", "--screen-time", "2-4 jam",
            "--exercise", "sometimes", "--smokes-or-drinks", "no",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
