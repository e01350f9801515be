// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// clap parses the command line; every command hands off to a
// Layer 2 use case and only prints what comes back.
//
//   train    — fit and save the model
//   predict  — one prediction from flags
//   evaluate — re-measure the saved model
//   app      — interactive three-page predictor

pub mod commands;

/// Text rendering of the app's pages
pub mod pages;

/// Interactive terminal loop
pub mod app;

use std::io;

use anyhow::Result;
use clap::Parser;
use commands::{AppArgs, Commands, EvaluateArgs, PredictArgs, TrainArgs};

use crate::application::predict_use_case::PredictUseCase;
use crate::domain::record::FeatureRecord;

#[derive(Parser, Debug)]
#[command(
    name = "sleep-predictor",
    version,
    about = "Train a sleep-duration regressor on survey data, then predict from health answers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::App(args)      => run_app(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.data);
    let summary = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete. Model saved to '{}'.", summary.artifact_path.display());
    println!("  best parameters : {}", summary.best_params);
    println!("  cv score (-MAE) : {:.4}", summary.best_score);
    println!("  rows            : {} train / {} test", summary.train_rows, summary.test_rows);
    match summary.evaluation {
        Some(eval) => println!("  test MAE / MSE  : {:.3} / {:.3}", eval.mae, eval.mse),
        None => println!("  test MAE / MSE  : n/a (empty test split)"),
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let record = FeatureRecord::from_answers(
        args.age,
        &args.sex,
        &args.physical_condition,
        &args.screen_time,
        &args.exercise,
        &args.smokes_or_drinks,
    )?;
    if record.screen_time().is_none() {
        tracing::warn!("Screen time '{}' not recognised; it will be imputed", args.screen_time);
    }

    let use_case   = PredictUseCase::new(&args.artifact_dir)?;
    let prediction = use_case.predict(&record)?;
    print!("{}", pages::render_prediction(&prediction, use_case.metrics()));
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(&args.artifact_dir)?.execute(&args.data, args.sheet)?;
    println!(
        "MAE {:.3}  MSE {:.3}  ({} rows)",
        report.measured.mae, report.measured.mse, report.measured.rows
    );
    match report.stored {
        Some(stored) => println!(
            "stored with model: MAE {:.3}  MSE {:.3}  ({} test rows)",
            stored.mae, stored.mse, stored.rows
        ),
        None => println!("no metrics stored with the model"),
    }
    Ok(())
}

fn run_app(args: AppArgs) -> Result<()> {
    let use_case = PredictUseCase::new(&args.artifact_dir)?;
    let stdin    = io::stdin();
    app::InteractiveApp::new(&use_case, stdin.lock(), io::stdout()).run()
}
