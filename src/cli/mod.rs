// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Commands:
//   (none)     — the reference experiment with default settings
//   `run`      — the same experiment with overridable settings
//   `evaluate` — re-score a saved model on a file pair
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs};

use crate::application::train_use_case::TrainConfig;

#[derive(Parser, Debug)]
#[command(
    name = "xlmr-sentiment-transfer",
    version = "0.1.0",
    about = "Fine-tune XLM-RoBERTa on English SST-2 and measure zero-shot accuracy on Hindi."
)]
pub struct Cli {
    /// Subcommand; runs the default experiment when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Route to the matching use case. Never computes anything itself.
    pub fn run(self) -> Result<()> {
        match self.command {
            None                           => run_experiment(TrainConfig::default()),
            Some(Commands::Run(args))      => run_experiment(args.into()),
            Some(Commands::Evaluate(args)) => run_evaluate(args),
        }
    }
}

fn run_experiment(config: TrainConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting run with model '{}'", config.model_id);
    let summary = TrainUseCase::new(config).execute()?;

    if let Some(best) = summary
        .history
        .iter()
        .max_by(|a, b| a.val_accuracy.total_cmp(&b.val_accuracy))
    {
        tracing::info!("Best validation accuracy {:.4} at epoch {}", best.val_accuracy, best.epoch);
    }
    let hindi = &summary.hindi;
    tracing::info!("Hindi zero-shot accuracy {:.4} ({}/{})", hindi.accuracy(), hindi.correct(), hindi.total());
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let use_case = EvaluateUseCase::new(&args.model_dir, &args.tokenizer_dir)?;
    let matrix   = use_case.score(&args.pos_file, &args.neg_file, args.seed, args.batch_size)?;

    println!("Accuracy: {:.4} ({}/{})", matrix.accuracy(), matrix.correct(), matrix.total());
    println!("  tp={} tn={} fp={} fn={}", matrix.tp, matrix.tn, matrix.fp, matrix.fn_);
    Ok(())
}
