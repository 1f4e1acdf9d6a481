// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `run` and `evaluate`, and their
// flags. Every flag defaults to the experiment's fixed constant,
// so `run` with no flags is the reference experiment.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune on English SST-2, then evaluate zero-shot on Hindi
    Run(RunArgs),

    /// Score a saved model on a positive / negative file pair
    Evaluate(EvaluateArgs),
}

/// All arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Pretrained model on the Hugging Face hub
    #[arg(long, default_value = TrainConfig::MODEL_ID)]
    pub model_id: String,

    /// Tokens per sequence, including <s> and </s>
    #[arg(long, default_value_t = TrainConfig::MAX_LENGTH)]
    pub max_length: usize,

    #[arg(long, default_value_t = TrainConfig::BATCH_SIZE)]
    pub batch_size: usize,

    /// Peak learning rate; decays linearly to zero
    #[arg(long, default_value_t = TrainConfig::LEARNING_RATE)]
    pub lr: f64,

    #[arg(long, default_value_t = TrainConfig::EPOCHS)]
    pub epochs: usize,

    /// Seed for the training shuffle and the Hindi permutation
    #[arg(long, default_value_t = TrainConfig::SEED)]
    pub seed: u64,

    /// Rows dropped from the end of the SST-2 train split
    #[arg(long, default_value_t = TrainConfig::TRAIN_HOLDOUT)]
    pub train_holdout: usize,

    /// Data loader worker threads for training (0 = inline)
    #[arg(long, default_value_t = TrainConfig::NUM_WORKERS)]
    pub num_workers: usize,

    /// Where downloads are cached
    #[arg(long, default_value = TrainConfig::CACHE_DIR)]
    pub cache_dir: String,

    #[arg(long, default_value = TrainConfig::MODEL_DIR)]
    pub model_dir: String,

    #[arg(long, default_value = TrainConfig::TOKENIZER_DIR)]
    pub tokenizer_dir: String,

    /// Hindi positive examples, one per line
    #[arg(long, default_value = TrainConfig::POS_FILE)]
    pub pos_file: String,

    /// Hindi negative examples, one per line
    #[arg(long, default_value = TrainConfig::NEG_FILE)]
    pub neg_file: String,
}

/// Convert CLI RunArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<RunArgs> for TrainConfig {
    fn from(a: RunArgs) -> Self {
        TrainConfig {
            model_id:      a.model_id,
            max_length:    a.max_length,
            batch_size:    a.batch_size,
            learning_rate: a.lr,
            epochs:        a.epochs,
            seed:          a.seed,
            train_holdout: a.train_holdout,
            num_workers:   a.num_workers,
            cache_dir:     a.cache_dir,
            model_dir:     a.model_dir,
            tokenizer_dir: a.tokenizer_dir,
            pos_file:      a.pos_file,
            neg_file:      a.neg_file,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, default_value = TrainConfig::MODEL_DIR)]
    pub model_dir: String,

    #[arg(long, default_value = TrainConfig::TOKENIZER_DIR)]
    pub tokenizer_dir: String,

    #[arg(long, default_value = TrainConfig::POS_FILE)]
    pub pos_file: String,

    #[arg(long, default_value = TrainConfig::NEG_FILE)]
    pub neg_file: String,

    #[arg(long, default_value_t = TrainConfig::SEED)]
    pub seed: u64,

    #[arg(long, default_value_t = TrainConfig::BATCH_SIZE)]
    pub batch_size: usize,
}
