use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "themis",
    version,
    about = "Evaluate question answering systems against human judgments"
)]
pub struct Cli {
    /// Log filter, e.g. `info` or `themis_core=debug`
    #[arg(long, global = true, env = "THEMIS_LOG")]
    pub log: Option<String>,

    /// text|json
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,

    #[arg(long, global = true, default_value = "themis.yaml")]
    pub config: PathBuf,

    /// Fail on unknown config keys instead of warning
    #[arg(long, global = true)]
    pub strict_config: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer a question set with one of the backends
    Qa(QaArgs),
    /// Build a question set with frequencies from a usage log
    TestSet(TestSetArgs),
    Corpus(CorpusArgs),
    Judge(JudgeArgs),
    /// Attach judgments to usage log rows
    Augment(AugmentArgs),
    /// Accuracy curve of a backend's answers
    Curves(CurvesArgs),
    /// Merged evaluation table sorted by confidence and frequency
    Collate(CollateArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct QaArgs {
    #[command(subcommand)]
    pub cmd: QaSub,
}

#[derive(Subcommand, Clone)]
pub enum QaSub {
    /// Replay answers recorded in a usage log
    Wea(WeaArgs),
    /// Top hit of a Solr full-text query
    Solr(SolrArgs),
    /// Top class of a trained NLC classifier
    Nlc(NlcArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunTarget {
    /// Question set (needs a `Question` column)
    pub questions: PathBuf,

    /// Answers file, resumed if it exists
    pub output: PathBuf,

    /// Answers buffered between writes to the output file
    #[arg(long)]
    pub checkpoint_frequency: Option<usize>,

    /// Summary format on stdout: text|json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WeaArgs {
    #[command(flatten)]
    pub target: RunTarget,

    pub usage_log: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SolrArgs {
    #[command(flatten)]
    pub target: RunTarget,

    /// Core URL, e.g. http://localhost:8983/solr/answers
    pub url: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct NlcArgs {
    #[command(flatten)]
    pub target: RunTarget,

    pub url: String,
    pub username: String,
    pub classifier: String,
    /// Corpus mapping `Answer Id` to `Answer`
    pub corpus: PathBuf,

    #[arg(long, env = "THEMIS_NLC_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TestSetArgs {
    pub usage_log: PathBuf,

    /// Sample this many questions, weighted by frequency
    #[arg(long)]
    pub n: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct CorpusArgs {
    #[command(subcommand)]
    pub cmd: CorpusSub,
}

#[derive(Subcommand, Clone)]
pub enum CorpusSub {
    /// Drop empty and oversized answers
    Filter(CorpusFilterArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct CorpusFilterArgs {
    pub corpus: PathBuf,

    /// Longest answer kept, in characters
    #[arg(long)]
    pub max_size: Option<usize>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct JudgeArgs {
    #[command(subcommand)]
    pub cmd: JudgeSub,
}

#[derive(Subcommand, Clone)]
pub enum JudgeSub {
    /// Question/answer pairs that still need a judgment
    Pairs(JudgePairsArgs),
    /// Apply the correctness threshold to judgments
    Interpret(JudgeInterpretArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgePairsArgs {
    #[arg(required = true)]
    pub answers: Vec<PathBuf>,

    /// Only pairs for questions in this set
    #[arg(long)]
    pub questions: Option<PathBuf>,

    /// Judgments already collected; their pairs are skipped
    #[arg(long)]
    pub judgments: Vec<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JudgeInterpretArgs {
    pub judgments: PathBuf,

    #[arg(long)]
    pub judgment_threshold: Option<f64>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AugmentArgs {
    pub usage_log: PathBuf,
    pub judgments: PathBuf,

    #[arg(long)]
    pub judgment_threshold: Option<f64>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EvaluationInputs {
    /// Question set with a `Frequency` column
    pub test_set: PathBuf,
    pub judgments: PathBuf,
    pub answers: PathBuf,

    #[arg(long)]
    pub judgment_threshold: Option<f64>,

    /// left keeps unjudged answers, inner drops them
    #[arg(long, default_value = "left")]
    pub join: String,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CurvesArgs {
    /// roc|precision
    pub kind: String,

    #[command(flatten)]
    pub inputs: EvaluationInputs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CollateArgs {
    #[command(flatten)]
    pub inputs: EvaluationInputs,
}
