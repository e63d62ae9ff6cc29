use std::path::Path;

use themis_core::config::{load_config, ThemisConfig};
use themis_core::table::{delimiter_for, save_records, write_records, Record};
use themis_core::ThemisError;

use super::args::{Cli, Command, CorpusSub, JudgeSub};

pub mod analyze;
pub mod data;
pub mod judge;
pub mod qa;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const FAILURE: i32 = 1;

    /// Typed core errors carry their own code (2 config, 3 corrupt
    /// checkpoint, 4 backend); anything else is a plain failure.
    pub fn for_error(e: &anyhow::Error) -> i32 {
        e.downcast_ref::<themis_core::ThemisError>()
            .map(|e| e.exit_code())
            .unwrap_or(FAILURE)
    }
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = load_config(&cli.config, cli.strict_config)?.with_env_overrides();
    crate::init_logging(cli.log.as_deref().unwrap_or(&cfg.log_level), &cli.log_format)?;
    tracing::debug!(config = %cli.config.display(), "loaded configuration");

    match cli.cmd {
        Command::Qa(args) => qa::run(args, cfg).await,
        Command::TestSet(args) => data::test_set(args, &cfg),
        Command::Corpus(args) => match args.cmd {
            CorpusSub::Filter(args) => data::corpus_filter(args),
        },
        Command::Judge(args) => match args.cmd {
            JudgeSub::Pairs(args) => judge::pairs(args),
            JudgeSub::Interpret(args) => judge::interpret(args, &cfg),
        },
        Command::Augment(args) => judge::augment(args, &cfg),
        Command::Curves(args) => analyze::curves(args, &cfg),
        Command::Collate(args) => analyze::collate(args, &cfg),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Writes `records` to `output`, or to stdout as CSV when no path is given.
pub(crate) fn write_table<T: Record>(output: Option<&Path>, records: &[T]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            save_records(path, records)?;
            tracing::info!(file = %path.display(), rows = records.len(), "wrote table");
        }
        None => write_records(std::io::stdout().lock(), b',', records)?,
    }
    Ok(())
}

pub(crate) fn output_delimiter(output: Option<&Path>) -> u8 {
    output.map(delimiter_for).unwrap_or(b',')
}

pub(crate) fn threshold(flag: Option<f64>, cfg: &ThemisConfig) -> f64 {
    flag.unwrap_or(cfg.judgment_threshold)
}

pub(crate) fn invalid_arg(msg: String) -> anyhow::Error {
    ThemisError::Config(msg).into()
}
