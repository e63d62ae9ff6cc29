use themis_core::config::ThemisConfig;
use themis_core::context::RunContext;
use themis_core::corpus::load_corpus;
use themis_core::engine::Runner;
use themis_core::model::Question;
use themis_core::providers::{AnswerSource, Backend, NlcClient, SolrClient, UsageLogLookup};
use themis_core::report::print_run_summary;
use themis_core::table::{load_records, TableSpec};

use super::exit_codes;
use crate::cli::args::{QaArgs, QaSub, RunTarget};

pub async fn run(args: QaArgs, cfg: ThemisConfig) -> anyhow::Result<i32> {
    let (command, target, backend) = match args.cmd {
        QaSub::Wea(a) => {
            let log = UsageLogLookup::from_path(&a.usage_log)?;
            tracing::info!(
                file = %a.usage_log.display(),
                questions = log.distinct_questions(),
                outcomes = ?log.outcome_counts(),
                "loaded usage log"
            );
            ("qa wea", a.target, Backend::UsageLog(log))
        }
        QaSub::Solr(a) => {
            let client = SolrClient::new(&a.url, cfg.solr.clone(), cfg.request_timeout())?;
            ("qa solr", a.target, Backend::Solr(client))
        }
        QaSub::Nlc(a) => {
            let corpus = load_corpus(&a.corpus)?;
            let client = NlcClient::new(
                &a.url,
                &a.username,
                &a.password,
                &a.classifier,
                corpus,
                cfg.request_timeout(),
            )?;
            ("qa nlc", a.target, Backend::Nlc(client))
        }
    };
    answer(command, target, &backend, cfg).await
}

async fn answer(
    command: &str,
    target: RunTarget,
    backend: &Backend,
    mut cfg: ThemisConfig,
) -> anyhow::Result<i32> {
    if let Some(n) = target.checkpoint_frequency {
        cfg.checkpoint_frequency = n;
    }
    let questions: Vec<Question> = load_records(&target.questions, &TableSpec::all())?;
    tracing::info!(file = %target.questions.display(), questions = questions.len(), "loaded question set");

    let ctx = RunContext::new(command, cfg);
    let summary = Runner::new(&ctx, backend)
        .run(&questions, &target.output)
        .await?;

    if target.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_run_summary(backend.backend_name(), &summary);
    }
    Ok(exit_codes::OK)
}
