use crate::cli::{AuthorizeArgs, OutputFormat, RankArgs};
use crate::render;
use chrono::Local;
use serde::Serialize;
use smash_rank::config::AppConfig;
use smash_rank::error::AppError;
use smash_rank::policy::OPERATIONS;
use smash_rank::records::{InMemoryEntitySource, RecordImporter};
use smash_rank::{RankRequest, RankingService};
use std::sync::Arc;
use tracing::info;

pub(crate) fn run_rank(config: &AppConfig, args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        intent,
        records,
        top_n,
        min_sample_size,
        state,
        months_back,
        tournament_slug,
        request,
        as_of,
        output,
    } = args;

    let entities = RecordImporter::from_path(&records)?;
    let source = Arc::new(InMemoryEntitySource::new(entities));
    let service = RankingService::from_config(&config.ranking, source)?;

    let request = RankRequest {
        intent,
        top_n,
        min_sample_size,
        months_back,
        state,
        tournament_slug,
        user_request: request,
    };
    let report = service.rank(&request)?;
    info!(
        intent = %report.query.intent,
        records = %records.display(),
        returned = report.outcome.entries.len(),
        "rank command finished"
    );

    match output.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            render::render_report(&report, as_of);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct IntentView<'a> {
    intent: &'a str,
    label: &'a str,
    description: &'a str,
    summary: String,
}

pub(crate) fn run_intents(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let service = RankingService::from_config(
        &config.ranking,
        Arc::new(InMemoryEntitySource::default()),
    )?;
    let registry = service.registry();

    match format {
        OutputFormat::Json => {
            let views: Vec<IntentView<'_>> = registry
                .profiles()
                .iter()
                .map(|profile| IntentView {
                    intent: profile.intent.as_str(),
                    label: &profile.label,
                    description: &profile.description,
                    summary: render::weight_summary(&profile.weights),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Text => render::render_intents(registry.profiles()),
    }
    Ok(())
}

pub(crate) fn run_authorize(config: &AppConfig, args: AuthorizeArgs) -> Result<(), AppError> {
    let service = RankingService::from_config(
        &config.ranking,
        Arc::new(InMemoryEntitySource::default()),
    )?;
    let decision = service.authorize(&args.operation, args.request.as_deref());

    match args.output.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decision)?),
        OutputFormat::Text => println!("{}", decision.summary()),
    }
    Ok(())
}

pub(crate) fn run_operations(format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(OPERATIONS)?),
        OutputFormat::Text => render::render_operations(OPERATIONS),
    }
    Ok(())
}
