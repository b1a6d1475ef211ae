use chrono::NaiveDate;
use smash_rank::policy::OperationSpec;
use smash_rank::query::DataSource;
use smash_rank::ranking::{MetricWeight, RankingProfile};
use smash_rank::RankingReport;

/// Display field preferred over the raw id when present.
const NAME_FIELD: &str = "gamer_tag";

pub(crate) fn render_report(report: &RankingReport, as_of: NaiveDate) {
    let query = &report.query;
    let outcome = &report.outcome;

    println!("{}", outcome.method.intent_label);
    match &query.source {
        DataSource::Statewide { state: Some(state) } => println!("Source: statewide ({state})"),
        DataSource::Statewide { state: None } => println!("Source: statewide"),
        DataSource::Tournament { slug } => println!("Source: tournament {slug}"),
    }
    match query.window.start_date(as_of) {
        Some(start) => println!(
            "Window: last {} months ({start} to {as_of})",
            query.window.months_back
        ),
        None => println!("Window: last {} months", query.window.months_back),
    }
    println!(
        "Players: {} fetched | {} considered | {} eligible | {} shown",
        outcome.count_original,
        outcome.count_considered,
        outcome.count_eligible,
        outcome.entries.len()
    );
    println!("Method: {}", report.method_summary);

    if outcome.entries.is_empty() {
        println!("\nNo players matched.");
        return;
    }

    println!();
    for entry in &outcome.entries {
        let name = entry
            .display_fields
            .get(NAME_FIELD)
            .map(String::as_str)
            .unwrap_or(&entry.id);
        println!("{:>3}. {} (score {:.3})", entry.rank, name, entry.score);
        for line in &entry.why {
            println!("       - {line}");
        }
    }
}

pub(crate) fn weight_summary(weights: &[MetricWeight]) -> String {
    weights
        .iter()
        .map(|weight| format!("{} {:.2} {}", weight.metric, weight.weight, weight.direction))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_intents(profiles: &[RankingProfile]) {
    for profile in profiles {
        println!("{} ({})", profile.intent, profile.label);
        println!("  {}", profile.description);
        println!("  weights: {}", weight_summary(&profile.weights));
    }
}

pub(crate) fn render_operations(operations: &[OperationSpec]) {
    for spec in operations {
        match spec.fallback {
            Some(fallback) => println!(
                "{:<28} {:<5} {} (fallback: {fallback})",
                spec.name,
                spec.intensity.label(),
                spec.description
            ),
            None => println!(
                "{:<28} {:<5} {}",
                spec.name,
                spec.intensity.label(),
                spec.description
            ),
        }
    }
}
