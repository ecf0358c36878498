use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use kobo_compare::DiscrepancyCollector;
use kobo_ingest::{load_country_forms, load_form};
use kobo_cli::config::{Overrides, render_options, resolve_options};
use kobo_report::{ReportOptions, write_reports};

use crate::cli::{CompareArgs, ConfigArgs};
use crate::types::{CompareResult, FailedCountry};

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let options = resolve_options(args.config.as_deref(), Overrides::default())?;
    print!("{}", render_options(&options)?);
    Ok(())
}

pub fn run_compare(args: &CompareArgs) -> Result<CompareResult> {
    let span = info_span!("compare", kobo_dir = %args.kobo_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = resolve_options(
        args.config.as_deref(),
        Overrides {
            threshold: args.threshold,
            include_matched: args.include_matched_override(),
        },
    )?;
    let threshold = options.threshold;

    let standard = load_form(&args.standard_dir)
        .with_context(|| format!("load standard form {}", args.standard_dir.display()))?;
    info!(
        survey_rows = standard.survey.len(),
        choices_rows = standard.choices.len(),
        "standard form loaded"
    );

    let load = load_country_forms(&args.kobo_dir)
        .with_context(|| format!("load country forms {}", args.kobo_dir.display()))?;
    if load.is_empty() {
        warn!(dir = %args.kobo_dir.display(), "no country forms to compare");
    }
    let failures: Vec<FailedCountry> = load
        .failures
        .iter()
        .map(|failure| FailedCountry {
            country: failure.country.clone(),
            path: failure.path.clone(),
            reason: failure.error.to_string(),
        })
        .collect();

    let collector = DiscrepancyCollector::new(options).context("build comparison")?;
    let progress = country_progress(load.forms.len() as u64);
    let collection = collector.collect_with(&standard, &load.forms, |country, _| {
        progress.set_message(country.to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    let reports = if args.dry_run {
        info!("dry run: reports not written");
        Vec::new()
    } else {
        write_reports(
            &args.output_dir,
            &collection,
            ReportOptions {
                threshold,
                json: args.json,
            },
        )
        .with_context(|| format!("write reports to {}", args.output_dir.display()))?
    };

    Ok(CompareResult {
        output_dir: args.output_dir.clone(),
        threshold,
        countries_compared: load.forms.len(),
        summaries: collection.summaries(),
        failures,
        reports,
        dry_run: args.dry_run,
        elapsed: start.elapsed(),
    })
}

/// Progress over countries; hidden unless stderr is a terminal.
fn country_progress(len: u64) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
