use anyhow::Result;
use log::info;
use std::time::Instant;

use super::{run_authors, run_journals, run_lag, run_plot_lag, run_timeline};
use crate::analysis::{AffiliationLevel, Metric};
use crate::cli::{
    AuthorsArgs, JournalsArgs, LagArgs, LagBoundArgs, PlotLagArgs, ReproduceArgs, SelectionArgs, TimelineArgs,
    DEFAULT_JOURNALS,
};
use crate::common::{format_elapsed, setup_logging};

/// (level, minimum article credit) of the target-author sweeps
const AUTHOR_PRESETS: [(AffiliationLevel, u32); 2] =
    [(AffiliationLevel::Institution, 5), (AffiliationLevel::Country, 10)];

/// (level, minimum article credit) of the publication-lag sweeps
const LAG_PRESETS: [(AffiliationLevel, u32); 2] =
    [(AffiliationLevel::Institution, 3), (AffiliationLevel::Country, 5)];

/// Months shown in the lag figures
const LAG_PLOT_MONTHS: usize = 19;

pub fn run_reproduce(args: ReproduceArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);
    info!("Reproducing every preset from {}", args.common.input);

    let mut outputs = Vec::new();

    for (level, num_articles_min) in AUTHOR_PRESETS {
        let summary = run_authors(AuthorsArgs {
            common: args.common.clone(),
            affiliation_level: level,
            target_journal: "all".to_string(),
            lag: LagBoundArgs::default(),
            num_articles_min,
            selection: SelectionArgs::default(),
            threads: args.threads,
            no_fig: args.no_fig,
        })?;
        outputs.push(summary.output);
    }

    let mut lag_tables = Vec::new();
    for (level, num_articles_min) in LAG_PRESETS {
        let summary = run_lag(LagArgs {
            common: args.common.clone(),
            affiliation_level: level,
            target_journal: "all".to_string(),
            num_articles_min,
            selection: SelectionArgs::default(),
            threads: args.threads,
        })?;
        lag_tables.push(summary.output.clone());
        outputs.push(summary.output);
    }

    let summary = run_journals(JournalsArgs {
        common: args.common.clone(),
        journals: DEFAULT_JOURNALS.iter().map(|j| j.to_string()).collect(),
        lag: LagBoundArgs::default(),
        num_articles_min: 0,
        selection: SelectionArgs::default(),
        threads: args.threads,
    })?;
    outputs.push(summary.output);

    let timeline = run_timeline(TimelineArgs {
        common: args.common.clone(),
        target_journal: "all".to_string(),
        lag: LagBoundArgs::default(),
        none_citation_included: true,
        metric: Metric::Ln,
        no_fig: false,
    })?;
    info!("Timeline covers {} articles", timeline.num_articles());

    for table in &lag_tables {
        let figure = run_plot_lag(PlotLagArgs {
            input: table.display().to_string(),
            figure_dir: args.common.figure_dir.clone(),
            months: LAG_PLOT_MONTHS,
            log_level: args.common.log_level.clone(),
        })?;
        outputs.push(figure);
    }

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    for output in &outputs {
        info!("    ↳ {}", output.display());
    }
    info!("========================================================");

    Ok(())
}
