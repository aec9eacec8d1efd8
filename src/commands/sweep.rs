use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{run_affiliation_analysis, AffiliationLevel, AffiliationParams, TargetAuthor};
use crate::cli::{AuthorsArgs, JournalsArgs, LagArgs};
use crate::common::{create_count_progress_bar, format_elapsed, resolve_threads, setup_logging, OutputLayout};
use crate::report::{render_lorenz, write_gini_rows, GiniRow};

/// One parameter combination of a sweep and the key columns of its row
struct SweepRun {
    keys: Vec<String>,
    params: AffiliationParams,
}

/// Rows written by a sweep, in parameter order
#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub rows: Vec<GiniRow>,
    pub output: PathBuf,
}

pub fn authors_table_name(level: AffiliationLevel) -> String {
    format!("gini_{}_target-authors.tsv", level)
}

pub fn lag_table_name(level: AffiliationLevel, num_articles_min: u32) -> String {
    format!("gini_{}_all_{}.tsv", level, num_articles_min)
}

pub const JOURNALS_TABLE_NAME: &str = "gini_journals.tsv";

/// A single run never fails the sweep on a degenerate distribution; its row
/// carries NaN for each coefficient that is undefined
fn sweep_one(input: &Path, run: &SweepRun, figures: Option<&OutputLayout>) -> Result<GiniRow> {
    let report = run_affiliation_analysis(input, &run.params, false)?;
    match report.summarize() {
        Ok(summary) => {
            if let Some(layout) = figures {
                let path = layout.figure_path(&run.params.figure_stem());
                render_lorenz(&path, &summary)
                    .with_context(|| format!("Failed to render {}", path.display()))?;
                info!("Lorenz figure: {}", path.display());
            }
            Ok(GiniRow::from_summary(run.keys.clone(), &summary))
        }
        Err(e) => {
            warn!("No Gini coefficient for [{}]: {:#}", run.keys.join(" "), e);
            Ok(GiniRow::degenerate(run.keys.clone(), &report))
        }
    }
}

fn run_sweep(
    input: &Path,
    runs: Vec<SweepRun>,
    threads: usize,
    figures: Option<&OutputLayout>,
) -> Result<Vec<GiniRow>> {
    let num_threads = resolve_threads(threads);
    if threads == 0 {
        info!("Auto-detected {} CPU cores. Using {} threads.", num_threads, num_threads);
    } else {
        info!("Using specified {} threads.", num_threads);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to build thread pool")?;

    let pb = create_count_progress_bar(runs.len() as u64, "Sweeping parameters...");
    let rows = pool.install(|| {
        runs.par_iter()
            .map(|run| {
                let row = sweep_one(input, run, figures);
                pb.inc(1);
                row
            })
            .collect::<Result<Vec<_>>>()
    });
    pb.finish_with_message("Sweep complete");
    rows
}

fn log_rows(rows: &[GiniRow]) {
    for row in rows {
        info!("    ↳ {}", row.to_record().join("\t"));
    }
}

pub fn run_authors(args: AuthorsArgs) -> Result<SweepSummary> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);

    info!("Starting target-author sweep");
    info!("Input: {}", args.common.input);
    info!(
        "Affiliation level: {}, minimum articles: {}",
        args.affiliation_level, args.num_articles_min
    );

    let layout = args.common.layout();
    layout.ensure_result_dir()?;
    if !args.no_fig {
        layout.ensure_figure_dir()?;
    }

    let runs = TargetAuthor::ALL_MODES
        .iter()
        .map(|&mode| SweepRun {
            keys: vec![mode.to_string()],
            params: args.params(mode),
        })
        .collect();

    let figures = if args.no_fig { None } else { Some(&layout) };
    let rows = run_sweep(Path::new(&args.common.input), runs, args.threads, figures)?;

    let output = layout.result_path(&authors_table_name(args.affiliation_level));
    write_gini_rows(&output, &rows, false)?;

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    log_rows(&rows);
    info!("Output file: {}", output.display());
    info!("========================================================");

    Ok(SweepSummary { rows, output })
}

pub fn run_lag(args: LagArgs) -> Result<SweepSummary> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);

    info!("Starting publication-lag sweep");
    info!("Input: {}", args.common.input);
    info!(
        "Affiliation level: {}, minimum articles: {}, lags 0..{}",
        args.affiliation_level, args.num_articles_min, args.common.max_months
    );

    let layout = args.common.layout();
    layout.ensure_result_dir()?;

    let runs = (0..args.common.max_months)
        .map(|months| SweepRun {
            keys: vec![months.to_string()],
            params: args.params(months),
        })
        .collect();

    let rows = run_sweep(Path::new(&args.common.input), runs, args.threads, None)?;

    let output = layout.result_path(&lag_table_name(args.affiliation_level, args.num_articles_min));
    write_gini_rows(&output, &rows, false)?;

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Rows written: {}", rows.len());
    info!("Output file: {}", output.display());
    info!("========================================================");

    Ok(SweepSummary { rows, output })
}

pub fn run_journals(args: JournalsArgs) -> Result<SweepSummary> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);

    info!("Starting journal sweep");
    info!("Input: {}", args.common.input);
    info!("Journals: {}", args.journals.join(", "));

    let layout = args.common.layout();
    layout.ensure_result_dir()?;

    let mut runs = Vec::with_capacity(args.journals.len() * AffiliationLevel::BOTH.len());
    for journal in &args.journals {
        for level in AffiliationLevel::BOTH {
            runs.push(SweepRun {
                keys: vec![journal.clone(), level.to_string(), TargetAuthor::All.to_string()],
                params: args.params(journal, level),
            });
        }
    }

    let rows = run_sweep(Path::new(&args.common.input), runs, args.threads, None)?;

    let output = layout.result_path(JOURNALS_TABLE_NAME);
    write_gini_rows(&output, &rows, false)?;

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    log_rows(&rows);
    info!("Output file: {}", output.display());
    info!("========================================================");

    Ok(SweepSummary { rows, output })
}
