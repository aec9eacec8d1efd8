use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::time::Instant;

use crate::analysis::{run_timeline_analysis, TimelineReport};
use crate::cli::TimelineArgs;
use crate::common::{format_elapsed, setup_logging};
use crate::report::{render_timeline, write_timeline};

pub const TIMELINE_STEM: &str = "time_articles_citations";

pub fn run_timeline(args: TimelineArgs) -> Result<TimelineReport> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);

    info!("Starting citation timeline");
    info!("Input: {}", args.common.input);

    let params = args.params();
    let report = run_timeline_analysis(Path::new(&args.common.input), &params, true)?;

    let layout = args.common.layout();
    layout.ensure_result_dir()?;
    let output = layout.result_path(&format!("{}.tsv", TIMELINE_STEM));
    write_timeline(&output, &report)?;

    if !args.no_fig {
        layout.ensure_figure_dir()?;
        let path = layout.figure_path(TIMELINE_STEM);
        render_timeline(&path, &report).with_context(|| format!("Failed to render {}", path.display()))?;
        info!("Timeline figure: {}", path.display());
    }

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Articles: {}", report.num_articles());
    info!("Months: {}", report.buckets.len());
    info!("Output file: {}", output.display());
    info!("========================================================");

    Ok(report)
}
