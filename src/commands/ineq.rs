use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::time::Instant;

use crate::analysis::run_affiliation_analysis;
use crate::cli::IneqArgs;
use crate::common::{format_elapsed, setup_logging};
use crate::report::{render_lorenz, write_gini_rows, GiniRow};

pub fn run_ineq(args: IneqArgs) -> Result<GiniRow> {
    let start_time = Instant::now();

    setup_logging(&args.common.log_level);

    let params = args.params();
    info!("Starting affiliation inequality run");
    info!("Input: {}", args.common.input);

    let report = run_affiliation_analysis(Path::new(&args.common.input), &params, true)?;
    let summary = report
        .summarize()
        .context("Inequality is undefined for the selected affiliations")?;

    let row = GiniRow::from_summary(vec![params.target_author().to_string()], &summary);
    println!("{}", row.to_record().join("\t"));

    if let Some(output) = &args.output {
        write_gini_rows(Path::new(output), std::slice::from_ref(&row), true)?;
        info!("Row appended to {}", output);
    }

    if !args.no_fig {
        let layout = args.common.layout();
        layout.ensure_figure_dir()?;
        let path = layout.figure_path(&params.figure_stem());
        render_lorenz(&path, &summary).with_context(|| format!("Failed to render {}", path.display()))?;
        info!("Lorenz figure: {}", path.display());
    }

    info!("==================== FINAL SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Gini (preprint): {}", summary.gini_preprint);
    info!("Gini (publisher version): {}", summary.gini_published);
    info!("Articles: {}", summary.num_articles);
    info!("Affiliations: {}", summary.num_affiliations);
    info!("========================================================");

    Ok(row)
}
