use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::cli::PlotLagArgs;
use crate::common::{setup_logging, OutputLayout};
use crate::report::{read_lag_rows, render_lag};

/// Figure stem for a lag table: the table's own file stem
fn figure_stem(table: &Path) -> Result<String> {
    table
        .file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
        .with_context(|| format!("Cannot derive a figure name from {}", table.display()))
}

pub fn run_plot_lag(args: PlotLagArgs) -> Result<PathBuf> {
    setup_logging(&args.log_level);

    let table = Path::new(&args.input);
    info!("Plotting lag table: {}", table.display());

    let mut rows = read_lag_rows(table)?;
    rows.truncate(args.months);
    if rows.is_empty() {
        bail!("No rows to plot in {}", table.display());
    }

    let layout = OutputLayout::new("", &args.figure_dir);
    layout.ensure_figure_dir()?;
    let path = layout.figure_path(&figure_stem(table)?);
    render_lag(&path, &rows).with_context(|| format!("Failed to render {}", path.display()))?;

    info!("Plotted {} months: {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_stem() {
        assert_eq!(
            figure_stem(Path::new("result/gini_institution_all_3.tsv")).unwrap(),
            "gini_institution_all_3"
        );
        assert!(figure_stem(Path::new("")).is_err());
    }
}
