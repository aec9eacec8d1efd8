use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::analysis::{AffiliationReport, AffiliationSummary, TimelineReport};

/// One result line: leading key columns, then the two Gini coefficients,
/// article credit and affiliation count
#[derive(Debug, Clone, PartialEq)]
pub struct GiniRow {
    pub keys: Vec<String>,
    pub gini_preprint: f64,
    pub gini_published: f64,
    pub num_articles: f64,
    pub num_affiliations: usize,
}

impl GiniRow {
    pub fn from_summary(keys: Vec<String>, summary: &AffiliationSummary) -> Self {
        Self {
            keys,
            gini_preprint: summary.gini_preprint,
            gini_published: summary.gini_published,
            num_articles: summary.num_articles,
            num_affiliations: summary.num_affiliations,
        }
    }

    /// Row for a run where at least one distribution had no Gini
    /// coefficient; only the undefined side is NaN
    pub fn degenerate(keys: Vec<String>, report: &AffiliationReport) -> Self {
        Self {
            keys,
            gini_preprint: report.gini_preprint().unwrap_or(f64::NAN),
            gini_published: report.gini_published().unwrap_or(f64::NAN),
            num_articles: report.num_articles(),
            num_affiliations: report.num_affiliations(),
        }
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut record = self.keys.clone();
        record.push(format_float(self.gini_preprint));
        record.push(format_float(self.gini_published));
        record.push(format_float(self.num_articles));
        record.push(self.num_affiliations.to_string());
        record
    }
}

fn open_for_write(path: &Path, append: bool) -> Result<File> {
    let file = if append {
        OpenOptions::new().create(true).append(true).open(path)
    } else {
        File::create(path)
    };
    file.with_context(|| format!("Failed to open output file: {}", path.display()))
}

/// Write rows tab-separated without a header, replacing or extending `path`
pub fn write_gini_rows(path: &Path, rows: &[GiniRow], append: bool) -> Result<()> {
    let file = open_for_write(path, append)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    for row in rows {
        writer
            .write_record(row.to_record())
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Floats always carry a decimal point: `3.0`, not `3`
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

/// One row per month offset; months without an average leave the metric
/// column empty
pub fn write_timeline(path: &Path, report: &TimelineReport) -> Result<()> {
    let file = open_for_write(path, false)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(file);

    for (bucket, metric) in report.buckets.iter().zip(&report.series) {
        writer
            .write_record([
                metric.offset.to_string(),
                bucket.articles_preprint.to_string(),
                bucket.articles_published.to_string(),
                bucket.citations_preprint.to_string(),
                bucket.citations_published.to_string(),
                format_float(bucket.citations_preprint_ln),
                format_float(bucket.citations_published_ln),
                format_optional(metric.preprint),
                format_optional(metric.published),
            ])
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// A row of a publication-lag sweep as read back for plotting
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LagRow {
    pub months: i32,
    pub gini_preprint: f64,
    pub gini_published: f64,
    pub num_articles: f64,
    pub num_affiliations: usize,
}

pub fn read_lag_rows(path: &Path) -> Result<Vec<LagRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open lag table: {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(file);

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize::<LagRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse row {} of {}", i + 1, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}
