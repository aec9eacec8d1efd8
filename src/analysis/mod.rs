pub mod affiliation;
pub mod attribution;
pub mod classify;
pub mod filter;
pub mod params;
pub mod timeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use affiliation::{
    AffiliationAggregator, AffiliationMetric, AffiliationReport, AffiliationSummary, AffiliationTable,
};
pub use attribution::{attribute, AffiliationLookup, Attribution, UNKNOWN_AFFILIATION};
pub use classify::{count_by_cited_doi, group_by_publication, CitationCounts, CitedVersion, MonthGroup};
pub use filter::{qualify, Exclusion, QualifiedRecord, ScanStats};
pub use params::{
    format_bound, parse_bound, AffiliationLevel, AffiliationParams, FilterCriteria, JournalFilter, LagBound, Metric,
    TargetAuthor, TimelineParams,
};
pub use timeline::{MonthlyMetric, TimeBucketAccount, TimeBucketTable, TimelineAggregator, TimelineReport};

use anyhow::Result;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

use crate::common::format_elapsed;
use crate::record::RecordReader;

/// Stream `input` once and build the per-affiliation table for `params`
pub fn run_affiliation_analysis(
    input: &Path,
    params: &AffiliationParams,
    show_progress: bool,
) -> Result<AffiliationReport> {
    let start_time = Instant::now();
    info!("Affiliation run: {}", params);

    let mut aggregator = AffiliationAggregator::new(params);
    let mut reader = RecordReader::open(input, show_progress)?;
    for record in &mut reader {
        let record = record?;
        if let Err(reason) = aggregator.ingest(&record) {
            debug!("Skipping record from {}: {}", record.month, reason);
        }
    }

    let (table, stats) = aggregator.finish();
    let report = AffiliationReport::from_table(params, &table, stats);

    info!("Lines read: {}", reader.lines_read());
    report.stats.log_summary();
    info!(
        "Affiliations: {} in table, {} kept (articles: {:.1})",
        table.len(),
        report.num_affiliations(),
        report.num_articles()
    );
    info!("Run time: {}", format_elapsed(start_time.elapsed()));
    Ok(report)
}

/// Stream `input` once and fill the per-month time buckets for `params`
pub fn run_timeline_analysis(
    input: &Path,
    params: &TimelineParams,
    show_progress: bool,
) -> Result<TimelineReport> {
    let start_time = Instant::now();
    info!(
        "Timeline run: latest_month={} max_months={} journal={} lag={}..{} metric={}",
        params.criteria.latest_month,
        params.criteria.max_months,
        params.criteria.target_journal,
        format_bound(params.criteria.lag_min),
        format_bound(params.criteria.lag_max),
        params.metric
    );

    let mut aggregator = TimelineAggregator::new(params);
    let mut reader = RecordReader::open(input, show_progress)?;
    for record in &mut reader {
        let record = record?;
        if let Err(reason) = aggregator.ingest(&record) {
            debug!("Skipping record from {}: {}", record.month, reason);
        }
    }

    let (table, stats) = aggregator.finish();
    let report = TimelineReport::from_table(params, &table, stats);

    info!("Lines read: {}", reader.lines_read());
    report.stats.log_summary();
    info!("Run time: {}", format_elapsed(start_time.elapsed()));
    Ok(report)
}
