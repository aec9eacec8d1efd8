use super::classify::{group_by_publication, CitedVersion, MonthGroup};
use super::filter::{qualify, Exclusion, ScanStats};
use super::params::{Metric, TimelineParams};
use crate::common::diff_month;
use crate::record::ArticleRecord;

/// Totals for one month offset since preprint posting
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeBucketAccount {
    /// Articles still only available as a preprint in this month
    pub articles_preprint: u64,
    /// Articles whose publisher version is out in this month
    pub articles_published: u64,
    pub citations_preprint: u64,
    pub citations_published: u64,
    pub citations_preprint_ln: f64,
    pub citations_published_ln: f64,
}

/// One bucket per month offset in 0..=max_months
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucketTable {
    buckets: Vec<TimeBucketAccount>,
}

impl TimeBucketTable {
    pub fn new(max_months: i32) -> Self {
        Self {
            buckets: vec![TimeBucketAccount::default(); max_months.max(0) as usize + 1],
        }
    }

    fn max_offset(&self) -> i32 {
        self.buckets.len() as i32 - 1
    }

    /// Count the article as a preprint for offsets [0, lag) and as published
    /// for [lag, available]. Offsets past the horizon end the walk; negative
    /// offsets are skipped.
    pub fn add_presence(&mut self, publication_lag: i32, available_months: i32) {
        let max_offset = self.max_offset();
        for offset in 0..publication_lag {
            if offset > max_offset {
                break;
            }
            self.buckets[offset as usize].articles_preprint += 1;
        }
        for offset in publication_lag..=available_months {
            if offset > max_offset {
                break;
            }
            if offset < 0 {
                continue;
            }
            self.buckets[offset as usize].articles_published += 1;
        }
    }

    /// Add grouped citation counts at their offsets
    pub fn add_groups(&mut self, groups: &[MonthGroup]) {
        for group in groups {
            let Some(bucket) = self.buckets.get_mut(group.offset) else {
                continue;
            };
            match group.version {
                CitedVersion::Published => {
                    bucket.citations_published += group.count as u64;
                    bucket.citations_published_ln += group.count_ln();
                }
                CitedVersion::Preprint => {
                    bucket.citations_preprint += group.count as u64;
                    bucket.citations_preprint_ln += group.count_ln();
                }
            }
        }
    }

    pub fn buckets(&self) -> &[TimeBucketAccount] {
        &self.buckets
    }

    /// Per-month (preprint, published) values; a month without any active
    /// article of that version has no average
    pub fn finalize(&self, metric: Metric) -> Vec<MonthlyMetric> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(offset, b)| {
                let (preprint, published) = match metric {
                    Metric::Ln => (
                        average(b.citations_preprint_ln, b.articles_preprint),
                        average(b.citations_published_ln, b.articles_published),
                    ),
                    Metric::ArithmeticMean => (
                        average(b.citations_preprint as f64, b.articles_preprint),
                        average(b.citations_published as f64, b.articles_published),
                    ),
                    Metric::Total => (
                        Some(b.citations_preprint as f64),
                        Some(b.citations_published as f64),
                    ),
                };
                MonthlyMetric {
                    offset,
                    preprint,
                    published,
                }
            })
            .collect()
    }
}

fn average(sum: f64, articles: u64) -> Option<f64> {
    if articles == 0 {
        None
    } else {
        Some(sum / articles as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyMetric {
    pub offset: usize,
    pub preprint: Option<f64>,
    pub published: Option<f64>,
}

/// Single-pass accumulation state for one time-bucket run
pub struct TimelineAggregator<'p> {
    params: &'p TimelineParams,
    table: TimeBucketTable,
    stats: ScanStats,
}

impl<'p> TimelineAggregator<'p> {
    pub fn new(params: &'p TimelineParams) -> Self {
        Self {
            params,
            table: TimeBucketTable::new(params.criteria.max_months),
            stats: ScanStats::default(),
        }
    }

    pub fn ingest(&mut self, record: &ArticleRecord) -> Result<(), Exclusion> {
        self.stats.records_read += 1;
        let outcome = self.try_ingest(record);
        match outcome {
            Ok(()) => self.stats.records_included += 1,
            Err(reason) => self.stats.record_exclusion(reason),
        }
        outcome
    }

    fn try_ingest(&mut self, record: &ArticleRecord) -> Result<(), Exclusion> {
        let criteria = &self.params.criteria;
        let qualified = qualify(record, criteria)?;

        let available_months = diff_month(&criteria.latest_month, &qualified.preprint_month);
        self.table
            .add_presence(qualified.publication_lag(), available_months);

        let groups = group_by_publication(
            &record.oc,
            &qualified.preprint_month,
            &qualified.published_month,
            criteria.max_months,
        );
        self.table.add_groups(&groups);
        Ok(())
    }

    pub fn table(&self) -> &TimeBucketTable {
        &self.table
    }

    pub fn finish(self) -> (TimeBucketTable, ScanStats) {
        (self.table, self.stats)
    }
}

/// Outcome of one time-bucket run
#[derive(Debug, Clone)]
pub struct TimelineReport {
    pub params: TimelineParams,
    pub buckets: Vec<TimeBucketAccount>,
    pub series: Vec<MonthlyMetric>,
    pub stats: ScanStats,
}

impl TimelineReport {
    pub fn from_table(params: &TimelineParams, table: &TimeBucketTable, stats: ScanStats) -> Self {
        Self {
            params: params.clone(),
            buckets: table.buckets().to_vec(),
            series: table.finalize(params.metric),
            stats,
        }
    }

    pub fn num_articles(&self) -> usize {
        self.stats.records_included
    }
}
