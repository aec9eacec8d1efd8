use log::info;
use std::collections::BTreeMap;
use std::fmt;

use super::params::{FilterCriteria, TargetAuthor};
use crate::common::{diff_month, YearMonth};
use crate::record::ArticleRecord;

/// Why a record was left out of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Exclusion {
    NoPublishedDoi,
    JournalMismatch,
    NoPublishedMonth,
    IncompleteWindow,
    LagOutOfRange,
    NoAuthors,
    EstimatedAuthors,
    TargetAuthorMissing,
    NoCitations,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::NoPublishedDoi => "no publisher DOI",
            Exclusion::JournalMismatch => "other journal",
            Exclusion::NoPublishedMonth => "no publisher month",
            Exclusion::IncompleteWindow => "observation window incomplete",
            Exclusion::LagOutOfRange => "publication lag out of range",
            Exclusion::NoAuthors => "no authors",
            Exclusion::EstimatedAuthors => "estimated authors",
            Exclusion::TargetAuthorMissing => "target author not found",
            Exclusion::NoCitations => "no citations",
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record that passed every record-level check, with its months parsed
#[derive(Debug, Clone, Copy)]
pub struct QualifiedRecord<'a> {
    pub record: &'a ArticleRecord,
    pub preprint_month: YearMonth,
    pub published_month: YearMonth,
}

impl QualifiedRecord<'_> {
    /// Months from preprint to publisher version
    pub fn publication_lag(&self) -> i32 {
        diff_month(&self.published_month, &self.preprint_month)
    }
}

/// Decide whether a record enters the analysis
pub fn qualify<'a>(
    record: &'a ArticleRecord,
    criteria: &FilterCriteria,
) -> Result<QualifiedRecord<'a>, Exclusion> {
    if record.published_doi.is_none() {
        return Err(Exclusion::NoPublishedDoi);
    }

    if !criteria
        .target_journal
        .matches(record.published_journalissnl.as_deref())
    {
        return Err(Exclusion::JournalMismatch);
    }

    let published_month = record.publisher_month().ok_or(Exclusion::NoPublishedMonth)?;
    let preprint_month = record.month;

    if diff_month(&criteria.latest_month, &preprint_month) < criteria.max_months {
        return Err(Exclusion::IncompleteWindow);
    }

    let lag = diff_month(&published_month, &preprint_month);
    if criteria.lag_min.is_some_and(|min| lag < min) || criteria.lag_max.is_some_and(|max| lag > max) {
        return Err(Exclusion::LagOutOfRange);
    }

    if record.author.authors.is_empty() {
        return Err(Exclusion::NoAuthors);
    }

    if record.author.estimate && criteria.target_author != TargetAuthor::All {
        return Err(Exclusion::EstimatedAuthors);
    }

    if !criteria.none_citation_included && record.oc.is_empty() {
        return Err(Exclusion::NoCitations);
    }

    Ok(QualifiedRecord {
        record,
        preprint_month,
        published_month,
    })
}

/// Counters for one pass over the input
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub records_read: usize,
    pub records_included: usize,
    pub exclusions: BTreeMap<Exclusion, usize>,
}

impl ScanStats {
    pub fn record_exclusion(&mut self, reason: Exclusion) {
        *self.exclusions.entry(reason).or_insert(0) += 1;
    }

    pub fn records_excluded(&self) -> usize {
        self.exclusions.values().sum()
    }

    pub fn log_summary(&self) {
        info!("Records read: {}", self.records_read);
        info!("Records included: {}", self.records_included);
        info!("Records excluded: {}", self.records_excluded());
        for (reason, count) in &self.exclusions {
            info!("    ↳ {}: {}", reason, count);
        }
    }
}
