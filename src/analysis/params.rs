use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

use crate::common::YearMonth;

/// Which author(s) of a record receive credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TargetAuthor {
    First,
    Last,
    Corresp,
    All,
}

impl TargetAuthor {
    pub const ALL_MODES: [TargetAuthor; 4] = [
        TargetAuthor::First,
        TargetAuthor::Last,
        TargetAuthor::Corresp,
        TargetAuthor::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAuthor::First => "first",
            TargetAuthor::Last => "last",
            TargetAuthor::Corresp => "corresp",
            TargetAuthor::All => "all",
        }
    }
}

impl fmt::Display for TargetAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which ROR field names an affiliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum AffiliationLevel {
    Institution,
    Country,
}

impl AffiliationLevel {
    pub const BOTH: [AffiliationLevel; 2] = [AffiliationLevel::Institution, AffiliationLevel::Country];

    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationLevel::Institution => "institution",
            AffiliationLevel::Country => "country",
        }
    }
}

impl fmt::Display for AffiliationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How per-entity citation totals become the compared value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Metric {
    /// Mean of ln(citations + 1)
    Ln,
    /// Mean of raw citations
    ArithmeticMean,
    /// Raw citation total
    Total,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Ln => "ln",
            Metric::ArithmeticMean => "arithmetic-mean",
            Metric::Total => "total",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `all` or an exact ISSN-L
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JournalFilter {
    All,
    Issnl(String),
}

impl JournalFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            JournalFilter::All
        } else {
            JournalFilter::Issnl(raw.to_string())
        }
    }

    pub fn matches(&self, journal: Option<&str>) -> bool {
        match self {
            JournalFilter::All => true,
            JournalFilter::Issnl(target) => journal.unwrap_or("") == target,
        }
    }
}

impl fmt::Display for JournalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalFilter::All => write!(f, "all"),
            JournalFilter::Issnl(issnl) => write!(f, "{}", issnl),
        }
    }
}

/// Parse a lag bound: "na" means no bound
pub fn parse_bound(raw: &str) -> Result<Option<i32>, String> {
    if raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| format!("expected 'na' or an integer, got '{}'", raw))
}

pub fn format_bound(bound: Option<i32>) -> String {
    match bound {
        Some(b) => b.to_string(),
        None => "na".to_string(),
    }
}

/// A publication-lag bound as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagBound(pub Option<i32>);

impl FromStr for LagBound {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_bound(raw).map(LagBound)
    }
}

impl fmt::Display for LagBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_bound(self.0))
    }
}

/// Record-level qualification criteria shared by both aggregations
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Cutoff used to require a complete observation window
    pub latest_month: YearMonth,
    /// Citation observation horizon in months
    pub max_months: i32,
    pub target_journal: JournalFilter,
    pub lag_min: Option<i32>,
    pub lag_max: Option<i32>,
    pub target_author: TargetAuthor,
    pub none_citation_included: bool,
}

/// Everything one affiliation-level run needs
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliationParams {
    pub criteria: FilterCriteria,
    pub affiliation_level: AffiliationLevel,
    pub num_articles_min: u32,
    pub unknown_excluded: bool,
    pub metric: Metric,
}

impl AffiliationParams {
    pub fn target_author(&self) -> TargetAuthor {
        self.criteria.target_author
    }

    /// Deterministic figure stem built from every parameter value
    pub fn figure_stem(&self) -> String {
        format!(
            "lorenz_{}_{}_{}_{}-{}_{}_{}_{}_{}",
            self.criteria.target_author,
            self.affiliation_level,
            self.criteria.target_journal,
            format_bound(self.criteria.lag_min),
            format_bound(self.criteria.lag_max),
            self.num_articles_min,
            self.unknown_excluded,
            self.criteria.none_citation_included,
            self.metric
        )
    }
}

impl fmt::Display for AffiliationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "latest_month={} max_months={} target_author={} level={} journal={} lag={}..{} num_articles_min={} none_citation_included={} unknown_excluded={} metric={}",
            self.criteria.latest_month,
            self.criteria.max_months,
            self.criteria.target_author,
            self.affiliation_level,
            self.criteria.target_journal,
            format_bound(self.criteria.lag_min),
            format_bound(self.criteria.lag_max),
            self.num_articles_min,
            self.criteria.none_citation_included,
            self.unknown_excluded,
            self.metric
        )
    }
}

/// Everything one time-bucket run needs
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineParams {
    pub criteria: FilterCriteria,
    pub metric: Metric,
}
