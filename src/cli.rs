use clap::{ArgAction, Args, Parser, Subcommand};

use crate::analysis::{
    AffiliationLevel, AffiliationParams, FilterCriteria, JournalFilter, LagBound, Metric, TargetAuthor,
    TimelineParams,
};
use crate::common::{OutputLayout, YearMonth};

/// ISSN-Ls compared by the journal sweep: PLoS ONE, Scientific Reports,
/// Nucleic Acids Research, Biophysical Journal, Nature Genetics, Nature, Science
pub const DEFAULT_JOURNALS: [&str; 7] = [
    "1932-6203",
    "2045-2322",
    "0305-1048",
    "0006-3495",
    "1061-4036",
    "0028-0836",
    "0036-8075",
];

#[derive(Parser)]
#[command(name = "citation-inequality")]
#[command(about = "Measure citation inequality across author affiliations for preprints and their publisher versions")]
#[command(version = "1.0.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// One affiliation-level run: Gini coefficients and Lorenz curves
    Ineq(IneqArgs),

    /// Sweep the credited author over first, last, corresp and all
    Authors(AuthorsArgs),

    /// Sweep the exact preprint-to-publisher lag from 0 to max-months - 1
    Lag(LagArgs),

    /// Sweep journals and both affiliation levels with every author credited
    Journals(JournalsArgs),

    /// Per-month citation metric and article counts since preprint posting
    Timeline(TimelineArgs),

    /// Render a lag sweep table as a three-panel figure
    PlotLag(PlotLagArgs),

    /// Run every preset sweep, the timeline and the lag figures
    Reproduce(ReproduceArgs),
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Article metadata, JSON Lines (gzip-compressed when ending in .gz)
    #[arg(short, long, default_value = "data/biorxiv_metadata-oc.jsonl.gz")]
    pub input: String,

    /// Latest month covered by the citation data (YYYY-MM)
    #[arg(long, default_value = "2021-06")]
    pub latest_month: YearMonth,

    /// Months of citations counted after preprint posting
    #[arg(long, default_value = "24")]
    pub max_months: i32,

    /// Directory for result tables
    #[arg(long, default_value = "result")]
    pub result_dir: String,

    /// Directory for figures
    #[arg(long, default_value = "figure")]
    pub figure_dir: String,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

impl CommonArgs {
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.result_dir, &self.figure_dir)
    }
}

#[derive(Args, Clone, Debug)]
pub struct LagBoundArgs {
    /// Minimum months from preprint to publisher version ('na' for none)
    #[arg(long, default_value = "0")]
    pub lag_min: LagBound,

    /// Maximum months from preprint to publisher version ('na' for none)
    #[arg(long, default_value = "na")]
    pub lag_max: LagBound,
}

impl Default for LagBoundArgs {
    fn default() -> Self {
        Self {
            lag_min: LagBound(Some(0)),
            lag_max: LagBound(None),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct SelectionArgs {
    /// Include preprints that were never cited
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub none_citation_included: bool,

    /// Drop the 'unknown' affiliation before computing inequality
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub unknown_excluded: bool,

    /// Per-affiliation value compared across affiliations
    #[arg(long, value_enum, default_value_t = Metric::Ln)]
    pub metric: Metric,
}

impl Default for SelectionArgs {
    fn default() -> Self {
        Self {
            none_citation_included: true,
            unknown_excluded: true,
            metric: Metric::Ln,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct IneqArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Author(s) whose affiliations receive credit
    #[arg(long, value_enum, default_value_t = TargetAuthor::First)]
    pub target_author: TargetAuthor,

    /// Group by institution name or by country
    #[arg(long, value_enum, default_value_t = AffiliationLevel::Institution)]
    pub affiliation_level: AffiliationLevel,

    /// ISSN-L of the publishing journal, or 'all'
    #[arg(long, default_value = "all")]
    pub target_journal: String,

    #[command(flatten)]
    pub lag: LagBoundArgs,

    /// Minimum article credit for an affiliation to be kept
    #[arg(long, default_value = "5")]
    pub num_articles_min: u32,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Append the result row to this TSV file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip the Lorenz figure
    #[arg(long, default_value = "false")]
    pub no_fig: bool,
}

impl IneqArgs {
    pub fn params(&self) -> AffiliationParams {
        AffiliationParams {
            criteria: FilterCriteria {
                latest_month: self.common.latest_month,
                max_months: self.common.max_months,
                target_journal: JournalFilter::parse(&self.target_journal),
                lag_min: self.lag.lag_min.0,
                lag_max: self.lag.lag_max.0,
                target_author: self.target_author,
                none_citation_included: self.selection.none_citation_included,
            },
            affiliation_level: self.affiliation_level,
            num_articles_min: self.num_articles_min,
            unknown_excluded: self.selection.unknown_excluded,
            metric: self.selection.metric,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct AuthorsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Group by institution name or by country
    #[arg(long, value_enum, default_value_t = AffiliationLevel::Institution)]
    pub affiliation_level: AffiliationLevel,

    /// ISSN-L of the publishing journal, or 'all'
    #[arg(long, default_value = "all")]
    pub target_journal: String,

    #[command(flatten)]
    pub lag: LagBoundArgs,

    /// Minimum article credit for an affiliation to be kept
    #[arg(long, default_value = "5")]
    pub num_articles_min: u32,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Parallel runs (0 = one per core)
    #[arg(short, long, default_value = "1")]
    pub threads: usize,

    /// Skip the Lorenz figures
    #[arg(long, default_value = "false")]
    pub no_fig: bool,
}

impl AuthorsArgs {
    pub fn params(&self, target_author: TargetAuthor) -> AffiliationParams {
        AffiliationParams {
            criteria: FilterCriteria {
                latest_month: self.common.latest_month,
                max_months: self.common.max_months,
                target_journal: JournalFilter::parse(&self.target_journal),
                lag_min: self.lag.lag_min.0,
                lag_max: self.lag.lag_max.0,
                target_author,
                none_citation_included: self.selection.none_citation_included,
            },
            affiliation_level: self.affiliation_level,
            num_articles_min: self.num_articles_min,
            unknown_excluded: self.selection.unknown_excluded,
            metric: self.selection.metric,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct LagArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Group by institution name or by country
    #[arg(long, value_enum, default_value_t = AffiliationLevel::Institution)]
    pub affiliation_level: AffiliationLevel,

    /// ISSN-L of the publishing journal, or 'all'
    #[arg(long, default_value = "all")]
    pub target_journal: String,

    /// Minimum article credit for an affiliation to be kept
    #[arg(long, default_value = "3")]
    pub num_articles_min: u32,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Parallel runs (0 = one per core)
    #[arg(short, long, default_value = "1")]
    pub threads: usize,
}

impl LagArgs {
    /// Every author credited, lag fixed to exactly `months`
    pub fn params(&self, months: i32) -> AffiliationParams {
        AffiliationParams {
            criteria: FilterCriteria {
                latest_month: self.common.latest_month,
                max_months: self.common.max_months,
                target_journal: JournalFilter::parse(&self.target_journal),
                lag_min: Some(months),
                lag_max: Some(months),
                target_author: TargetAuthor::All,
                none_citation_included: self.selection.none_citation_included,
            },
            affiliation_level: self.affiliation_level,
            num_articles_min: self.num_articles_min,
            unknown_excluded: self.selection.unknown_excluded,
            metric: self.selection.metric,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct JournalsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ISSN-Ls to compare, comma-separated
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_JOURNALS)]
    pub journals: Vec<String>,

    #[command(flatten)]
    pub lag: LagBoundArgs,

    /// Minimum article credit for an affiliation to be kept
    #[arg(long, default_value = "0")]
    pub num_articles_min: u32,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Parallel runs (0 = one per core)
    #[arg(short, long, default_value = "1")]
    pub threads: usize,
}

impl JournalsArgs {
    pub fn params(&self, journal: &str, affiliation_level: AffiliationLevel) -> AffiliationParams {
        AffiliationParams {
            criteria: FilterCriteria {
                latest_month: self.common.latest_month,
                max_months: self.common.max_months,
                target_journal: JournalFilter::parse(journal),
                lag_min: self.lag.lag_min.0,
                lag_max: self.lag.lag_max.0,
                target_author: TargetAuthor::All,
                none_citation_included: self.selection.none_citation_included,
            },
            affiliation_level,
            num_articles_min: self.num_articles_min,
            unknown_excluded: self.selection.unknown_excluded,
            metric: self.selection.metric,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ISSN-L of the publishing journal, or 'all'
    #[arg(long, default_value = "all")]
    pub target_journal: String,

    #[command(flatten)]
    pub lag: LagBoundArgs,

    /// Include preprints that were never cited
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub none_citation_included: bool,

    /// Per-month value plotted for each version
    #[arg(long, value_enum, default_value_t = Metric::Ln)]
    pub metric: Metric,

    /// Skip the figure
    #[arg(long, default_value = "false")]
    pub no_fig: bool,
}

impl TimelineArgs {
    pub fn params(&self) -> TimelineParams {
        TimelineParams {
            criteria: FilterCriteria {
                latest_month: self.common.latest_month,
                max_months: self.common.max_months,
                target_journal: JournalFilter::parse(&self.target_journal),
                lag_min: self.lag.lag_min.0,
                lag_max: self.lag.lag_max.0,
                target_author: TargetAuthor::All,
                none_citation_included: self.none_citation_included,
            },
            metric: self.metric,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct PlotLagArgs {
    /// Lag sweep table written by the lag command
    #[arg(short, long, required = true)]
    pub input: String,

    /// Directory for figures
    #[arg(long, default_value = "figure")]
    pub figure_dir: String,

    /// Number of leading rows (months) to plot
    #[arg(long, default_value = "19")]
    pub months: usize,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone, Debug)]
pub struct ReproduceArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Parallel runs within each sweep (0 = one per core)
    #[arg(short, long, default_value = "1")]
    pub threads: usize,

    /// Skip the Lorenz figures of the author sweeps
    #[arg(long, default_value = "false")]
    pub no_fig: bool,
}
