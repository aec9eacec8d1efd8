use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::attribution::{attribute, Attribution, UNKNOWN_AFFILIATION};
use super::classify::{count_by_cited_doi, CitationCounts};
use super::filter::{qualify, Exclusion, ScanStats};
use super::params::{AffiliationParams, Metric};
use crate::inequality::{gini, LorenzCurve};
use crate::record::ArticleRecord;

/// Running totals for one affiliation key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AffiliationAccount {
    /// Fractional article credit
    pub num_articles: f64,
    pub preprint: f64,
    pub published: f64,
    /// Weighted sums of ln(count + 1) of each record's count
    pub preprint_ln: f64,
    pub published_ln: f64,
}

impl AffiliationAccount {
    pub fn add(&mut self, weight: f64, counts: &CitationCounts) {
        self.num_articles += weight;
        self.preprint += counts.preprint as f64 * weight;
        self.published += counts.published as f64 * weight;
        self.preprint_ln += counts.preprint_ln() * weight;
        self.published_ln += counts.published_ln() * weight;
    }

    /// (preprint, published) value under `metric`
    pub fn metric(&self, metric: Metric) -> (f64, f64) {
        match metric {
            Metric::Ln => (
                self.preprint_ln / self.num_articles,
                self.published_ln / self.num_articles,
            ),
            Metric::ArithmeticMean => (
                self.preprint / self.num_articles,
                self.published / self.num_articles,
            ),
            Metric::Total => (self.preprint, self.published),
        }
    }
}

/// Accounts keyed by affiliation, iterated in key order
#[derive(Debug, Clone, Default)]
pub struct AffiliationTable {
    accounts: BTreeMap<String, AffiliationAccount>,
}

impl AffiliationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one record's citations to every attributed affiliation
    pub fn add_record(&mut self, attribution: &Attribution, counts: &CitationCounts) {
        for (key, weight) in attribution.iter() {
            self.accounts
                .entry(key.to_string())
                .or_default()
                .add(weight, counts);
        }
    }

    pub fn get(&self, key: &str) -> Option<&AffiliationAccount> {
        self.accounts.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AffiliationAccount)> + '_ {
        self.accounts.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Apply the post-pass filters and compute each surviving key's metric
    pub fn finalize(&self, params: &AffiliationParams) -> Vec<AffiliationMetric> {
        let min_articles = params.num_articles_min as f64;
        self.iter()
            .filter(|(key, _)| !(params.unknown_excluded && *key == UNKNOWN_AFFILIATION))
            .filter(|(_, account)| account.num_articles >= min_articles)
            .map(|(key, account)| {
                let (preprint, published) = account.metric(params.metric);
                AffiliationMetric {
                    affiliation: key.to_string(),
                    num_articles: account.num_articles,
                    preprint,
                    published,
                }
            })
            .collect()
    }
}

/// Final per-affiliation value compared across affiliations
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliationMetric {
    pub affiliation: String,
    pub num_articles: f64,
    pub preprint: f64,
    pub published: f64,
}

/// Single-pass accumulation state for one affiliation-level run
pub struct AffiliationAggregator<'p> {
    params: &'p AffiliationParams,
    table: AffiliationTable,
    stats: ScanStats,
}

impl<'p> AffiliationAggregator<'p> {
    pub fn new(params: &'p AffiliationParams) -> Self {
        Self {
            params,
            table: AffiliationTable::new(),
            stats: ScanStats::default(),
        }
    }

    /// Fold one record into the table, or report why it was left out
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
        let qualified = qualify(record, &self.params.criteria)?;
        let attribution = attribute(
            record,
            self.params.criteria.target_author,
            self.params.affiliation_level,
        )
        .ok_or(Exclusion::TargetAuthorMissing)?;
        let counts = count_by_cited_doi(
            &record.oc,
            &qualified.preprint_month,
            self.params.criteria.max_months,
        );
        self.table.add_record(&attribution, &counts);
        Ok(())
    }

    pub fn table(&self) -> &AffiliationTable {
        &self.table
    }

    pub fn finish(self) -> (AffiliationTable, ScanStats) {
        (self.table, self.stats)
    }
}

/// Outcome of one affiliation-level run
#[derive(Debug, Clone)]
pub struct AffiliationReport {
    pub params: AffiliationParams,
    pub metrics: Vec<AffiliationMetric>,
    pub stats: ScanStats,
}

impl AffiliationReport {
    pub fn from_table(params: &AffiliationParams, table: &AffiliationTable, stats: ScanStats) -> Self {
        Self {
            params: params.clone(),
            metrics: table.finalize(params),
            stats,
        }
    }

    /// Article credit held by the surviving affiliations
    pub fn num_articles(&self) -> f64 {
        self.metrics.iter().map(|m| m.num_articles).sum()
    }

    pub fn num_affiliations(&self) -> usize {
        self.metrics.len()
    }

    pub fn preprint_values(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.preprint).collect()
    }

    pub fn published_values(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.published).collect()
    }

    pub fn gini_preprint(&self) -> Result<f64> {
        gini(&self.preprint_values()).context("preprint distribution")
    }

    pub fn gini_published(&self) -> Result<f64> {
        gini(&self.published_values()).context("publisher-version distribution")
    }

    /// Gini coefficients and Lorenz curves of the surviving affiliations.
    /// Fails when either distribution has no coefficient.
    pub fn summarize(&self) -> Result<AffiliationSummary> {
        let gini_preprint = self.gini_preprint()?;
        let gini_published = self.gini_published()?;
        let preprint = self.preprint_values();
        let published = self.published_values();

        Ok(AffiliationSummary {
            gini_preprint,
            gini_published,
            num_articles: self.num_articles(),
            num_affiliations: self.num_affiliations(),
            lorenz_preprint: LorenzCurve::from_values(&preprint),
            lorenz_published: LorenzCurve::from_values(&published),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AffiliationSummary {
    pub gini_preprint: f64,
    pub gini_published: f64,
    pub num_articles: f64,
    pub num_affiliations: usize,
    pub lorenz_preprint: LorenzCurve,
    pub lorenz_published: LorenzCurve,
}
