//! Record and parameter fixtures shared by the analysis tests.

use super::params::*;
use crate::record::{Affiliation, ArticleRecord, Author, AuthorList, Citation, RorEntry};

pub fn criteria() -> FilterCriteria {
    FilterCriteria {
        latest_month: "2021-06".parse().unwrap(),
        max_months: 24,
        target_journal: JournalFilter::All,
        lag_min: Some(0),
        lag_max: None,
        target_author: TargetAuthor::First,
        none_citation_included: true,
    }
}

pub fn sample_params() -> AffiliationParams {
    AffiliationParams {
        criteria: criteria(),
        affiliation_level: AffiliationLevel::Institution,
        num_articles_min: 5,
        unknown_excluded: true,
        metric: Metric::Ln,
    }
}

/// (institution, country) pairs
pub fn affiliations(pairs: &[(&str, &str)]) -> Vec<Affiliation> {
    pairs
        .iter()
        .map(|(name, country)| Affiliation {
            ror: Some(RorEntry {
                ror_name: Some(name.to_string()),
                ror_country: Some(country.to_string()),
            }),
        })
        .collect()
}

pub struct RecordBuilder {
    record: ArticleRecord,
}

impl RecordBuilder {
    /// Preprint posted in `month`, published in `published`
    pub fn new(month: &str, published: &str) -> Self {
        Self {
            record: ArticleRecord {
                month: month.parse().unwrap(),
                published_doi: Some("10.1234/published".to_string()),
                published_month: Some(published.to_string()),
                published_journalissnl: None,
                author: AuthorList::default(),
                oc: Vec::new(),
            },
        }
    }

    pub fn no_published_doi(mut self) -> Self {
        self.record.published_doi = None;
        self
    }

    pub fn published_month(mut self, raw: Option<&str>) -> Self {
        self.record.published_month = raw.map(String::from);
        self
    }

    pub fn journal(mut self, issnl: &str) -> Self {
        self.record.published_journalissnl = Some(issnl.to_string());
        self
    }

    pub fn estimated(mut self) -> Self {
        self.record.author.estimate = true;
        self
    }

    pub fn author(self, order: usize, corresp: bool, pairs: &[(&str, &str)]) -> Self {
        self.raw_author(order, corresp, affiliations(pairs))
    }

    pub fn raw_author(mut self, order: usize, corresp: bool, affiliations: Vec<Affiliation>) -> Self {
        self.record.author.authors.push(Author {
            author_order: order,
            corresp,
            affiliations,
        });
        self
    }

    pub fn citation(mut self, creation_month: &str, cited_doi: &str) -> Self {
        self.record.oc.push(Citation {
            creation_month: Some(creation_month.to_string()),
            cited_doi: Some(cited_doi.to_string()),
        });
        self
    }

    pub fn build(self) -> ArticleRecord {
        self.record
    }
}
