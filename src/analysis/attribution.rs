use std::collections::BTreeMap;

use super::params::{AffiliationLevel, TargetAuthor};
use crate::record::{Affiliation, ArticleRecord, Author};

/// Key that collects credit for authors without a resolvable affiliation
pub const UNKNOWN_AFFILIATION: &str = "unknown";

/// Result of reading an affiliation key at the requested level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationLookup<'a> {
    Found(&'a str),
    Absent,
}

pub fn lookup_affiliation(affiliation: &Affiliation, level: AffiliationLevel) -> AffiliationLookup<'_> {
    let ror = match &affiliation.ror {
        Some(ror) => ror,
        None => return AffiliationLookup::Absent,
    };
    let key = match level {
        AffiliationLevel::Institution => ror.ror_name.as_deref(),
        AffiliationLevel::Country => ror.ror_country.as_deref(),
    };
    match key {
        Some(key) => AffiliationLookup::Found(key),
        None => AffiliationLookup::Absent,
    }
}

/// Fractional credit of one record, keyed by affiliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    weights: BTreeMap<String, f64>,
}

impl Attribution {
    fn credit(&mut self, lookup: AffiliationLookup<'_>, weight: f64) {
        let key = match lookup {
            AffiliationLookup::Found(key) => key,
            AffiliationLookup::Absent => UNKNOWN_AFFILIATION,
        };
        *self.weights.entry(key.to_string()).or_insert(0.0) += weight;
    }

    /// Spread `share` evenly over the author's affiliations
    fn credit_author(&mut self, author: &Author, share: f64, level: AffiliationLevel) {
        if author.affiliations.is_empty() {
            self.credit(AffiliationLookup::Absent, share);
            return;
        }
        let per_affiliation = share / author.affiliations.len() as f64;
        for affiliation in &author.affiliations {
            self.credit(lookup_affiliation(affiliation, level), per_affiliation);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// The single author credited under a role-based mode; first match wins
fn select_author(authors: &[Author], target: TargetAuthor) -> Option<&Author> {
    let num_authors = authors.len();
    authors.iter().find(|author| match target {
        TargetAuthor::First => author.author_order == 1,
        TargetAuthor::Last => author.author_order == num_authors,
        TargetAuthor::Corresp => author.corresp,
        TargetAuthor::All => false,
    })
}

/// Split one unit of credit for `record` across affiliations.
///
/// Returns `None` when a role-based mode finds no matching author.
pub fn attribute(
    record: &ArticleRecord,
    target: TargetAuthor,
    level: AffiliationLevel,
) -> Option<Attribution> {
    let authors = &record.author.authors;
    let mut attribution = Attribution::default();

    match target {
        TargetAuthor::All => {
            if authors.is_empty() {
                return None;
            }
            let share = 1.0 / authors.len() as f64;
            for author in authors {
                attribution.credit_author(author, share, level);
            }
        }
        _ => {
            let author = select_author(authors, target)?;
            attribution.credit_author(author, 1.0, level);
        }
    }

    Some(attribution)
}
