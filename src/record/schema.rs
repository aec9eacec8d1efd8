use serde::Deserialize;

use crate::common::YearMonth;

/// DOI prefix of bioRxiv / medRxiv preprints
pub const PREPRINT_DOI_PREFIX: &str = "10.1101";

/// One preprint and (optionally) its linked publisher version
#[derive(Deserialize, Debug, Clone)]
pub struct ArticleRecord {
    /// Month the preprint was posted
    pub month: YearMonth,
    #[serde(default)]
    pub published_doi: Option<String>,
    /// Kept raw: an unparsable value only disqualifies this record
    #[serde(default)]
    pub published_month: Option<String>,
    #[serde(default)]
    pub published_journalissnl: Option<String>,
    pub author: AuthorList,
    /// Citation events (OpenCitations)
    #[serde(default)]
    pub oc: Vec<Citation>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AuthorList {
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Author data was inferred rather than observed
    #[serde(default)]
    pub estimate: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Author {
    /// 1-based position in the byline
    pub author_order: usize,
    #[serde(default)]
    pub corresp: bool,
    #[serde(default)]
    pub affiliations: Vec<Affiliation>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Affiliation {
    #[serde(default)]
    pub ror: Option<RorEntry>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RorEntry {
    #[serde(default)]
    pub ror_name: Option<String>,
    #[serde(default)]
    pub ror_country: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Citation {
    /// "YYYY" or "YYYY-MM"; anything else drops the citation
    #[serde(default)]
    pub creation_month: Option<String>,
    #[serde(default)]
    pub cited_doi: Option<String>,
}

impl Citation {
    /// A citation without a cited DOI counts for the publisher version
    pub fn cites_preprint(&self) -> bool {
        self.cited_doi
            .as_deref()
            .map_or(false, |doi| doi.starts_with(PREPRINT_DOI_PREFIX))
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.creation_month
            .as_deref()
            .and_then(YearMonth::parse_lenient)
    }
}

impl ArticleRecord {
    pub fn publisher_month(&self) -> Option<YearMonth> {
        self.published_month.as_deref().and_then(|m| m.parse().ok())
    }
}
