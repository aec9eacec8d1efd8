//! Citation timing and classification.
//!
//! Two schemes exist and serve different aggregations:
//! - [`count_by_cited_doi`] classifies each citation by the DOI it points to
//!   and feeds the per-affiliation totals;
//! - [`group_by_publication`] groups citations by creation month and
//!   classifies each group by whether the publisher version already existed,
//!   feeding the per-month time series.

use std::collections::BTreeMap;

use crate::common::{diff_month, YearMonth};
use crate::record::Citation;

/// Which version of an article a citation is counted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitedVersion {
    Preprint,
    Published,
}

/// ln(count + 1)
pub fn log_count(count: u32) -> f64 {
    (count as f64 + 1.0).ln()
}

/// Creation month and offset from the preprint month, when the citation has
/// a readable month inside [0, max_months]
fn citation_offset(
    citation: &Citation,
    preprint_month: &YearMonth,
    max_months: i32,
) -> Option<(YearMonth, i32)> {
    let month = citation.month()?;
    let offset = diff_month(&month, preprint_month);
    if offset < 0 || offset > max_months {
        return None;
    }
    Some((month, offset))
}

/// Per-record citation totals under the cited-DOI scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CitationCounts {
    pub preprint: u32,
    pub published: u32,
}

impl CitationCounts {
    pub fn preprint_ln(&self) -> f64 {
        log_count(self.preprint)
    }

    pub fn published_ln(&self) -> f64 {
        log_count(self.published)
    }
}

/// Count citations inside the observation window, split by whether the
/// cited DOI is the preprint's
pub fn count_by_cited_doi(
    citations: &[Citation],
    preprint_month: &YearMonth,
    max_months: i32,
) -> CitationCounts {
    let mut counts = CitationCounts::default();
    for citation in citations {
        if citation_offset(citation, preprint_month, max_months).is_none() {
            continue;
        }
        if citation.cites_preprint() {
            counts.preprint += 1;
        } else {
            counts.published += 1;
        }
    }
    counts
}

/// Citations sharing one creation month, classified as a whole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthGroup {
    pub month: YearMonth,
    /// Months since the preprint, in [0, max_months]
    pub offset: usize,
    pub count: u32,
    pub version: CitedVersion,
}

impl MonthGroup {
    pub fn count_ln(&self) -> f64 {
        log_count(self.count)
    }
}

/// Group in-window citations by creation month. A group counts for the
/// publisher version when its month is strictly after the publisher month,
/// otherwise for the preprint. Groups come back in month order.
pub fn group_by_publication(
    citations: &[Citation],
    preprint_month: &YearMonth,
    published_month: &YearMonth,
    max_months: i32,
) -> Vec<MonthGroup> {
    let mut groups: BTreeMap<YearMonth, (i32, u32)> = BTreeMap::new();
    for citation in citations {
        if let Some((month, offset)) = citation_offset(citation, preprint_month, max_months) {
            groups.entry(month).or_insert((offset, 0)).1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(month, (offset, count))| {
            let version = if diff_month(&month, published_month) > 0 {
                CitedVersion::Published
            } else {
                CitedVersion::Preprint
            };
            MonthGroup {
                month,
                offset: offset as usize,
                count,
                version,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn cite(month: Option<&str>, doi: &str) -> Citation {
        Citation {
            creation_month: month.map(String::from),
            cited_doi: Some(doi.to_string()),
        }
    }

    const PREPRINT: &str = "10.1101/2019.01.01.000001";
    const PUBLISHED: &str = "10.1038/s41586-019-0001-1";

    #[test]
    fn test_single_preprint_citation() {
        let citations = vec![cite(Some("2019-03"), PREPRINT)];
        let counts = count_by_cited_doi(&citations, &ym("2019-01"), 24);
        assert_eq!(counts, CitationCounts { preprint: 1, published: 0 });
        assert_eq!(counts.preprint_ln(), 2f64.ln());
        assert_eq!(counts.published_ln(), 0.0);

        let groups = group_by_publication(&citations, &ym("2019-01"), &ym("2019-07"), 24);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].offset, 2);
        assert_eq!(groups[0].version, CitedVersion::Preprint);
    }

    #[test]
    fn test_window_bounds() {
        let citations = vec![
            cite(Some("2018-12"), PREPRINT), // before the preprint
            cite(Some("2019-01"), PREPRINT), // offset 0
            cite(Some("2021-01"), PUBLISHED), // offset 24
            cite(Some("2021-02"), PUBLISHED), // offset 25
        ];
        let counts = count_by_cited_doi(&citations, &ym("2019-01"), 24);
        assert_eq!(counts, CitationCounts { preprint: 1, published: 1 });
    }

    #[test]
    fn test_unparsable_citations_are_skipped() {
        let citations = vec![
            cite(None, PREPRINT),
            cite(Some("n/a"), PREPRINT),
            cite(Some("2019-02-14"), PREPRINT),
            cite(Some("2019"), PUBLISHED), // read as 2019-01
        ];
        let counts = count_by_cited_doi(&citations, &ym("2019-01"), 24);
        assert_eq!(counts, CitationCounts { preprint: 0, published: 1 });
    }

    #[test]
    fn test_grouping_classifies_by_publisher_month() {
        // Cited DOI plays no part in this scheme
        let citations = vec![
            cite(Some("2019-03"), PUBLISHED),
            cite(Some("2019-03"), PREPRINT),
            cite(Some("2019-07"), PUBLISHED), // same month as publication
            cite(Some("2019-08"), PREPRINT),
            cite(Some("2019-08"), PREPRINT),
            cite(Some("2019-08"), PUBLISHED),
        ];
        let groups = group_by_publication(&citations, &ym("2019-01"), &ym("2019-07"), 24);

        assert_eq!(groups.len(), 3);
        assert_eq!((groups[0].offset, groups[0].count), (2, 2));
        assert_eq!(groups[0].version, CitedVersion::Preprint);
        assert_eq!((groups[1].offset, groups[1].count), (6, 1));
        assert_eq!(groups[1].version, CitedVersion::Preprint);
        assert_eq!((groups[2].offset, groups[2].count), (7, 3));
        assert_eq!(groups[2].version, CitedVersion::Published);
        assert_eq!(groups[2].count_ln(), 4f64.ln());
    }

    #[test]
    fn test_schemes_classify_differently() {
        // A citation to the publisher DOI before publication
        let citations = vec![cite(Some("2019-02"), PUBLISHED)];
        let counts = count_by_cited_doi(&citations, &ym("2019-01"), 24);
        assert_eq!(counts.published, 1);

        let groups = group_by_publication(&citations, &ym("2019-01"), &ym("2019-07"), 24);
        assert_eq!(groups[0].version, CitedVersion::Preprint);
    }

    #[test]
    fn test_grouping_respects_window() {
        let citations = vec![
            cite(Some("2018-11"), PREPRINT),
            cite(Some("2021-02"), PUBLISHED),
            cite(Some("bad"), PUBLISHED),
        ];
        assert!(group_by_publication(&citations, &ym("2019-01"), &ym("2019-07"), 24).is_empty());
    }
}
