use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

// Import from the library
use citation_inequality::analysis::{
    attribute, count_by_cited_doi, group_by_publication, AffiliationLevel, TargetAuthor,
};
use citation_inequality::common::YearMonth;
use citation_inequality::inequality::{gini, LorenzCurve};
use citation_inequality::record::ArticleRecord;

const INSTITUTIONS: [(&str, &str); 6] = [
    ("University of Tokyo", "Japan"),
    ("Harvard University", "United States"),
    ("University of Oxford", "United Kingdom"),
    ("Max Planck Society", "Germany"),
    ("Peking University", "China"),
    ("Institut Pasteur", "France"),
];

/// Deterministic synthetic record: `i` picks the byline and citation pattern
fn synthetic_record(i: usize) -> ArticleRecord {
    let num_authors = 1 + i % 8;
    let authors: Vec<String> = (0..num_authors)
        .map(|k| {
            let (name, country) = INSTITUTIONS[(i + k) % INSTITUTIONS.len()];
            let affiliation = if (i + k) % 11 == 0 {
                r#"{"ror": null}"#.to_string()
            } else {
                format!(r#"{{"ror": {{"ror_name": "{}", "ror_country": "{}"}}}}"#, name, country)
            };
            format!(
                r#"{{"author_order": {}, "corresp": {}, "affiliations": [{}]}}"#,
                k + 1,
                k == num_authors - 1,
                affiliation
            )
        })
        .collect();

    let citations: Vec<String> = (0..(i % 40))
        .map(|c| {
            let month = 1 + (c * 7 + i) % 12;
            let year = 2019 + (c % 3);
            let doi = if c % 3 == 0 { "10.1101/2019.01.01.000001" } else { "10.1038/s41586-019-0001-1" };
            format!(r#"{{"creation_month": "{}-{:02}", "cited_doi": "{}"}}"#, year, month, doi)
        })
        .collect();

    let json = format!(
        r#"{{"month": "2019-01", "published_doi": "10.1038/s41586-019-0001-1", "published_month": "2019-07",
            "author": {{"authors": [{}], "estimate": false}}, "oc": [{}]}}"#,
        authors.join(","),
        citations.join(",")
    );
    serde_json::from_str(&json).unwrap()
}

fn bench_attribution(c: &mut Criterion) {
    let records: Vec<ArticleRecord> = (0..1_000).map(synthetic_record).collect();

    let mut group = c.benchmark_group("attribution");
    group.throughput(Throughput::Elements(records.len() as u64));

    for mode in TargetAuthor::ALL_MODES {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| {
                for record in &records {
                    black_box(attribute(record, mode, AffiliationLevel::Institution));
                }
            })
        });
    }

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let records: Vec<ArticleRecord> = (0..1_000).map(synthetic_record).collect();
    let preprint: YearMonth = "2019-01".parse().unwrap();
    let published: YearMonth = "2019-07".parse().unwrap();

    let mut group = c.benchmark_group("classification");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("count_by_cited_doi", |b| {
        b.iter(|| {
            for record in &records {
                black_box(count_by_cited_doi(&record.oc, &preprint, 24));
            }
        })
    });

    group.bench_function("group_by_publication", |b| {
        b.iter(|| {
            for record in &records {
                black_box(group_by_publication(&record.oc, &preprint, &published, 24));
            }
        })
    });

    group.finish();
}

fn bench_gini(c: &mut Criterion) {
    let mut group = c.benchmark_group("inequality");

    for n in [100usize, 1_000, 5_000] {
        let values: Vec<f64> = (0..n).map(|i| ((i * 7919) % 1013) as f64 / 10.0).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("gini_{}", n), |b| {
            b.iter(|| black_box(gini(&values).unwrap()))
        });
        group.bench_function(format!("lorenz_{}", n), |b| {
            b.iter(|| black_box(LorenzCurve::from_values(&values)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_attribution, bench_classification, bench_gini);
criterion_main!(benches);
