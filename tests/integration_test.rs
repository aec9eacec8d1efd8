use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

use citation_inequality::analysis::{AffiliationLevel, Metric};
use citation_inequality::cli::{
    AuthorsArgs, CommonArgs, LagArgs, LagBoundArgs, PlotLagArgs, SelectionArgs, TimelineArgs,
};
use citation_inequality::commands::{run_authors, run_lag, run_plot_lag, run_timeline};

const BIN: &str = env!("CARGO_BIN_EXE_citation-inequality");

/// Three qualifying single-author articles (preprint 2019-01, publisher
/// 2019-04) plus two that every run excludes
const RECORDS: [&str; 5] = [
    r#"{"month": "2019-01", "published_doi": "10.1234/a", "published_month": "2019-04",
        "author": {"authors": [{"author_order": 1, "corresp": false,
            "affiliations": [{"ror": {"ror_name": "InstA", "ror_country": "Japan"}}]}], "estimate": false},
        "oc": [{"creation_month": "2019-02", "cited_doi": "10.1101/2019.01.01.000001"},
               {"creation_month": "2019-02", "cited_doi": "10.1101/2019.01.01.000001"}]}"#,
    r#"{"month": "2019-01", "published_doi": "10.1234/b", "published_month": "2019-04",
        "author": {"authors": [{"author_order": 1, "corresp": false,
            "affiliations": [{"ror": {"ror_name": "InstB", "ror_country": "France"}}]}], "estimate": false},
        "oc": [{"creation_month": "2019-06", "cited_doi": "10.1234/b"}]}"#,
    r#"{"month": "2019-01", "published_doi": "10.1234/c", "published_month": "2019-04",
        "author": {"authors": [{"author_order": 1, "corresp": false,
            "affiliations": [{"ror": {"ror_name": "InstC", "ror_country": "Chile"}}]}], "estimate": false},
        "oc": []}"#,
    r#"{"month": "2019-01", "published_doi": null, "published_month": null,
        "author": {"authors": [{"author_order": 1, "corresp": true, "affiliations": []}], "estimate": false},
        "oc": [{"creation_month": "2019-03", "cited_doi": "10.1101/2019.01.01.000009"}]}"#,
    r#"{"month": "2020-01", "published_doi": "10.1234/e", "published_month": "2020-02",
        "author": {"authors": [{"author_order": 1, "corresp": true,
            "affiliations": [{"ror": {"ror_name": "InstA", "ror_country": "Japan"}}]}], "estimate": false},
        "oc": []}"#,
];

fn one_line(record: &str) -> String {
    record.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Create a gzip JSONL metadata file with a blank line in the middle
fn create_test_metadata_gz(dir: &Path) -> PathBuf {
    let path = dir.join("biorxiv_metadata-oc.jsonl.gz");
    let file = File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    for (i, record) in RECORDS.iter().enumerate() {
        writeln!(encoder, "{}", one_line(record)).unwrap();
        if i == 1 {
            writeln!(encoder).unwrap();
        }
    }
    encoder.finish().unwrap();
    path
}

fn common(dir: &Path, input: &Path) -> CommonArgs {
    CommonArgs {
        input: input.display().to_string(),
        latest_month: "2021-06".parse().unwrap(),
        max_months: 24,
        result_dir: dir.join("result").display().to_string(),
        figure_dir: dir.join("figure").display().to_string(),
        log_level: "WARN".to_string(),
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split('\t').map(String::from).collect())
        .collect()
}

#[test]
fn test_help() {
    for args in [
        vec!["--help"],
        vec!["ineq", "--help"],
        vec!["authors", "--help"],
        vec!["lag", "--help"],
        vec!["journals", "--help"],
        vec!["timeline", "--help"],
        vec!["plot-lag", "--help"],
        vec!["reproduce", "--help"],
    ] {
        let status = Command::new(BIN).args(&args).status().expect("Failed to run binary");
        assert!(status.success(), "{:?} should succeed", args);
    }
}

#[test]
fn test_ineq_end_to_end() {
    let dir = tempdir().unwrap();
    let input = create_test_metadata_gz(dir.path());
    let rows_path = dir.path().join("rows.tsv");
    let figure_dir = dir.path().join("figure");

    let output = Command::new(BIN)
        .args([
            "ineq",
            "--input",
            input.to_str().unwrap(),
            "--num-articles-min",
            "0",
            "--output",
            rows_path.to_str().unwrap(),
            "--figure-dir",
            figure_dir.to_str().unwrap(),
            "--log-level",
            "WARN",
        ])
        .output()
        .expect("Failed to run ineq");
    assert!(output.status.success(), "ineq should succeed: {}", String::from_utf8_lossy(&output.stderr));

    // Each distribution holds all of its citations in one of three affiliations
    let stdout = String::from_utf8(output.stdout).unwrap();
    let printed: Vec<&str> = stdout.trim().split('\t').collect();
    assert_eq!(printed[0], "first");
    let gini_preprint: f64 = printed[1].parse().unwrap();
    let gini_published: f64 = printed[2].parse().unwrap();
    assert!((gini_preprint - 2.0 / 3.0).abs() < 1e-12);
    assert!((gini_published - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(printed[3], "3.0");
    assert_eq!(printed[4], "3");

    let rows = read_rows(&rows_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], printed.iter().map(|s| s.to_string()).collect::<Vec<_>>());

    let figure = figure_dir.join("lorenz_first_institution_all_0-na_0_true_true_ln.svg");
    assert!(figure.exists(), "Lorenz figure should exist at {}", figure.display());
}

#[test]
fn test_ineq_fails_on_degenerate_selection() {
    let dir = tempdir().unwrap();
    let input = create_test_metadata_gz(dir.path());

    // No qualifying record has a corresponding author
    let status = Command::new(BIN)
        .args([
            "ineq",
            "--input",
            input.to_str().unwrap(),
            "--target-author",
            "corresp",
            "--num-articles-min",
            "0",
            "--no-fig",
            "--log-level",
            "ERROR",
        ])
        .status()
        .expect("Failed to run ineq");
    assert!(!status.success());
}

#[test]
fn test_malformed_line_aborts_with_line_number() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.jsonl");
    fs::write(&input, format!("{}\n{{not json\n", one_line(RECORDS[0]))).unwrap();

    let output = Command::new(BIN)
        .args(["ineq", "--input", input.to_str().unwrap(), "--no-fig", "--log-level", "ERROR"])
        .output()
        .expect("Failed to run ineq");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn test_authors_sweep_keeps_mode_order() {
    let dir = tempdir().unwrap();
    let input = create_test_metadata_gz(dir.path());

    let summary = run_authors(AuthorsArgs {
        common: common(dir.path(), &input),
        affiliation_level: AffiliationLevel::Country,
        target_journal: "all".to_string(),
        lag: LagBoundArgs::default(),
        num_articles_min: 0,
        selection: SelectionArgs::default(),
        threads: 2,
        no_fig: true,
    })
    .unwrap();

    assert!(summary.output.ends_with("gini_country_target-authors.tsv"));
    let rows = read_rows(&summary.output);
    let modes: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(modes, vec!["first", "last", "corresp", "all"]);

    // Single-author bylines: every mode but corresp sees the same three countries
    assert_eq!(rows[0][1..], rows[1][1..]);
    assert_eq!(rows[0][1..], rows[3][1..]);
    assert_eq!(rows[2][1], "NaN");
    assert_eq!(rows[2][2], "NaN");
    assert_eq!(rows[2][4], "0");
}

#[test]
fn test_authors_sweep_keeps_defined_coefficient() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("publisher_only.jsonl");
    let publisher_only = [
        r#"{"month": "2019-01", "published_doi": "10.1234/a", "published_month": "2019-04",
            "author": {"authors": [{"author_order": 1, "corresp": false,
                "affiliations": [{"ror": {"ror_name": "InstA", "ror_country": "Japan"}}]}], "estimate": false},
            "oc": []}"#,
        r#"{"month": "2019-01", "published_doi": "10.1234/b", "published_month": "2019-04",
            "author": {"authors": [{"author_order": 1, "corresp": false,
                "affiliations": [{"ror": {"ror_name": "InstB", "ror_country": "France"}}]}], "estimate": false},
            "oc": [{"creation_month": "2019-06", "cited_doi": "10.1234/b"},
                   {"creation_month": "2019-07", "cited_doi": "10.1234/b"},
                   {"creation_month": "2019-08", "cited_doi": "10.1234/b"}]}"#,
    ];
    let content: Vec<String> = publisher_only.iter().map(|r| one_line(r)).collect();
    fs::write(&input, content.join("\n")).unwrap();

    let summary = run_authors(AuthorsArgs {
        common: common(dir.path(), &input),
        affiliation_level: AffiliationLevel::Institution,
        target_journal: "all".to_string(),
        lag: LagBoundArgs::default(),
        num_articles_min: 0,
        selection: SelectionArgs::default(),
        threads: 1,
        no_fig: true,
    })
    .unwrap();

    // Publisher values [0, ln 4]; no preprint citations at all
    let first = &summary.rows[0];
    assert!(first.gini_preprint.is_nan());
    assert!((first.gini_published - 0.5).abs() < 1e-12);

    let rows = read_rows(&summary.output);
    assert_eq!(rows[0][1], "NaN");
    assert_eq!(rows[0][2], "0.5");
    assert_eq!(rows[0][3], "2.0");
}

#[test]
fn test_lag_sweep_and_plot() {
    let dir = tempdir().unwrap();
    let input = create_test_metadata_gz(dir.path());

    let summary = run_lag(LagArgs {
        common: common(dir.path(), &input),
        affiliation_level: AffiliationLevel::Institution,
        target_journal: "all".to_string(),
        num_articles_min: 0,
        selection: SelectionArgs::default(),
        threads: 0,
    })
    .unwrap();

    assert!(summary.output.ends_with("gini_institution_all_0.tsv"));
    let rows = read_rows(&summary.output);
    assert_eq!(rows.len(), 24);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[0], i.to_string());
        if i == 3 {
            assert_eq!(row[3], "3.0");
        } else {
            assert_eq!(row[1], "NaN");
        }
    }

    let figure = run_plot_lag(PlotLagArgs {
        input: summary.output.display().to_string(),
        figure_dir: dir.path().join("figure").display().to_string(),
        months: 19,
        log_level: "WARN".to_string(),
    })
    .unwrap();
    assert!(figure.ends_with("gini_institution_all_0.svg"));
    assert!(figure.exists());
}

#[test]
fn test_timeline_buckets() {
    let dir = tempdir().unwrap();
    let input = create_test_metadata_gz(dir.path());

    let report = run_timeline(TimelineArgs {
        common: common(dir.path(), &input),
        target_journal: "all".to_string(),
        lag: LagBoundArgs::default(),
        none_citation_included: true,
        metric: Metric::Ln,
        no_fig: false,
    })
    .unwrap();

    assert_eq!(report.num_articles(), 3);
    assert_eq!(report.buckets.len(), 25);
    assert_eq!(report.buckets[2].articles_preprint, 3);
    assert_eq!(report.buckets[3].articles_published, 3);
    assert_eq!(report.buckets[1].citations_preprint, 2);
    assert_eq!(report.buckets[5].citations_published, 1);
    assert_eq!(report.series[3].preprint, None);

    let table = dir.path().join("result").join("time_articles_citations.tsv");
    let rows = read_rows(&table);
    assert_eq!(rows.len(), 25);
    assert_eq!(rows[1][..5], ["1", "3", "0", "2", "0"]);
    assert_eq!(rows[3][7], "");
    assert!(dir.path().join("figure").join("time_articles_citations.svg").exists());
}

#[test]
fn test_plain_jsonl_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("metadata.jsonl");
    let content: Vec<String> = RECORDS.iter().map(|r| one_line(r)).collect();
    fs::write(&input, content.join("\n")).unwrap();

    let output = Command::new(BIN)
        .args([
            "ineq",
            "--input",
            input.to_str().unwrap(),
            "--affiliation-level",
            "country",
            "--num-articles-min",
            "0",
            "--no-fig",
            "--log-level",
            "ERROR",
        ])
        .output()
        .expect("Failed to run ineq");
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().ends_with("\t3.0\t3\n"));
}
