use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use super::tsv::LagRow;
use crate::analysis::{AffiliationSummary, Metric, TimelineReport};
use crate::inequality::LorenzCurve;

const PREPRINT_COLOR: RGBColor = RED;
const PUBLISHED_COLOR: RGBColor = BLUE;

/// Headroom above the largest finite value, or 1.0 when there is none
fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

fn lorenz_points(curve: &LorenzCurve, label: &str) -> Result<Vec<(f64, f64)>> {
    curve
        .points()
        .ok_or_else(|| anyhow!("Lorenz curve for {} has a zero total", label))
}

/// Both Lorenz curves on the unit square
pub fn render_lorenz(out_path: &Path, summary: &AffiliationSummary) -> Result<()> {
    let preprint = lorenz_points(&summary.lorenz_preprint, "preprints")?;
    let published = lorenz_points(&summary.lorenz_published, "publisher versions")?;

    let root = SVGBackend::new(out_path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0f64..1.0f64, 0.0f64..1.0f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("cumulative share of affiliations")
        .y_desc("cumulative share of citations")
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (1.0, 1.0)],
        BLACK.mix(0.15),
    )))?;

    chart
        .draw_series(LineSeries::new(preprint, &PREPRINT_COLOR))?
        .label("preprint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PREPRINT_COLOR));
    chart
        .draw_series(LineSeries::new(published, &PUBLISHED_COLOR))?
        .label("publisher version")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PUBLISHED_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Ln => "mean of ln(citations + 1)",
        Metric::ArithmeticMean => "mean citations",
        Metric::Total => "citations",
    }
}

/// Citation metric per month above stacked article counts
pub fn render_timeline(out_path: &Path, report: &TimelineReport) -> Result<()> {
    let months = report.buckets.len();
    let x_range = -1.0f64..months as f64;

    let preprint: Vec<(f64, f64)> = report
        .series
        .iter()
        .filter_map(|m| m.preprint.map(|v| (m.offset as f64, v)))
        .collect();
    let published: Vec<(f64, f64)> = report
        .series
        .iter()
        .filter_map(|m| m.published.map(|v| (m.offset as f64, v)))
        .collect();
    let metric_max = upper_bound(preprint.iter().chain(&published).map(|(_, y)| *y));
    let articles_max = upper_bound(
        report
            .buckets
            .iter()
            .map(|b| (b.articles_preprint + b.articles_published) as f64),
    );

    let root = SVGBackend::new(out_path, (1000, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));

    let mut chart_metric = ChartBuilder::on(&panels[0])
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), 0.0f64..metric_max)?;

    chart_metric
        .configure_mesh()
        .y_desc(metric_label(report.params.metric))
        .draw()?;

    chart_metric
        .draw_series(LineSeries::new(preprint, &PREPRINT_COLOR))?
        .label("preprint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PREPRINT_COLOR));
    chart_metric
        .draw_series(LineSeries::new(published, &PUBLISHED_COLOR))?
        .label("publisher version")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PUBLISHED_COLOR));

    chart_metric
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    let mut chart_articles = ChartBuilder::on(&panels[1])
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0f64..articles_max)?;

    chart_articles
        .configure_mesh()
        .x_desc("months after preprint publication")
        .y_desc("number of articles")
        .draw()?;

    let half_width = 0.175;
    chart_articles.draw_series(report.buckets.iter().enumerate().map(|(i, b)| {
        let x = i as f64;
        Rectangle::new(
            [(x - half_width, 0.0), (x + half_width, b.articles_preprint as f64)],
            PREPRINT_COLOR.filled(),
        )
    }))?;
    chart_articles.draw_series(report.buckets.iter().enumerate().map(|(i, b)| {
        let x = i as f64;
        let bottom = b.articles_preprint as f64;
        Rectangle::new(
            [(x - half_width, bottom), (x + half_width, bottom + b.articles_published as f64)],
            PUBLISHED_COLOR.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Gini lines, article credit and affiliation counts against publication lag
pub fn render_lag(out_path: &Path, rows: &[LagRow]) -> Result<()> {
    let x_max = rows.iter().map(|r| r.months).max().unwrap_or(0) as f64 + 1.0;
    let x_range = -1.0f64..x_max;

    let gini_preprint: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r.gini_preprint.is_finite())
        .map(|r| (r.months as f64, r.gini_preprint))
        .collect();
    let gini_published: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r.gini_published.is_finite())
        .map(|r| (r.months as f64, r.gini_published))
        .collect();
    let gini_max = upper_bound(
        gini_preprint
            .iter()
            .chain(&gini_published)
            .map(|(_, y)| *y),
    );
    let articles_max = upper_bound(rows.iter().map(|r| r.num_articles));
    let affiliations_max = upper_bound(rows.iter().map(|r| r.num_affiliations as f64));

    let root = SVGBackend::new(out_path, (800, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 1));

    let mut chart_gini = ChartBuilder::on(&panels[0])
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), 0.0f64..gini_max)?;
    chart_gini
        .configure_mesh()
        .y_desc("Gini coefficient")
        .draw()?;
    chart_gini
        .draw_series(LineSeries::new(gini_preprint, &PREPRINT_COLOR))?
        .label("preprint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PREPRINT_COLOR));
    chart_gini
        .draw_series(LineSeries::new(gini_published, &PUBLISHED_COLOR))?
        .label("publisher version")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PUBLISHED_COLOR));
    chart_gini
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    let half_width = 0.125;

    let mut chart_articles = ChartBuilder::on(&panels[1])
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), 0.0f64..articles_max)?;
    chart_articles
        .configure_mesh()
        .y_desc("number of articles")
        .draw()?;
    chart_articles.draw_series(rows.iter().map(|r| {
        let x = r.months as f64;
        Rectangle::new([(x - half_width, 0.0), (x + half_width, r.num_articles)], GREEN.filled())
    }))?;

    let mut chart_affiliations = ChartBuilder::on(&panels[2])
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0f64..affiliations_max)?;
    chart_affiliations
        .configure_mesh()
        .x_desc("months from preprint to publisher version")
        .y_desc("number of affiliations")
        .draw()?;
    chart_affiliations.draw_series(rows.iter().map(|r| {
        let x = r.months as f64;
        Rectangle::new(
            [(x - half_width, 0.0), (x + half_width, r.num_affiliations as f64)],
            BLACK.mix(0.4).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
