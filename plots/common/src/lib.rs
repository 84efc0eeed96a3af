//! Loading and series helpers shared by the MPMC plot kinds.

pub mod select;

use common::{
    chart::{LineChart, LineSeriesSpec, ReferenceLine, YAxis, render_line_chart},
    config::Settings,
    dataset::Dataset,
    plot::{PlotOutcome, SkipReason},
    style::{Stroke, StyleTable},
    util::read_log,
};
use eyre::Result;
use mpmc::{OverheadRecord, ParsedLog, ScalabilityRecord, parse_output};
use tracing::debug;

use crate::select::CycleSeries;

/// Reads and parses `results_dir/<file>`.
///
/// The inner error says why there is nothing to plot: the file is missing or
/// `pick` found no records in it.
async fn load<R>(
    settings: &Settings,
    file: &str,
    pick: fn(ParsedLog) -> Dataset<R>,
) -> Result<Result<Dataset<R>, SkipReason>> {
    let path = settings.results_dir.join(file);
    let Some(text) = read_log(&path).await? else {
        return Ok(Err(SkipReason::MissingInput(path)));
    };
    let dataset = pick(parse_output(&text)?);
    debug!("Loaded {} rows from {}", dataset.len(), path.display());
    if dataset.is_empty() {
        return Ok(Err(SkipReason::NoData(path)));
    }
    Ok(Ok(dataset))
}

pub async fn load_scalability(
    settings: &Settings,
    file: &str,
) -> Result<Result<Dataset<ScalabilityRecord>, SkipReason>> {
    load(settings, file, |parsed| parsed.scalability).await
}

pub async fn load_overhead(
    settings: &Settings,
    file: &str,
) -> Result<Result<Dataset<OverheadRecord>, SkipReason>> {
    load(settings, file, |parsed| parsed.overhead).await
}

/// `100`, `2.5`: no trailing `.0` on whole milliseconds
pub fn format_ms(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

pub fn cycle_label(series: &CycleSeries<'_>) -> String {
    let label = format!("T = {} ms", format_ms(series.cycle_time_ms));
    match series.pinning {
        Some(pinning) => format!("{label} ({pinning})"),
        None => label,
    }
}

pub fn line_series(
    series: &CycleSeries<'_>,
    metric: fn(&ScalabilityRecord) -> f64,
    styles: &StyleTable,
) -> LineSeriesSpec {
    LineSeriesSpec {
        label: cycle_label(series),
        points: series.points(metric),
        style: styles.get(series.cycle_time_ms),
        stroke: Stroke::for_pinning(series.pinning),
    }
}

/// Renders `chart` as `plot_dir/<file_name>`, or skips it when it has no series
pub fn render_line(settings: &Settings, file_name: &str, chart: &LineChart) -> Result<PlotOutcome> {
    if chart.series.iter().all(|series| series.points.is_empty()) {
        return Ok(PlotOutcome::Skipped(SkipReason::EmptySelection(
            file_name.to_owned(),
        )));
    }
    let path = settings.plot_dir.join(file_name);
    render_line_chart(chart, settings, &path)?;
    Ok(PlotOutcome::Generated(path))
}

const STAGES_DESC: &str = "Number of Stages (N)";

/// Speedup per stage count, against the ideal `S(N) = N`
pub fn scalability_chart(
    title: String,
    series: &[CycleSeries<'_>],
    styles: &StyleTable,
) -> LineChart {
    LineChart {
        title,
        x_desc: STAGES_DESC.to_owned(),
        y_desc: "Relative Scalability S(N)".to_owned(),
        series: series
            .iter()
            .map(|series| line_series(series, |record| record.speedup, styles))
            .collect(),
        reference: ReferenceLine::Identity,
        reference_label: "Ideal S(N) = N".to_owned(),
        y_axis: YAxis::FromZero,
    }
}

/// Efficiency per stage count, against the ideal `E(N) = 1`
pub fn efficiency_chart(
    title: String,
    series: &[CycleSeries<'_>],
    styles: &StyleTable,
) -> LineChart {
    LineChart {
        title,
        x_desc: STAGES_DESC.to_owned(),
        y_desc: "Efficiency E(N)".to_owned(),
        series: series
            .iter()
            .map(|series| line_series(series, |record| record.efficiency, styles))
            .collect(),
        reference: ReferenceLine::Constant(1.0),
        reference_label: "Ideal".to_owned(),
        y_axis: YAxis::Window {
            min: 0.5,
            max: 1.05,
        },
    }
}
