//! Raster chart rendering.
//!
//! Every chart is split in two steps: a pure `geometry` pass that turns the
//! selected series into ranges, polylines and bar rectangles, and a drawing
//! pass that hands that geometry to plotters. Rendering the same chart twice
//! therefore produces identical images.

use std::{ops::Range, path::Path};

use eyre::{Context, Result};
use plotters::{prelude::*, style::RGBColor};
use tracing::debug;

use crate::{
    config::{Settings, StageRange},
    style::{LineStyle, Marker, NEUTRAL, SeriesStyle, Stroke},
};

const FONT: &str = "sans-serif";
const TITLE_FONT_SIZE: u32 = 28;
const AXIS_LABEL_FONT_SIZE: u32 = 20;
const TICK_LABEL_FONT_SIZE: u32 = 16;
const LEGEND_FONT_SIZE: u32 = 16;

const MARKER_SIZE: i32 = 5;
const LINE_WIDTH: u32 = 2;

/// Share of a category slot covered by the bars of one group
pub const GROUP_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesSpec {
    pub label: String,
    /// `(stage_count, value)` sorted by stage count
    pub points: Vec<(u32, f64)>,
    pub style: SeriesStyle,
    pub stroke: Stroke,
}

/// Ideal-behaviour line drawn behind the data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceLine {
    /// `y = x`, ideal linear speedup
    Identity,
    /// `y = c`, e.g. ideal efficiency of 1.0
    Constant(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YAxis {
    /// From zero up to the largest value plus headroom
    FromZero,
    /// At least `min..max`, widened when data falls outside
    Window { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub series: Vec<LineSeriesSpec>,
    pub reference: ReferenceLine,
    pub reference_label: String,
    pub y_axis: YAxis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub ticks: Vec<u32>,
    /// Visible points of each series, in series order
    pub series: Vec<Vec<(f64, f64)>>,
    pub reference: Vec<(f64, f64)>,
}

impl LineChart {
    pub fn geometry(&self, stages: StageRange) -> LineGeometry {
        let ticks = stages.ticks();
        let x_range = (stages.min as f64 - 0.5)..(stages.max as f64 + 0.5);

        // Points outside the configured stage range are not drawn
        let series = self
            .series
            .iter()
            .map(|spec| {
                spec.points
                    .iter()
                    .filter(|(stage_count, value)| {
                        stages.contains(*stage_count) && value.is_finite()
                    })
                    .map(|&(stage_count, value)| (stage_count as f64, value))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let reference = match self.reference {
            ReferenceLine::Identity => ticks.iter().map(|&n| (n as f64, n as f64)).collect(),
            ReferenceLine::Constant(y) => vec![(x_range.start, y), (x_range.end, y)],
        };

        let values = series
            .iter()
            .flatten()
            .chain(reference.iter())
            .map(|&(_, y)| y);
        let y_range = match self.y_axis {
            YAxis::FromZero => {
                let max = values.fold(0.0_f64, f64::max);
                0.0..(max * 1.1).max(1.0)
            }
            YAxis::Window { min, max } => values.fold(min..max, |range, y| {
                let start = if y < range.start { y - 0.05 } else { range.start };
                let end = if y > range.end { y + 0.05 } else { range.end };
                start..end
            }),
        };

        LineGeometry {
            x_range,
            y_range,
            ticks,
            series,
            reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeriesSpec {
    pub label: String,
    /// One value per category; zero marks a missing combination
    pub values: Vec<f64>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeriesSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub series: usize,
    pub category: usize,
    pub left: f64,
    pub right: f64,
    /// Zero for a missing value, drawn with no height
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub x_range: Range<f64>,
    /// Logarithmic y range, always strictly positive
    pub y_range: Range<f64>,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn geometry(&self) -> BarGeometry {
        let groups = self.series.len().max(1) as f64;
        let width = GROUP_WIDTH / groups;
        let categories = self.categories.len();

        let bars = self
            .series
            .iter()
            .enumerate()
            .flat_map(|(index, series)| {
                let offset = (index as f64 - groups / 2.0 + 0.5) * width;
                series
                    .values
                    .iter()
                    .take(categories)
                    .enumerate()
                    .map(move |(category, &value)| {
                        let center = category as f64 + offset;
                        Bar {
                            series: index,
                            category,
                            left: center - width / 2.0,
                            right: center + width / 2.0,
                            value: if value.is_finite() && value > 0.0 {
                                value
                            } else {
                                0.0
                            },
                        }
                    })
            })
            .collect::<Vec<_>>();

        let (low, high) = bars
            .iter()
            .map(|bar| bar.value)
            .filter(|value| *value > 0.0)
            .fold((f64::MAX, 0.0_f64), |(low, high), value| {
                (low.min(value), high.max(value))
            });
        let y_range = if high > 0.0 {
            (low / 2.0)..(high * 2.0)
        } else {
            0.1..1.0
        };

        BarGeometry {
            x_range: -0.5..(categories as f64 - 0.5),
            y_range,
            bars,
        }
    }
}

fn stage_label(x: f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{}", x.round() as i64)
    } else {
        String::new()
    }
}

fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > 0.3 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

macro_rules! draw_markers {
    ($ctx:expr, $points:expr, $shape:expr) => {
        $ctx.draw_series($points.iter().map(|&point| EmptyElement::at(point) + $shape))?
    };
}

pub fn render_line_chart(chart: &LineChart, settings: &Settings, path: &Path) -> Result<()> {
    let geometry = chart.geometry(settings.stage_range);
    debug!(
        "Line chart {}: {} series, y range {:?}",
        path.display(),
        geometry.series.len(),
        geometry.y_range
    );
    draw_line_chart(chart, &geometry, settings, path)
        .wrap_err_with(|| format!("Rendering {}", path.display()))
}

fn draw_line_chart(
    chart: &LineChart,
    geometry: &LineGeometry,
    settings: &Settings,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(geometry.x_range.clone(), geometry.y_range.clone())?;

    ctx.configure_mesh()
        .x_labels(geometry.ticks.len())
        .x_label_formatter(&|x| stage_label(*x))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .label_style((FONT, TICK_LABEL_FONT_SIZE))
        .axis_desc_style((FONT, AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (spec, points) in chart.series.iter().zip(&geometry.series) {
        let color = spec.style.color.mix(spec.stroke.opacity);
        let line_style = color.stroke_width(LINE_WIDTH);
        let fill = color.filled();

        let anno = match spec.stroke.line {
            LineStyle::Solid => ctx.draw_series(LineSeries::new(points.clone(), line_style))?,
            LineStyle::Dashed => {
                ctx.draw_series(DashedLineSeries::new(points.clone(), 10, 6, line_style))?
            }
        };
        anno.label(spec.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        let s = MARKER_SIZE;
        match spec.style.marker {
            Marker::Circle => draw_markers!(ctx, points, Circle::new((0, 0), s, fill)),
            Marker::Square => draw_markers!(ctx, points, Rectangle::new([(-s, -s), (s, s)], fill)),
            Marker::Triangle => draw_markers!(ctx, points, TriangleMarker::new((0, 0), s + 1, fill)),
            Marker::Diamond => draw_markers!(
                ctx,
                points,
                Polygon::new(vec![(0, -s - 1), (s + 1, 0), (0, s + 1), (-s - 1, 0)], fill)
            ),
            Marker::Cross => draw_markers!(ctx, points, Cross::new((0, 0), s as u32, line_style)),
        };
    }

    // Legend entries follow draw order; the reference goes after the data series
    let reference_style = NEUTRAL.mix(0.5).stroke_width(LINE_WIDTH);
    ctx.draw_series(DashedLineSeries::new(
        geometry.reference.clone(),
        8,
        6,
        reference_style,
    ))?
    .label(chart.reference_label.as_str())
    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference_style));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

pub fn render_bar_chart(chart: &BarChart, settings: &Settings, path: &Path) -> Result<()> {
    let geometry = chart.geometry();
    debug!(
        "Bar chart {}: {} bars, y range {:?}",
        path.display(),
        geometry.bars.len(),
        geometry.y_range
    );
    draw_bar_chart(chart, &geometry, settings, path)
        .wrap_err_with(|| format!("Rendering {}", path.display()))
}

fn draw_bar_chart(
    chart: &BarChart,
    geometry: &BarGeometry,
    settings: &Settings,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            geometry.x_range.clone(),
            geometry.y_range.clone().log_scale(),
        )?;

    let categories = &chart.categories;
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&|x| category_label(categories, *x))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .label_style((FONT, TICK_LABEL_FONT_SIZE))
        .axis_desc_style((FONT, AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let baseline = geometry.y_range.start;
    for (index, series) in chart.series.iter().enumerate() {
        let fill = series.color.mix(0.85).filled();
        ctx.draw_series(
            geometry
                .bars
                .iter()
                .filter(|bar| bar.series == index && bar.value > 0.0)
                .map(|bar| Rectangle::new([(bar.left, baseline), (bar.right, bar.value)], fill)),
        )?
        .label(series.label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}
