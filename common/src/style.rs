use plotters::style::RGBColor;

use crate::dataset::Pinning;

pub const NEUTRAL: RGBColor = RGBColor(128, 128, 128);

/// Bar colors, assigned by queue index and wrapping around
pub const QUEUE_PALETTE: [RGBColor; 5] = [
    RGBColor(231, 76, 60),
    RGBColor(52, 152, 219),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(230, 126, 34),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: Marker,
}

impl SeriesStyle {
    pub const FALLBACK: SeriesStyle = SeriesStyle {
        color: NEUTRAL,
        marker: Marker::Circle,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub line: LineStyle,
    pub opacity: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            line: LineStyle::Solid,
            opacity: 1.0,
        }
    }
}

impl Stroke {
    /// Pinned runs are drawn solid and opaque, unpinned ones dashed and faded
    pub fn for_pinning(pinning: Option<Pinning>) -> Self {
        match pinning {
            Some(Pinning::NoPinning) => Stroke {
                line: LineStyle::Dashed,
                opacity: 0.7,
            },
            Some(Pinning::Pinned) | None => Stroke::default(),
        }
    }
}

/// Series styles keyed by cycle time, with a fallback for unknown keys
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    entries: Vec<(f64, SeriesStyle)>,
    fallback: SeriesStyle,
}

impl StyleTable {
    pub fn new(entries: Vec<(f64, SeriesStyle)>, fallback: SeriesStyle) -> Self {
        Self { entries, fallback }
    }

    /// Cycle times of the main scalability sweep
    pub fn cycle_times() -> Self {
        Self::new(
            vec![
                (100.0, style(44, 62, 80, Marker::Circle)),
                (50.0, style(41, 128, 185, Marker::Square)),
                (25.0, style(39, 174, 96, Marker::Triangle)),
                (10.0, style(230, 126, 34, Marker::Diamond)),
                (5.0, style(231, 76, 60, Marker::Cross)),
            ],
            SeriesStyle::FALLBACK,
        )
    }

    /// Cycle times of the small-T pinning sweep, all drawn with circles
    pub fn small_cycle_times() -> Self {
        Self::new(
            vec![
                (2.0, style(41, 128, 185, Marker::Circle)),
                (1.0, style(231, 76, 60, Marker::Circle)),
            ],
            SeriesStyle::FALLBACK,
        )
    }

    pub fn get(&self, cycle_time_ms: f64) -> SeriesStyle {
        self.entries
            .iter()
            .find(|(key, _)| *key == cycle_time_ms)
            .map(|(_, style)| *style)
            .unwrap_or(self.fallback)
    }
}

pub fn palette_color(index: usize) -> RGBColor {
    QUEUE_PALETTE[index % QUEUE_PALETTE.len()]
}

const fn style(r: u8, g: u8, b: u8, marker: Marker) -> SeriesStyle {
    SeriesStyle {
        color: RGBColor(r, g, b),
        marker,
    }
}
