use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::plot::Plot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    #[serde(default)]
    pub settings: Settings,
    pub plots: Vec<Box<dyn Plot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the harness logs are read from
    pub results_dir: PathBuf,
    /// Directory images (and `plot_data/` exports) are written to
    pub plot_dir: PathBuf,
    pub stage_range: StageRange,
    pub width: u32,
    pub height: u32,
    /// Write every parsed dataset as CSV next to the images
    pub export_data: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            plot_dir: PathBuf::from("plots"),
            stage_range: StageRange::default(),
            width: 1500,
            height: 900,
            export_data: false,
        }
    }
}

impl Settings {
    pub fn plot_data_dir(&self) -> PathBuf {
        self.plot_dir.join("plot_data")
    }
}

/// Inclusive range of stage counts shown on the x axis of line charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRange {
    pub min: u32,
    pub max: u32,
}

impl Default for StageRange {
    fn default() -> Self {
        Self { min: 2, max: 12 }
    }
}

impl StageRange {
    pub fn contains(&self, stage_count: u32) -> bool {
        (self.min..=self.max).contains(&stage_count)
    }

    pub fn ticks(&self) -> Vec<u32> {
        (self.min..=self.max).collect()
    }
}
