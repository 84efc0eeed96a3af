use core::fmt::Debug;
use std::path::PathBuf;

use dyn_clone::{DynClone, clone_trait_object};
use eyre::Result;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Settings;

/// Why a chart (or a whole plot) produced no image. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("{} not found, skipping", .0.display())]
    MissingInput(PathBuf),
    #[error("No data parsed from {}", .0.display())]
    NoData(PathBuf),
    #[error("{0}: no rows after filtering, skipping")]
    EmptySelection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    Generated(PathBuf),
    Skipped(SkipReason),
}

impl PlotOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, PlotOutcome::Generated(_))
    }
}

#[typetag::serde(tag = "type")]
#[async_trait::async_trait]
pub trait Plot: Debug + DynClone + Send + Sync {
    /// Log files read by this plot, relative to `settings.results_dir`
    fn inputs(&self) -> Vec<&str>;

    /// Parses the inputs and renders every chart of this plot into `settings.plot_dir`
    ///
    /// Missing inputs and empty selections are reported as [`PlotOutcome::Skipped`];
    /// only I/O and drawing failures are returned as errors.
    async fn plot(&self, settings: &Settings) -> Result<Vec<PlotOutcome>>;
}
clone_trait_object!(Plot);

/// Runs every plot in order. A failing plot is logged and does not stop the others.
pub async fn plot(plots: &[Box<dyn Plot>], settings: &Settings) -> Vec<PlotOutcome> {
    if plots.is_empty() {
        debug!("No plots");
        return Vec::new();
    }

    let mut outcomes = Vec::new();
    for plot in plots {
        debug!("Plotting {plot:?}");
        match plot.plot(settings).await {
            Ok(results) => {
                for outcome in &results {
                    match outcome {
                        PlotOutcome::Generated(path) => info!("Generated {}", path.display()),
                        PlotOutcome::Skipped(reason) => warn!("{reason}"),
                    }
                }
                outcomes.extend(results);
            }
            Err(err) => error!("Plot {:?} failed: {err:#?}", plot.inputs()),
        }
    }
    outcomes
}
