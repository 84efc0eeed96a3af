//! Small cycle time runs with and without core pinning, drawn on shared charts.

use common::{
    config::Settings,
    dataset::Dataset,
    plot::{Plot, PlotOutcome, SkipReason},
    style::StyleTable,
    util::export_dataset,
};
use eyre::Result;
use mpmc::ScalabilityRecord;
use plot_common::{
    efficiency_chart, load_scalability, render_line, scalability_chart,
    select::{efficiency_selection, payload_group},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const EFFICIENCY_FILE: &str = "efficiency_small_t.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinningComparison {
    pub pinned: String,
    pub unpinned: String,
    /// Payload sizes that get a speedup chart
    #[serde(default = "default_sizes")]
    pub sizes: Vec<u64>,
}

fn default_sizes() -> Vec<u64> {
    vec![8, 64, 512, 4096]
}

impl Default for PinningComparison {
    fn default() -> Self {
        Self {
            pinned: "scalability_small_t_with_pinning.txt".to_owned(),
            unpinned: "scalability_small_t_no_pinning.txt".to_owned(),
            sizes: default_sizes(),
        }
    }
}

/// A missing or empty side is reported and compared as an empty dataset
async fn load_side(
    settings: &Settings,
    file: &str,
    outcomes: &mut Vec<PlotOutcome>,
) -> Result<Dataset<ScalabilityRecord>> {
    Ok(match load_scalability(settings, file).await? {
        Ok(dataset) => dataset,
        Err(reason) => {
            outcomes.push(PlotOutcome::Skipped(reason));
            Dataset::new()
        }
    })
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for PinningComparison {
    fn inputs(&self) -> Vec<&str> {
        vec![&self.unpinned, &self.pinned]
    }

    async fn plot(&self, settings: &Settings) -> Result<Vec<PlotOutcome>> {
        let mut outcomes = Vec::new();
        let unpinned = load_side(settings, &self.unpinned, &mut outcomes).await?;
        let pinned = load_side(settings, &self.pinned, &mut outcomes).await?;

        let dataset = Dataset::pinning_comparison(unpinned, pinned);
        if dataset.is_empty() {
            warn!("No small cycle time runs to compare");
            return Ok(outcomes);
        }
        export_dataset(settings, "scalability_small_t", &dataset).await?;

        let styles = StyleTable::small_cycle_times();
        for &size in &self.sizes {
            let file_name = format!("scalability_small_t_{size}B.png");
            let Some(group) = payload_group(&dataset, size) else {
                debug!("No {size}B rows with work");
                outcomes.push(PlotOutcome::Skipped(SkipReason::EmptySelection(file_name)));
                continue;
            };
            let chart = scalability_chart(
                format!("Pipeline Scalability - Payload {size}B (Small T)"),
                &group.series,
                &styles,
            );
            outcomes.push(render_line(settings, &file_name, &chart)?);
        }

        match efficiency_selection(&dataset) {
            Some(selection) => {
                let chart = efficiency_chart(
                    format!(
                        "Efficiency Degradation vs. Computation Time (Small T) ({}, Payload {}B)",
                        selection.queue_name, selection.payload_size_bytes
                    ),
                    &selection.series,
                    &styles,
                );
                outcomes.push(render_line(settings, EFFICIENCY_FILE, &chart)?);
            }
            None => outcomes.push(PlotOutcome::Skipped(SkipReason::EmptySelection(
                EFFICIENCY_FILE.to_owned(),
            ))),
        }
        Ok(outcomes)
    }
}
