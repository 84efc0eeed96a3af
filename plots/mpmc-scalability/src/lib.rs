use common::{
    config::Settings,
    plot::{Plot, PlotOutcome, SkipReason},
    style::StyleTable,
    util::export_dataset,
};
use eyre::Result;
use plot_common::{
    efficiency_chart, load_scalability, render_line, scalability_chart,
    select::{efficiency_selection, scalability_groups},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const EFFICIENCY_FILE: &str = "efficiency_degradation.png";

/// Speedup chart per payload size plus one efficiency chart, from one
/// scalability log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalabilityBasic {
    /// Log file relative to the results directory
    pub input: String,
}

impl Default for ScalabilityBasic {
    fn default() -> Self {
        Self {
            input: "scalability_results.txt".to_owned(),
        }
    }
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for ScalabilityBasic {
    fn inputs(&self) -> Vec<&str> {
        vec![&self.input]
    }

    async fn plot(&self, settings: &Settings) -> Result<Vec<PlotOutcome>> {
        let dataset = match load_scalability(settings, &self.input).await? {
            Ok(dataset) => dataset,
            Err(reason) => return Ok(vec![PlotOutcome::Skipped(reason)]),
        };
        export_dataset(settings, "scalability", &dataset).await?;

        let styles = StyleTable::cycle_times();
        let groups = scalability_groups(&dataset);
        debug!("{} payload sizes in {}", groups.len(), self.input);

        let mut outcomes = Vec::new();
        if groups.is_empty() {
            outcomes.push(PlotOutcome::Skipped(SkipReason::EmptySelection(format!(
                "{}: scalability",
                self.input
            ))));
        }
        for group in &groups {
            let chart = scalability_chart(
                format!("Pipeline Scalability - Payload {}B", group.payload_size_bytes),
                &group.series,
                &styles,
            );
            let file_name = format!("scalability_{}B.png", group.payload_size_bytes);
            outcomes.push(render_line(settings, &file_name, &chart)?);
        }

        match efficiency_selection(&dataset) {
            Some(selection) => {
                let chart = efficiency_chart(
                    format!(
                        "Efficiency Degradation vs. Computation Time ({}, Payload {}B)",
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
