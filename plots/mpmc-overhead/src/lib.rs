use common::{
    chart::{BarChart, BarSeriesSpec, render_bar_chart},
    config::Settings,
    plot::{Plot, PlotOutcome},
    style::palette_color,
    util::export_dataset,
};
use eyre::Result;
use plot_common::{
    load_overhead,
    select::{OverheadGroup, overhead_groups},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Grouped bars of queue overhead, one chart per stage count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverheadBasic {
    pub input: String,
}

impl Default for OverheadBasic {
    fn default() -> Self {
        Self {
            input: "benchmark_results.txt".to_owned(),
        }
    }
}

fn bar_chart(group: &OverheadGroup<'_>) -> BarChart {
    BarChart {
        title: format!("Queue Overhead (Zero Computation) - N={}", group.stage_count),
        x_desc: "Payload Size".to_owned(),
        y_desc: "Mean Time (ms) per 1000 messages".to_owned(),
        categories: group
            .payload_sizes
            .iter()
            .map(|size| format!("{size}B"))
            .collect(),
        series: group
            .queues
            .iter()
            .enumerate()
            .map(|(index, queue)| BarSeriesSpec {
                label: queue.queue_name.to_owned(),
                values: queue.mean_time_ms.clone(),
                color: palette_color(index),
            })
            .collect(),
    }
}

#[async_trait::async_trait]
#[typetag::serde]
impl Plot for OverheadBasic {
    fn inputs(&self) -> Vec<&str> {
        vec![&self.input]
    }

    async fn plot(&self, settings: &Settings) -> Result<Vec<PlotOutcome>> {
        let dataset = match load_overhead(settings, &self.input).await? {
            Ok(dataset) => dataset,
            Err(reason) => return Ok(vec![PlotOutcome::Skipped(reason)]),
        };
        export_dataset(settings, "overhead", &dataset).await?;

        let groups = overhead_groups(&dataset);
        debug!("{} stage counts in {}", groups.len(), self.input);

        let mut outcomes = Vec::new();
        for group in &groups {
            let path = settings
                .plot_dir
                .join(format!("overhead_N{}.png", group.stage_count));
            render_bar_chart(&bar_chart(group), settings, &path)?;
            outcomes.push(PlotOutcome::Generated(path));
        }
        Ok(outcomes)
    }
}
