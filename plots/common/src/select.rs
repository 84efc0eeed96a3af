//! Turns datasets into chart-ready series.
//!
//! Grouping never relies on dataset order except where noted (representative
//! queue and payload size of the efficiency charts); every series is sorted by
//! an explicit key.

use common::dataset::{Dataset, Pinning, Row};
use itertools::Itertools;
use mpmc::{OverheadRecord, ScalabilityRecord};

/// Payload size shown on efficiency charts whenever the run has it
pub const PREFERRED_PAYLOAD_SIZE: u64 = 64;

/// Series order within one cycle time; untagged rows come last
const PINNING_ORDER: [Option<Pinning>; 3] =
    [Some(Pinning::Pinned), Some(Pinning::NoPinning), None];

#[derive(Debug, Clone, PartialEq)]
pub struct CycleSeries<'a> {
    pub cycle_time_ms: f64,
    pub pinning: Option<Pinning>,
    /// Sorted ascending by stage count
    pub rows: Vec<&'a ScalabilityRecord>,
}

impl CycleSeries<'_> {
    pub fn points(&self, metric: fn(&ScalabilityRecord) -> f64) -> Vec<(u32, f64)> {
        self.rows
            .iter()
            .map(|record| (record.stage_count, metric(record)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadGroup<'a> {
    pub payload_size_bytes: u64,
    /// Descending cycle time
    pub series: Vec<CycleSeries<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencySelection<'a> {
    pub queue_name: &'a str,
    pub payload_size_bytes: u64,
    pub series: Vec<CycleSeries<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueBars<'a> {
    pub queue_name: &'a str,
    /// Mean time per payload size of the group, zero where the run is missing
    pub mean_time_ms: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverheadGroup<'a> {
    pub stage_count: u32,
    /// Ascending; shared by every group of the dataset
    pub payload_sizes: Vec<u64>,
    /// Sorted by queue name
    pub queues: Vec<QueueBars<'a>>,
}

/// Rows whose stages performed simulated work. Zero-sleep rows only measure
/// queue overhead and are left out of scalability and efficiency charts.
pub fn with_work(dataset: &Dataset<ScalabilityRecord>) -> Vec<&Row<ScalabilityRecord>> {
    dataset
        .iter()
        .filter(|row| row.record.sleep_per_stage_ms > 0.0)
        .collect()
}

/// One group per payload size, ascending
pub fn scalability_groups(dataset: &Dataset<ScalabilityRecord>) -> Vec<PayloadGroup<'_>> {
    let rows = with_work(dataset);
    rows.iter()
        .map(|row| row.record.payload_size_bytes)
        .unique()
        .sorted()
        .map(|payload_size_bytes| PayloadGroup {
            payload_size_bytes,
            series: cycle_series(
                rows.iter()
                    .copied()
                    .filter(|row| row.record.payload_size_bytes == payload_size_bytes),
            ),
        })
        .collect()
}

/// The group for one payload size, `None` when no row with work has that size
pub fn payload_group(
    dataset: &Dataset<ScalabilityRecord>,
    payload_size_bytes: u64,
) -> Option<PayloadGroup<'_>> {
    let series = cycle_series(
        with_work(dataset)
            .into_iter()
            .filter(|row| row.record.payload_size_bytes == payload_size_bytes),
    );
    (!series.is_empty()).then_some(PayloadGroup {
        payload_size_bytes,
        series,
    })
}

/// Series of a single queue and payload size.
///
/// The queue is the first one in the dataset, as the harness runs one queue per
/// efficiency sweep. The size is [`PREFERRED_PAYLOAD_SIZE`] if any row has it,
/// otherwise the first size seen.
pub fn efficiency_selection(
    dataset: &Dataset<ScalabilityRecord>,
) -> Option<EfficiencySelection<'_>> {
    let rows = with_work(dataset);
    let first = &rows.first().copied()?.record;
    let queue_name = first.queue_name.as_str();
    let payload_size_bytes = if rows
        .iter()
        .any(|row| row.record.payload_size_bytes == PREFERRED_PAYLOAD_SIZE)
    {
        PREFERRED_PAYLOAD_SIZE
    } else {
        first.payload_size_bytes
    };

    let series = cycle_series(rows.into_iter().filter(|row| {
        row.record.queue_name == queue_name && row.record.payload_size_bytes == payload_size_bytes
    }));
    (!series.is_empty()).then_some(EfficiencySelection {
        queue_name,
        payload_size_bytes,
        series,
    })
}

/// Splits rows into `(cycle time, pinning)` series, cycle time descending
fn cycle_series<'a>(
    rows: impl Iterator<Item = &'a Row<ScalabilityRecord>>,
) -> Vec<CycleSeries<'a>> {
    let rows = rows.collect::<Vec<_>>();
    let cycle_times = rows
        .iter()
        .map(|row| row.record.cycle_time_ms)
        .sorted_by(|a, b| b.total_cmp(a))
        .dedup()
        .collect::<Vec<_>>();

    let mut series = Vec::new();
    for cycle_time_ms in cycle_times {
        for pinning in PINNING_ORDER {
            let matching = rows
                .iter()
                .copied()
                .filter(|row| row.record.cycle_time_ms == cycle_time_ms && row.pinning == pinning)
                .map(|row| &row.record)
                .sorted_by_key(|record| record.stage_count)
                .collect::<Vec<_>>();
            if !matching.is_empty() {
                series.push(CycleSeries {
                    cycle_time_ms,
                    pinning,
                    rows: matching,
                });
            }
        }
    }
    series
}

/// One group per stage count, ascending. Every group has a bar slot for every
/// (queue, payload size) pair of the whole dataset.
pub fn overhead_groups(dataset: &Dataset<OverheadRecord>) -> Vec<OverheadGroup<'_>> {
    let payload_sizes = dataset
        .records()
        .map(|record| record.payload_size_bytes)
        .unique()
        .sorted()
        .collect::<Vec<_>>();
    let queues = dataset
        .records()
        .map(|record| record.queue_name.as_str())
        .unique()
        .sorted()
        .collect::<Vec<_>>();

    dataset
        .records()
        .map(|record| record.stage_count)
        .unique()
        .sorted()
        .map(|stage_count| OverheadGroup {
            stage_count,
            payload_sizes: payload_sizes.clone(),
            queues: queues
                .iter()
                .map(|&queue_name| QueueBars {
                    queue_name,
                    mean_time_ms: payload_sizes
                        .iter()
                        .map(|&size| {
                            dataset
                                .records()
                                .find(|record| {
                                    record.stage_count == stage_count
                                        && record.queue_name == queue_name
                                        && record.payload_size_bytes == size
                                })
                                .map_or(0.0, |record| record.mean_time_ms)
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
