use std::io::BufRead;

use common::dataset::{Dataset, Tabular};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::LogParser;

/// One row of a scalability run (stages with simulated work)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalabilityRecord {
    pub queue_name: String,
    pub payload_size_bytes: u64,
    pub cycle_time_ms: f64,
    pub stage_count: u32,
    /// Zero for pure-overhead runs
    pub sleep_per_stage_ms: f64,
    pub mean_time_ms: f64,
    pub throughput_msgs_per_sec: f64,
    pub efficiency: f64,
    pub speedup: f64,
}

/// One row of a zero-computation overhead run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverheadRecord {
    pub queue_name: String,
    pub stage_count: u32,
    pub payload_size_bytes: u64,
    pub mean_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub iterations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogRecord {
    Scalability(ScalabilityRecord),
    Overhead(OverheadRecord),
}

impl Tabular for ScalabilityRecord {
    const HEADER: &'static [&'static str] = &[
        "queue",
        "size_bytes",
        "t_ms",
        "n",
        "sleep_ms",
        "mean_ms",
        "throughput_msgs_per_sec",
        "efficiency",
        "speedup",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.queue_name.clone(),
            self.payload_size_bytes.to_string(),
            self.cycle_time_ms.to_string(),
            self.stage_count.to_string(),
            self.sleep_per_stage_ms.to_string(),
            self.mean_time_ms.to_string(),
            self.throughput_msgs_per_sec.to_string(),
            self.efficiency.to_string(),
            self.speedup.to_string(),
        ]
    }
}

impl Tabular for OverheadRecord {
    const HEADER: &'static [&'static str] = &[
        "queue",
        "n",
        "size_bytes",
        "mean_ms",
        "min_ms",
        "max_ms",
        "iters",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.queue_name.clone(),
            self.stage_count.to_string(),
            self.payload_size_bytes.to_string(),
            self.mean_time_ms.to_string(),
            self.min_time_ms.to_string(),
            self.max_time_ms.to_string(),
            self.iterations.to_string(),
        ]
    }
}

/// Records of one log file, split by schema, in line order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub scalability: Dataset<ScalabilityRecord>,
    pub overhead: Dataset<OverheadRecord>,
}

impl ParsedLog {
    pub fn push(&mut self, record: LogRecord) {
        match record {
            LogRecord::Scalability(record) => self.scalability.push(record),
            LogRecord::Overhead(record) => self.overhead.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.scalability.len() + self.overhead.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses the full text of one log file. Unrecognized lines are skipped.
pub fn parse_output(output: &str) -> Result<ParsedLog> {
    parse_reader(output.as_bytes())
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedLog> {
    let mut parser = LogParser::new()?;
    let mut parsed = ParsedLog::default();
    for line in reader.lines() {
        if let Some(record) = parser.feed(&line?) {
            parsed.push(record);
        }
    }
    debug!(
        "Parsed {} scalability and {} overhead records",
        parsed.scalability.len(),
        parsed.overhead.len()
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALABILITY_LOG: &str = "\
==== Pipeline scalability ====
N= 2, SleepPerStage= 100.0 ms -> mean: 1.0 ms, B: 1.0 msg/s, E(N): 1.0, S(N): 2.0
Queue: MPMC_V2
--- Size=64B, T=100.0ms ---
  N= 1, SleepPerStage= 0.0 ms -> mean: 100.3 ms, B: 9.97 msg/s, E(N): 1.000, S(N): 1.000
  N= 2, SleepPerStage= 50.0 ms -> mean: 52.1 ms, B: 19.19 msg/s, E(N): 0.962, S(N): 1.925
  some verbose harness output
--- Size=512B, T=25.0ms ---
  N= 20, SleepPerStage= 1.25 ms -> mean: 2.1 ms, B: 476.1 msg/s, E(N): 0.601, S(N): 12.02
";

    #[test]
    fn combined_header_sets_size_and_cycle_time() {
        let parsed = parse_output(SCALABILITY_LOG).unwrap();
        assert!(parsed.overhead.is_empty());
        let records = parsed.scalability.records().collect::<Vec<_>>();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].queue_name, "MPMC_V2");
        assert_eq!(records[0].payload_size_bytes, 64);
        assert_eq!(records[0].cycle_time_ms, 100.0);
        assert_eq!(records[0].sleep_per_stage_ms, 0.0);
        assert_eq!(
            records[1],
            &ScalabilityRecord {
                queue_name: "MPMC_V2".to_owned(),
                payload_size_bytes: 64,
                cycle_time_ms: 100.0,
                stage_count: 2,
                sleep_per_stage_ms: 50.0,
                mean_time_ms: 52.1,
                throughput_msgs_per_sec: 19.19,
                efficiency: 0.962,
                speedup: 1.925,
            }
        );
        // Off-range stage counts are still records
        assert_eq!(records[2].stage_count, 20);
        assert_eq!(records[2].payload_size_bytes, 512);
        assert_eq!(records[2].cycle_time_ms, 25.0);
    }

    #[test]
    fn overhead_scenario() {
        let parsed = parse_output(
            "Queue: MPMC_V2\n  N= 3 , Size= 64 B   -> mean: 1.644 ms , min: 1.0 ms, max: 2.0 ms, iters: 500\n",
        )
        .unwrap();
        assert_eq!(
            parsed.overhead.records().collect::<Vec<_>>(),
            vec![&OverheadRecord {
                queue_name: "MPMC_V2".to_owned(),
                stage_count: 3,
                payload_size_bytes: 64,
                mean_time_ms: 1.644,
                min_time_ms: 1.0,
                max_time_ms: 2.0,
                iterations: 500,
            }]
        );
    }

    #[test]
    fn legacy_overhead_log() {
        let log = "\
Zero computation benchmark
1. MPMC_naif (BlockingSpinLock + List)
  N=2,  Size=8B      -> mean:   0.548 ms  min: 0.500 ms  max: 0.700 ms  iters: 1000
2. MPMC_V2 (lock free ring)
  N=2,  Size=8B      -> mean:   0.120 ms  min: 0.100 ms  max: 0.200 ms  iters: 1000
";
        let parsed = parse_output(log).unwrap();
        let queues = parsed
            .overhead
            .records()
            .map(|r| r.queue_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(queues, vec!["MPMC_naif", "MPMC_V2"]);
    }

    #[test]
    fn lines_before_any_queue_are_dropped() {
        let parsed = parse_output(
            "  N= 3 , Size= 64 B   -> mean: 1.644 ms , min: 1.0 ms, max: 2.0 ms, iters: 500\n",
        )
        .unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse_output("").unwrap().is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(
            parse_output(SCALABILITY_LOG).unwrap(),
            parse_output(SCALABILITY_LOG).unwrap()
        );
    }

    #[test]
    fn reader_and_string_agree() {
        let from_reader = parse_reader(SCALABILITY_LOG.as_bytes()).unwrap();
        assert_eq!(from_reader, parse_output(SCALABILITY_LOG).unwrap());
    }

    #[test]
    fn csv_columns_follow_header() {
        let parsed = parse_output(SCALABILITY_LOG).unwrap();
        let mut out = Vec::new();
        parsed.scalability.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("queue,size_bytes,t_ms,n,sleep_ms,mean_ms,throughput_msgs_per_sec,efficiency,speedup")
        );
        assert_eq!(lines.next(), Some("MPMC_V2,64,100,1,0,100.3,9.97,1,1"));
    }
}
