use std::{
    fs::File,
    io::{BufReader, Write, stdin, stdout},
    path::Path,
};

use clap::ValueEnum;
use common::dataset::{Dataset, Tabular};
use eyre::{Context, Result};
use mpmc::{ParsedLog, result::parse_reader};
use serde_json::json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
    Csv,
}

/// Parses one log (`-` for stdin) and prints its records
pub fn parse_command(file: &Path, format: Format) -> Result<()> {
    let parsed = if file == Path::new("-") {
        parse_reader(stdin().lock())?
    } else {
        let handle = File::open(file).wrap_err_with(|| format!("Opening {}", file.display()))?;
        parse_reader(BufReader::new(handle))?
    };
    write_parsed(&parsed, format, stdout().lock())
}

pub fn write_parsed<W: Write>(parsed: &ParsedLog, format: Format, mut out: W) -> Result<()> {
    match format {
        Format::Table => {
            write_table("Scalability", &parsed.scalability, &mut out)?;
            write_table("Overhead", &parsed.overhead, &mut out)?;
        }
        Format::Json => {
            let value = json!({
                "scalability": parsed.scalability.records().collect::<Vec<_>>(),
                "overhead": parsed.overhead.records().collect::<Vec<_>>(),
            });
            serde_json::to_writer_pretty(&mut out, &value)?;
            writeln!(out)?;
        }
        Format::Csv => {
            if !parsed.scalability.is_empty() {
                parsed.scalability.write_csv(&mut out)?;
            }
            if !parsed.overhead.is_empty() {
                parsed.overhead.write_csv(&mut out)?;
            }
        }
    }
    Ok(())
}

fn write_table<R: Tabular, W: Write>(title: &str, dataset: &Dataset<R>, out: &mut W) -> Result<()> {
    writeln!(out, "{title}: {} records", dataset.len())?;
    if dataset.is_empty() {
        return Ok(());
    }
    let rows = dataset.records().map(R::fields).collect::<Vec<_>>();
    let widths = R::HEADER
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].len())
                .fold(name.len(), usize::max)
        })
        .collect::<Vec<_>>();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };
    writeln!(out, "{}", line(R::HEADER.to_vec()))?;
    for row in &rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}
