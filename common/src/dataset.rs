use std::{fmt, fs::File, io::Write, path::Path, slice::Iter};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Whether the benchmark threads were bound to specific cores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pinning {
    Pinned,
    #[serde(rename = "No Pinning")]
    NoPinning,
}

impl Pinning {
    pub fn label(&self) -> &'static str {
        match self {
            Pinning::Pinned => "Pinned",
            Pinning::NoPinning => "No Pinning",
        }
    }
}

impl fmt::Display for Pinning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records that can be written as a CSV row
pub trait Tabular {
    const HEADER: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<R> {
    pub record: R,
    pub pinning: Option<Pinning>,
}

/// Rows of one record schema in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    rows: Vec<Row<R>>,
}

impl<R> Default for Dataset<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> FromIterator<R> for Dataset<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|record| Row {
                    record,
                    pinning: None,
                })
                .collect(),
        }
    }
}

impl<R> Dataset<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: R) {
        self.rows.push(Row {
            record,
            pinning: None,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    pub fn iter(&self) -> Iter<'_, Row<R>> {
        self.rows.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().map(|row| &row.record)
    }

    /// Attaches `pinning` to every row, replacing any earlier tag
    pub fn tagged(mut self, pinning: Pinning) -> Self {
        for row in &mut self.rows {
            row.pinning = Some(pinning);
        }
        self
    }

    /// Rows of `self` followed by the rows of `other`
    pub fn concat(mut self, other: Dataset<R>) -> Self {
        self.rows.extend(other.rows);
        self
    }

    /// Combined dataset for the pinned vs. unpinned comparison, unpinned rows first
    pub fn pinning_comparison(unpinned: Dataset<R>, pinned: Dataset<R>) -> Self {
        unpinned
            .tagged(Pinning::NoPinning)
            .concat(pinned.tagged(Pinning::Pinned))
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a Row<R>;
    type IntoIter = Iter<'a, Row<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R: Tabular> Dataset<R> {
    /// Writes a header and one line per row; a `pinning` column is added when any row is tagged
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let tagged = self.rows.iter().any(|row| row.pinning.is_some());
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = R::HEADER.to_vec();
        if tagged {
            header.push("pinning");
        }
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut fields = row.record.fields();
            if tagged {
                fields.push(row.pinning.map(|p| p.label()).unwrap_or("").to_owned());
            }
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path).wrap_err_with(|| format!("Creating {}", path.display()))?;
        self.write_csv(file)
            .wrap_err_with(|| format!("Writing {}", path.display()))
    }
}
