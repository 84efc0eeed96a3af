use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use futures::future::join_all;
use tokio::fs::{create_dir_all, read};

use crate::{
    config::Settings,
    dataset::{Dataset, Tabular},
};

pub async fn ensure_dirs(dirs: &[PathBuf]) -> Result<()> {
    let create_jobs = dirs.iter().map(create_dir_all);
    for res in join_all(create_jobs).await {
        res?;
    }
    Ok(())
}

/// Reads a harness log, `None` if the file does not exist.
///
/// Invalid UTF-8 is replaced rather than rejected; such lines simply fail to match.
pub async fn read_log(path: &Path) -> Result<Option<String>> {
    match read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).wrap_err_with(|| format!("Reading {}", path.display())),
    }
}

/// Writes `dataset` to `plot_data/<stem>.csv` when exports are enabled
pub async fn export_dataset<R: Tabular>(
    settings: &Settings,
    stem: &str,
    dataset: &Dataset<R>,
) -> Result<Option<PathBuf>> {
    if !settings.export_data {
        return Ok(None);
    }
    let dir = settings.plot_data_dir();
    ensure_dirs(std::slice::from_ref(&dir)).await?;
    let path = dir.join(format!("{stem}.csv"));
    dataset.save_csv(&path)?;
    Ok(Some(path))
}
