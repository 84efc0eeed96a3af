use std::path::{Path, PathBuf};

use common::{
    config::Config,
    plot::{PlotOutcome, plot},
    util::ensure_dirs,
};
use eyre::{Context, Result};
use tokio::fs::{read_to_string, try_exists, write};
use tracing::{debug, warn};

/// Reads `config_file`, or falls back to the conventional plots when it does not exist
pub async fn load_config(config_file: &Path) -> Result<Config> {
    if !try_exists(config_file).await? {
        warn!(
            "{} not found, using the default plots",
            config_file.display()
        );
        return Ok(default_plots::default_config());
    }
    let text = read_to_string(config_file)
        .await
        .wrap_err_with(|| format!("Reading {}", config_file.display()))?;
    serde_yml::from_str(&text).wrap_err_with(|| format!("Parsing {}", config_file.display()))
}

pub async fn run_plots(config: &Config) -> Result<Vec<PlotOutcome>> {
    debug!("Running {} plots of {}", config.plots.len(), config.name);
    ensure_dirs(&[config.settings.plot_dir.clone()])
        .await
        .wrap_err("Creating plot directory")?;
    Ok(plot(&config.plots, &config.settings).await)
}

pub fn summary(outcomes: &[PlotOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|outcome| match outcome {
            PlotOutcome::Generated(path) => format!("  Generated {}", path.display()),
            PlotOutcome::Skipped(reason) => format!("  {reason}"),
        })
        .collect()
}

pub async fn plot_command(config_file: PathBuf) -> Result<()> {
    let config = load_config(&config_file).await?;
    let outcomes = run_plots(&config).await?;
    for line in summary(&outcomes) {
        println!("{line}");
    }
    let generated = outcomes.iter().filter(|o| o.is_generated()).count();
    println!(
        "Done, {generated} charts in {}",
        config.settings.plot_dir.display()
    );
    Ok(())
}

pub async fn init_command(output: PathBuf) -> Result<()> {
    if try_exists(&output).await? {
        eyre::bail!("{} already exists", output.display());
    }
    let yaml = serde_yml::to_string(&default_plots::default_config())?;
    write(&output, yaml)
        .await
        .wrap_err_with(|| format!("Writing {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
