use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::inspect::Format;

mod inspect;
mod run;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every configured chart
    Plot {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: PathBuf,
    },
    /// Parse one benchmark log and print its records
    Parse {
        /// Log file, `-` for stdin
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Write the default configuration
    Init {
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("mpmc_plots={log_level}"));

    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }

    for module in default_plots::PLOT_MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    default_plots::init_plots();

    let res = match args.command {
        Commands::Plot { config_file } => run::plot_command(config_file).await,
        Commands::Parse { file, format } => inspect::parse_command(&file, format),
        Commands::Init { output } => run::init_command(output).await,
    };
    if let Err(err) = &res {
        error!("{err:#?}");
    }
    res
}
