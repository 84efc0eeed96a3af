use common::config::{Config, Settings};
use mpmc_overhead::OverheadBasic;
use mpmc_pinning::PinningComparison;
use mpmc_scalability::ScalabilityBasic;
use tracing::debug;

/// Crates that log under their own target, for `EnvFilter` directives
pub const PLOT_MODULES: &[&str] = &[
    "common",
    "mpmc",
    "plot_common",
    "mpmc_scalability",
    "mpmc_overhead",
    "mpmc_pinning",
];

/// Serializes every plot kind once so their typetag registrations are linked in
pub fn init_plots() {
    for plot in default_config().plots {
        if let Err(err) = serde_json::to_string(&plot) {
            debug!("Registering {plot:?}: {err}");
        }
    }
}

/// The conventional three workflows over `results/`
pub fn default_config() -> Config {
    Config {
        name: "mpmc".to_owned(),
        settings: Settings::default(),
        plots: vec![
            Box::new(ScalabilityBasic::default()),
            Box::new(OverheadBasic::default()),
            Box::new(PinningComparison::default()),
        ],
    }
}
