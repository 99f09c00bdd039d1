pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod logging;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Parser;

/// Keep submission rows fresh by polling the broker for updates.
#[derive(Debug, Parser)]
#[command(name = "submission-poller", version)]
pub(crate) struct Cli {
    /// RON file listing the rows to poll and the polling settings.
    pub(crate) config: PathBuf,

    /// Where log records go.
    #[arg(long, value_enum, default_value_t = logging::LogDestination::Terminal)]
    pub(crate) log: logging::LogDestination,

    /// Overrides `base_url` from the config file.
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}
