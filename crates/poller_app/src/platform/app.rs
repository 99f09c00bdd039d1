use std::sync::Arc;

use poller_engine::{
    ChannelEventSink, FetchError, PollerEngine, PollerEvent, ReqwestSubmissionFetcher,
};
use poller_logging::poller_info;

use super::config::{ConfigError, PollerConfig};
use super::render::render_row;
use super::Cli;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot build http client: {0}")]
    Client(#[from] FetchError),
    #[error("cannot listen for ctrl-c: {0}")]
    Signal(#[from] std::io::Error),
}

/// Plays the hosting page: loads the rows, starts one poller per row and
/// prints each refreshed row until Ctrl-C.
pub(crate) async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = PollerConfig::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    config.validate()?;

    let fetcher = ReqwestSubmissionFetcher::new(config.fetch_settings())?;
    let (sink, mut events) = ChannelEventSink::channel();
    let engine = PollerEngine::new(Arc::new(fetcher), Arc::new(sink), config.timing());

    poller_info!(
        "Polling {} every {} ms (backoff {} min)",
        config.base_url,
        config.poll_interval_ms,
        config.backoff_minutes
    );
    let pollers = engine.initialize(config.rows());
    for view in pollers.views() {
        println!("{}", render_row(&view));
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            signal = &mut shutdown => {
                poller_info!("Ctrl-C received, stopping pollers");
                break signal.map_err(AppError::from);
            }
            event = events.recv() => match event {
                Some(PollerEvent::RowUpdated(view)) => println!("{}", render_row(&view)),
                // Both are already logged by the row's poller.
                Some(PollerEvent::PollFailed { .. } | PollerEvent::Stopped { .. }) => {}
                None => break Ok(()),
            },
        }
    };

    pollers.shutdown().await;
    outcome
}
