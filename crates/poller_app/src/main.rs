mod platform;

use std::process::ExitCode;

use clap::Parser;
use poller_logging::poller_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = platform::Cli::parse();
    platform::logging::initialize(cli.log);

    match platform::app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            poller_error!("{}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
