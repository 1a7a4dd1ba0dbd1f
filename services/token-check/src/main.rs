use std::process::ExitCode;

use clap::Parser;
use edtoken_obs::{service_span, ObsInit};
use token_check::{Cli, SERVICE_NAME};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    ObsInit::init(SERVICE_NAME).map_err(|err| -> Box<dyn std::error::Error> { Box::new(err) })?;
    let _span = service_span(SERVICE_NAME).entered();

    let cli = Cli::parse();
    tracing::debug!(event = "service_start", version = VERSION, "starting");

    let accepted = token_check::run(&cli, std::io::stdin().lock())?;
    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
