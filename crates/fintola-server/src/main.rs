use std::process::ExitCode;

use clap::Parser;
use fintola_server::{logging, serve, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    logging::init();

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "fintola exited");
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
