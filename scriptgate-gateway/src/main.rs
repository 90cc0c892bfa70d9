//! Entry point for the `scriptgate` HTTP server.

use clap::Parser;
use scriptgate_gateway::{
    config::{Args, GatewayConfig},
    server, telemetry,
};

#[tokio::main]
async fn main() {
    let config = GatewayConfig::from(Args::parse());

    let guard = match telemetry::init(&config.log_file) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(config, server::shutdown_signal()).await {
        tracing::error!(error = %e, "failed to start");
        drop(guard);
        std::process::exit(1);
    }
}
