//! Petling server binary
//!
//! Usage: `petling-server [config.ron]`. Without a config file the server
//! listens on 127.0.0.1:8080 and pushes snapshots every 5 seconds.

use petling_server::{serve, ServerConfig};
use std::path::Path;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load(Path::new(&path))?,
        None => ServerConfig::default(),
    };
    info!(?config, "starting petling server");

    serve(config).await?;
    Ok(())
}
