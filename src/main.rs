use std::sync::Arc;

use args::Args;
use clap::Parser;
use log::info;
use rustedbytes_isofs::server::{Server, ServerConfig};

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parsing degli argomenti da linea di comando
    let args = Args::parse();

    env_logger::builder().filter_level(args.log_level).init();

    let server_config = Arc::new(ServerConfig {
        host: args.host,
        port: args.port,
        read_only: args.read_only,
    });

    if server_config.read_only {
        info!("file system is read-only");
    }

    let server = Server::new(server_config)?;

    info!(
        "Starting card reader on {}:{}",
        server.config.host, server.config.port
    );

    server.run().await
}
