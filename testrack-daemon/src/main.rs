use anyhow::Result;
use clap::Parser;

use testrack_daemon::cli::DaemonCli;
use testrack_daemon::logging;
use testrack_daemon::server::Server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let config = cli.load_config().await?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_addr = %config.server.listen_addr,
        port = config.server.port,
        "testrack-daemon starting"
    );

    let server = Server::build_from_config(config)?;
    server.run().await?;

    tracing::info!("testrack-daemon shut down");
    Ok(())
}
