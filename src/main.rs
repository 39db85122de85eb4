//! searchlink-node - standalone embedded search node
//!
//! Bootstraps the embedded node in a dedicated process and serves until
//! interrupted. Meant for standalone deployments and local development
//! against a real transport.

use anyhow::Result;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use searchlink::embedded::{EmbeddedNodeManager, DEFAULT_CLUSTER_NAME, DEFAULT_HOST};

/// Standalone embedded search node
#[derive(Parser, Debug)]
#[command(name = "searchlink-node")]
#[command(version, about, long_about = None)]
struct Args {
    /// Cluster name the node reports
    #[arg(long, default_value = DEFAULT_CLUSTER_NAME)]
    cluster_name: String,

    /// Bind host for the transport listener
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Bind port for the transport listener (0 picks an ephemeral port)
    #[arg(long, default_value_t = 9200)]
    port: u16,

    /// Expose the external-access transport (bind the given host instead of
    /// loopback only)
    #[arg(long)]
    external: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.quiet);

    let manager = EmbeddedNodeManager::new();
    manager.start(&args.cluster_name, &args.host, args.port, args.external)?;

    let port = manager.bound_port().unwrap_or(args.port);
    println!(
        "Embedded node for cluster '{}' listening on port {}",
        args.cluster_name, port
    );

    let runtime = Runtime::new()?;
    runtime.block_on(tokio::signal::ctrl_c())?;

    info!("Shutdown signal received");
    manager.stop();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
