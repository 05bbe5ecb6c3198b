#![forbid(unsafe_code)]
//! AIN JSON-RPC node: in-memory chain served over HTTP

use ain_rpc::api::{run_rpc_server, RpcNode};
use ain_rpc::config::{load_config, DEFAULT_CONFIG_PATH};
use ain_rpc::node::Node;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "ain-rpc-node", about = "Serve the AIN JSON-RPC surface")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of demo blocks forged at startup
    #[arg(long, default_value_t = 0)]
    demo_blocks: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut config = load_config(&args.config)?;

    // Explicit flag wins over PORT, which wins over the file
    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        config.server.port = port;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let level = config
        .server
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let node = Node::init(config)?;
    node.seed_demo_blocks(args.demo_blocks)?;

    let addr = node.rpc_addr()?;
    let rpc = Arc::new(RpcNode::new(node.registry.clone()));
    run_rpc_server(rpc, addr).await?;

    Ok(())
}
