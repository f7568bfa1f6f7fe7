use netsort::node::runner::{NodeConfig, SortNode};
use netsort::topology::config::Topology;
use netsort::topology::types::NodeId;

use anyhow::Context;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 5 {
        eprintln!(
            "Usage: {} {{serverId}} {{inputFilePath}} {{outputFilePath}} {{configFilePath}}",
            args[0]
        );
        eprintln!("Example: {} 0 input-0.dat output-0.dat servers.yaml", args[0]);
        std::process::exit(1);
    }

    let server_id: u32 = args[1]
        .parse()
        .with_context(|| format!("Invalid serverId {:?}, must be an int", args[1]))?;
    let input = PathBuf::from(&args[2]);
    let output = PathBuf::from(&args[3]);

    let topology = Topology::load(&args[4])?;
    tracing::info!("My server id: {}", server_id);
    for node in topology.nodes() {
        tracing::info!("  - {} at {}", node.id, node.addr());
    }

    let node = SortNode::new(NodeConfig::new(NodeId(server_id), topology))?;

    tracing::info!("Sorting {} to {}", input.display(), output.display());
    let summary = node.run(&input, &output).await?;

    tracing::info!(
        "Done: read {}, sent {}, wrote {} record(s)",
        summary.records_read,
        summary.records_sent,
        summary.records_written
    );

    Ok(())
}
