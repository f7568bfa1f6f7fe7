//! Sort Node Runner
//!
//! Drives one node through a complete run: read shard, partition, exchange, sort, write.
//!
//! ## Ordering
//! 1. The listener is bound before any sender is spawned, so this node is ready to
//!    accept as soon as it starts dialing. Peers that are not up yet are retried.
//! 2. Senders run concurrently with the assembly loop; the run completes only once
//!    every peer's sentinel arrived *and* every outbound stream was delivered.
//! 3. A single-node cluster never touches the network.

use crate::exchange::assembly::Assembly;
use crate::exchange::dialer::{DialPolicy, ExchangeDialer, wait_all};
use crate::exchange::listener::ExchangeListener;
use crate::partition::partitioner::Partitioner;
use crate::record::types::Record;
use crate::sorter::local::{read_records, sort_and_write};
use crate::topology::config::Topology;
use crate::topology::types::NodeId;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything a node needs to know, fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_id: NodeId,
    pub topology: Arc<Topology>,
    pub dial: DialPolicy,
}

impl NodeConfig {
    pub fn new(node_id: NodeId, topology: Topology) -> Self {
        Self {
            node_id,
            topology: Arc::new(topology),
            dial: DialPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_sent: usize,
    pub records_written: usize,
}

pub struct SortNode {
    config: NodeConfig,
    partitioner: Partitioner,
}

impl SortNode {
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.topology.node(config.node_id)?;
        let partitioner = Partitioner::new(config.topology.len())?;

        Ok(Self {
            config,
            partitioner,
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.config.node_id
    }

    fn peer_count(&self) -> usize {
        self.config.topology.len() - 1
    }

    /// Runs the whole pipeline, binding this node's configured address.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let records = read_records(input).await?;

        if self.peer_count() == 0 {
            return self.run_local(records, output).await;
        }

        let addr = self.config.topology.node(self.config.node_id)?.addr();
        let listener = ExchangeListener::bind(&addr).await?;
        self.run_distributed(listener, records, output).await
    }

    /// Runs the pipeline using an already bound listener.
    pub async fn run_with_listener(
        &self,
        listener: ExchangeListener,
        input: &Path,
        output: &Path,
    ) -> Result<RunSummary> {
        let records = read_records(input).await?;
        self.run_distributed(listener, records, output).await
    }

    async fn run_local(&self, records: Vec<Record>, output: &Path) -> Result<RunSummary> {
        tracing::info!("Single-node cluster, sorting {} record(s) locally", records.len());

        let records_read = records.len();
        let records_written = sort_and_write(output, records).await?;
        Ok(RunSummary {
            records_read,
            records_sent: 0,
            records_written,
        })
    }

    async fn run_distributed(
        &self,
        listener: ExchangeListener,
        records: Vec<Record>,
        output: &Path,
    ) -> Result<RunSummary> {
        let records_read = records.len();
        let (assembled, records_sent) = self.exchange(listener, records).await?;
        let records_written = sort_and_write(output, assembled).await?;

        Ok(RunSummary {
            records_read,
            records_sent,
            records_written,
        })
    }

    /// Routes `records` across the cluster and returns every record this node owns,
    /// along with the number of records sent to peers.
    pub async fn exchange(
        &self,
        listener: ExchangeListener,
        records: Vec<Record>,
    ) -> Result<(Vec<Record>, usize)> {
        let this = self.config.node_id;
        let peers = self.peer_count();

        let mut map = self.partitioner.partition(records);
        tracing::info!("{} partitioned shard into buckets {:?}", this, map.bucket_sizes());
        let local = map.take(this);

        let (tx, mut rx) = mpsc::unbounded_channel();
        listener.spawn(peers, tx);

        let dialer = ExchangeDialer::new(this, self.config.topology.clone(), self.config.dial);
        let sends = dialer.spawn_all(&mut map);
        drop(map);

        let (assembled, sent) = tokio::try_join!(
            Assembly::new(local, peers).run(&mut rx),
            wait_all(sends)
        )?;

        tracing::info!("{} exchange done: sent {}, holding {}", this, sent, assembled.len());
        Ok((assembled, sent))
    }
}
