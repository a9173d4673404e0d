//! GraphSink trait and emission summary
//!
//! The sink is the interface through which emitted tuples leave the crate.
//! Loading them into a database is the writer's business; `JsonLinesSink`
//! covers the common case of handing one JSON object per line to an
//! import tool.

use super::traits::Adapter;
use crate::graph::{Edge, Node};
use indexmap::IndexMap;
use std::io::Write;
use thiserror::Error;
use tracing::info;

/// Errors from writing tuples (not from normalization).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Receives nodes and edges from `write_graph`.
pub trait GraphSink {
    fn write_node(&mut self, node: &Node) -> SinkResult<()>;

    fn write_edge(&mut self, edge: &Edge) -> SinkResult<()>;

    /// Flush buffered output. Called once after the last edge.
    fn finish(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

/// Writes nodes and edges as JSON lines, to separate writers.
pub struct JsonLinesSink<N: Write, E: Write> {
    nodes: N,
    edges: E,
}

impl<N: Write, E: Write> JsonLinesSink<N, E> {
    pub fn new(nodes: N, edges: E) -> Self {
        Self { nodes, edges }
    }

    /// Recover the underlying writers
    pub fn into_inner(self) -> (N, E) {
        (self.nodes, self.edges)
    }
}

impl<N: Write, E: Write> GraphSink for JsonLinesSink<N, E> {
    fn write_node(&mut self, node: &Node) -> SinkResult<()> {
        serde_json::to_writer(&mut self.nodes, node)?;
        self.nodes.write_all(b"\n")?;
        Ok(())
    }

    fn write_edge(&mut self, edge: &Edge) -> SinkResult<()> {
        serde_json::to_writer(&mut self.edges, edge)?;
        self.edges.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<()> {
        self.nodes.flush()?;
        self.edges.flush()?;
        Ok(())
    }
}

/// Counts of what `write_graph` handed to the sink, per label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitSummary {
    pub nodes: IndexMap<String, usize>,
    pub edges: IndexMap<String, usize>,
}

impl EmitSummary {
    pub fn node_total(&self) -> usize {
        self.nodes.values().sum()
    }

    pub fn edge_total(&self) -> usize {
        self.edges.values().sum()
    }

    /// Nodes written under `label`
    pub fn nodes_labelled(&self, label: &str) -> usize {
        self.nodes.get(label).copied().unwrap_or(0)
    }

    /// Edges written under `label`
    pub fn edges_labelled(&self, label: &str) -> usize {
        self.edges.get(label).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for EmitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<24}  {:>8}", "NODE LABEL", "COUNT")?;
        for (label, count) in &self.nodes {
            writeln!(f, "{:<24}  {:>8}", label, count)?;
        }
        writeln!(f, "{:<24}  {:>8}", "EDGE LABEL", "COUNT")?;
        for (label, count) in &self.edges {
            writeln!(f, "{:<24}  {:>8}", label, count)?;
        }
        write!(f, "{} nodes, {} edges", self.node_total(), self.edge_total())
    }
}

/// Drive an adapter's nodes, then its edges, into a sink.
pub fn write_graph<A, S>(adapter: &A, sink: &mut S) -> SinkResult<EmitSummary>
where
    A: Adapter + ?Sized,
    S: GraphSink + ?Sized,
{
    let mut summary = EmitSummary::default();

    info!(adapter = adapter.id(), "generating nodes");
    for node in adapter.nodes() {
        sink.write_node(&node)?;
        *summary.nodes.entry(node.label).or_insert(0) += 1;
    }

    info!(adapter = adapter.id(), "generating edges");
    for edge in adapter.edges() {
        sink.write_edge(&edge)?;
        *summary.edges.entry(edge.label).or_insert(0) += 1;
    }

    sink.finish()?;
    info!(nodes = summary.node_total(), edges = summary.edge_total(), "graph written");
    Ok(summary)
}
