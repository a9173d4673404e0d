//! trialgraph: clinical-trial registry → knowledge-graph tuples
//!
//! Pulls every page of a ClinicalTrials.gov study search, walks the nested
//! records defensively and normalizes them into deduplicated node tables
//! (study, organisation, outcome, drug, disease, location) and study-centred
//! edges, ready for a graph writer.
//!
//! # Core Concepts
//!
//! - **Source**: answers one page request; `fetch_all` follows continuation tokens
//! - **Selection**: which node types, study fields and edge types to produce
//! - **Tables**: first-occurrence-wins entity tables plus edge lists
//! - **Adapter**: emits `(id, label, properties)` nodes and
//!   `(id, source, target, label, properties)` edges
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trialgraph::{Adapter, ClinicalTrialsAdapter, Selection};
//!
//! let record = json!({
//!     "protocolSection": {
//!         "identificationModule": { "nctId": "NCT00000001" },
//!         "conditionsModule": { "conditions": ["Headache"] }
//!     }
//! });
//! let adapter = ClinicalTrialsAdapter::from_records(vec![record], Selection::default());
//! assert_eq!(adapter.nodes().count(), 2);
//! assert_eq!(adapter.edges().count(), 1);
//! ```

pub mod adapter;
pub mod config;
mod graph;
pub mod source;

pub use adapter::{
    write_graph, Adapter, ClinicalTrialsAdapter, EdgeType, EmitSummary, GraphSink, JsonLinesSink,
    NodeType, NormalizeStats, Selection, SelectionConfig, SinkError, StudyField, TrialTables,
};
pub use config::{ConfigError, TrialGraphConfig};
pub use graph::{relationship, Edge, Node, NodeId, Properties, PropertyValue};
pub use source::{fetch_all, FetchError, HttpStudySource, StudyPage, StudyQuery, StudySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
