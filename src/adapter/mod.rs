//! Clinical-trials adapter layer
//!
//! Turns raw registry records into deduplicated node tables and edge
//! lists, then emits them as tuples to a graph sink.

mod clinical_trials;
pub mod emit;
pub mod lookup;
pub mod normalize;
pub mod selection;
mod sink;
mod traits;

pub use clinical_trials::ClinicalTrialsAdapter;
pub use emit::Emitter;
pub use lookup::SENTINEL;
pub use normalize::{Disease, Drug, Location, NormalizeStats, Organisation, Outcome, TrialTables};
pub use selection::{EdgeType, NodeType, Selection, SelectionConfig, StudyField};
pub use sink::{write_graph, EmitSummary, GraphSink, JsonLinesSink, SinkError, SinkResult};
pub use traits::{Adapter, Emitted};
