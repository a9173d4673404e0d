//! Edge tuples handed to the graph writer

use super::node::{NodeId, Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship labels derived by the normalizer
pub mod relationship {
    pub const STUDY_HAS_DRUG: &str = "study_has_drug";
    pub const STUDY_HAS_DISEASE: &str = "study_has_disease";
    pub const STUDY_HAS_LOCATION: &str = "study_has_location";
}

/// A directed relationship:
/// `(id, source, target, label, properties)`
///
/// The id is optional; the graph writer assigns one when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Optional edge identifier
    pub id: Option<String>,
    /// Source node key (always a study id)
    pub source: NodeId,
    /// Target node key
    pub target: NodeId,
    /// Relationship label (e.g., "study_has_drug")
    pub label: String,
    /// Additional properties
    pub properties: Properties,
}

impl Edge {
    /// Create an edge without an id or properties
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    /// Add a property to the edge
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Keep only the named properties
    pub fn retain_properties(&mut self, keys: &[String]) {
        self.properties.retain(|k, _| keys.iter().any(|key| key == k));
    }
}
