//! Emission of node and edge tuples from normalized tables
//!
//! Nodes come out in the fixed order study, organisation, outcome, drug,
//! disease, location; edges as study→drug, study→disease, study→location.
//! Both sequences are lazy views over the tables and may be taken any
//! number of times, in any order.

use super::lookup::{lookup, to_property};
use super::normalize::TrialTables;
use super::selection::{EdgeType, NodeType, Selection, StudyField};
use crate::graph::{Edge, Node, Properties};
use serde_json::Value;
use std::iter;

/// Read-only view pairing the tables with the selection that filters them.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    tables: &'a TrialTables,
    selection: &'a Selection,
}

impl<'a> Emitter<'a> {
    pub fn new(tables: &'a TrialTables, selection: &'a Selection) -> Self {
        Self { tables, selection }
    }

    /// Lazy sequence of nodes for every enabled node type.
    pub fn nodes(self) -> impl Iterator<Item = Node> + 'a {
        let tables = self.tables;
        let fields = self.selection.node_fields();

        let studies = self
            .gate(NodeType::Study)
            .then(move || {
                tables.studies().iter().map(move |(id, record)| {
                    Node::new(id.as_str(), NodeType::Study.as_str())
                        .with_properties(project_study(record, fields))
                })
            })
            .into_iter()
            .flatten();

        let organisations = self
            .gate(NodeType::Organisation)
            .then(move || {
                tables.organisations().iter().map(|(name, org)| {
                    Node::new(name.as_str(), NodeType::Organisation.as_str()).with_properties(org.properties())
                })
            })
            .into_iter()
            .flatten();

        let outcomes = self
            .gate(NodeType::Outcome)
            .then(move || {
                tables.outcomes().iter().map(|(measure, outcome)| {
                    Node::new(measure.as_str(), NodeType::Outcome.as_str()).with_properties(outcome.properties())
                })
            })
            .into_iter()
            .flatten();

        let drugs = self
            .gate(NodeType::Drug)
            .then(move || {
                tables.drugs().iter().map(|(name, drug)| {
                    Node::new(name.as_str(), NodeType::Drug.as_str()).with_properties(drug.properties())
                })
            })
            .into_iter()
            .flatten();

        let diseases = self
            .gate(NodeType::Disease)
            .then(move || {
                tables.diseases().iter().map(|(name, disease)| {
                    Node::new(name.as_str(), NodeType::Disease.as_str()).with_properties(disease.properties())
                })
            })
            .into_iter()
            .flatten();

        let locations = self
            .gate(NodeType::Location)
            .then(move || {
                tables.locations().iter().map(|(name, location)| {
                    Node::new(name.as_str(), NodeType::Location.as_str()).with_properties(location.properties())
                })
            })
            .into_iter()
            .flatten();

        studies
            .chain(organisations)
            .chain(outcomes)
            .chain(drugs)
            .chain(diseases)
            .chain(locations)
    }

    /// Lazy sequence of edges for every enabled edge type.
    ///
    /// A non-empty edge-field selection restricts each edge's properties.
    pub fn edges(self) -> impl Iterator<Item = Edge> + 'a {
        let tables = self.tables;
        let fields = self.selection.edge_fields();

        let lists: [(EdgeType, &'a [Edge]); 3] = [
            (EdgeType::StudyToDrug, tables.study_to_drug()),
            (EdgeType::StudyToDisease, tables.study_to_disease()),
            (EdgeType::StudyToLocation, tables.study_to_location()),
        ];
        let selection = self.selection;

        lists
            .into_iter()
            .filter(move |(edge_type, _)| selection.includes_edge(*edge_type))
            .flat_map(|(_, edges)| edges.iter())
            .map(move |edge| {
                let mut edge = edge.clone();
                if !fields.is_empty() {
                    edge.retain_properties(fields);
                }
                edge
            })
    }

    fn gate(&self, node_type: NodeType) -> bool {
        self.selection.includes_node(node_type)
    }
}

/// Project the selected study fields out of a raw record.
///
/// The id field is the node key and is never repeated as a property.
pub fn project_study(record: &Value, fields: &[StudyField]) -> Properties {
    fields
        .iter()
        .filter(|field| **field != StudyField::Id)
        .map(|field| {
            let path = iter::once("protocolSection").chain(field.path_segments());
            let value = lookup(record, path);
            (field.as_str().to_string(), to_property(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::lookup::SENTINEL;
    use crate::graph::PropertyValue;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "protocolSection": {
                "identificationModule": { "nctId": "NCT1", "briefTitle": "Trial \"one\"" },
                "designModule": {
                    "phases": ["PHASE2", "PHASE3"],
                    "enrollmentInfo": { "count": 40 }
                },
                "eligibilityModule": { "healthyVolunteers": false },
                "armsInterventionsModule": {
                    "interventions": [{ "name": "Aspirin", "type": "DRUG", "description": "pill" }]
                },
                "conditionsModule": { "conditions": ["Headache"] },
                "contactsLocationsModule": { "locations": [{ "facility": "Clinic" }] }
            }
        })
    }

    #[test]
    fn project_study_resolves_every_field() {
        let props = project_study(&record(), &StudyField::ALL);

        assert!(!props.contains_key("id"));
        assert_eq!(props.len(), StudyField::ALL.len() - 1);
        assert_eq!(props["brief_title"].as_str(), Some("Trial 'one'"));
        assert_eq!(props["number_of_patients"], PropertyValue::Int(40));
        assert_eq!(props["healthy_volunteers"], PropertyValue::Bool(false));
        assert_eq!(props["phases"].as_array().map(|p| p.len()), Some(2));
        assert_eq!(props["official_title"].as_str(), Some(SENTINEL));
    }

    #[test]
    fn nodes_follow_fixed_type_order() {
        let selection = Selection::default();
        let tables = TrialTables::build(vec![record()], &selection);

        let labels: Vec<String> = Emitter::new(&tables, &selection).nodes().map(|n| n.label).collect();
        assert_eq!(labels, vec!["study", "drug", "disease", "location"]);
    }

    #[test]
    fn disabled_node_types_are_not_emitted() {
        let selection = Selection::default().with_node_types(&[NodeType::Drug, NodeType::Location]);
        let tables = TrialTables::build(vec![record()], &selection);

        let labels: Vec<String> = Emitter::new(&tables, &selection).nodes().map(|n| n.label).collect();
        assert_eq!(labels, vec!["drug", "location"]);
    }

    #[test]
    fn no_edges_without_study_nodes() {
        let selection = Selection::default().with_node_types(&[NodeType::Drug, NodeType::Disease]);
        let tables = TrialTables::build(vec![record()], &selection);
        let emitter = Emitter::new(&tables, &selection);

        let nodes: Vec<Node> = emitter.nodes().collect();
        assert!(nodes.iter().any(|n| n.label == "drug" && n.id.as_str() == "Aspirin"));
        assert!(nodes.iter().any(|n| n.label == "disease" && n.id.as_str() == "Headache"));

        let study_ids: Vec<&str> = nodes
            .iter()
            .filter(|n| n.label == "study")
            .map(|n| n.id.as_str())
            .collect();
        let dangling: Vec<Edge> = emitter
            .edges()
            .filter(|e| !study_ids.contains(&e.source.as_str()))
            .collect();
        assert!(dangling.is_empty(), "dangling edges: {dangling:?}");
        assert_eq!(emitter.edges().count(), 0);
        assert_eq!(tables.edge_count(), 0);
    }

    #[test]
    fn edges_filtered_by_type_and_fields() {
        let selection = Selection::default().with_edge_types(&[EdgeType::StudyToDrug, EdgeType::StudyToLocation]);
        let tables = TrialTables::build(vec![record()], &selection);

        let edges: Vec<Edge> = Emitter::new(&tables, &selection).edges().collect();
        let labels: Vec<&str> = edges.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["study_has_drug", "study_has_location"]);
        assert_eq!(edges[0].properties["description"].as_str(), Some("pill"));

        let restricted = Selection::resolve(&crate::adapter::SelectionConfig {
            edge_fields: Some(vec!["weight".to_string()]),
            ..Default::default()
        });
        let edge = Emitter::new(&tables, &restricted).edges().next().unwrap();
        assert!(edge.properties.is_empty());
    }

    #[test]
    fn emission_is_repeatable_in_any_order() {
        let selection = Selection::default();
        let tables = TrialTables::build(vec![record()], &selection);
        let emitter = Emitter::new(&tables, &selection);

        let edges_first = emitter.edges().count();
        let nodes = emitter.nodes().count();
        let edges_again = emitter.edges().count();

        assert_eq!(edges_first, 3);
        assert_eq!(edges_again, 3);
        assert_eq!(nodes, 4);
    }
}
