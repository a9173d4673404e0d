//! Serialization tests for the writer-facing tuple shapes

use serde_json::{json, Value};

/// Node fixture in the shape the graph writer consumes
fn writer_node_fixture() -> Value {
    json!({
        "id": "NCT01234567",
        "label": "study",
        "properties": {
            "brief_title": "A trial",
            "phases": ["PHASE2", "PHASE3"],
            "number_of_patients": 40
        }
    })
}

/// Edge fixture in the shape the graph writer consumes
fn writer_edge_fixture() -> Value {
    json!({
        "id": null,
        "source": "NCT01234567",
        "target": "Aspirin",
        "label": "study_has_drug",
        "properties": {
            "description": "N/A"
        }
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{relationship, Edge, Node, NodeId, PropertyValue};

    #[test]
    fn node_id_serializes_as_string() {
        let id = NodeId::from("NCT01234567");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"NCT01234567\"");
    }

    #[test]
    fn property_value_is_untagged() {
        let value = PropertyValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(["a", "b"]));
        assert_eq!(serde_json::to_value(PropertyValue::Bool(true)).unwrap(), json!(true));
    }

    #[test]
    fn can_deserialize_writer_node_fixture() {
        let node: Node = serde_json::from_value(writer_node_fixture()).unwrap();

        assert_eq!(node.id.as_str(), "NCT01234567");
        assert_eq!(node.label, "study");
        assert_eq!(node.properties["number_of_patients"], PropertyValue::Int(40));
        assert_eq!(node.properties["phases"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn can_deserialize_writer_edge_fixture() {
        let edge: Edge = serde_json::from_value(writer_edge_fixture()).unwrap();

        assert!(edge.id.is_none());
        assert_eq!(edge.source.as_str(), "NCT01234567");
        assert_eq!(edge.target.as_str(), "Aspirin");
        assert_eq!(edge.label, relationship::STUDY_HAS_DRUG);
    }

    #[test]
    fn serialized_edge_has_null_id() {
        let edge = Edge::new("NCT1", "Headache", relationship::STUDY_HAS_DISEASE);
        let json = serde_json::to_value(&edge).unwrap();

        assert!(json["id"].is_null());
        assert_eq!(json["source"], "NCT1");
        assert_eq!(json["target"], "Headache");
        assert!(json["properties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn retain_properties_drops_unlisted_keys() {
        let mut edge = Edge::new("NCT1", "Aspirin", relationship::STUDY_HAS_DRUG)
            .with_property("description", "pill")
            .with_property("dose", "10mg");

        edge.retain_properties(&["dose".to_string()]);

        assert_eq!(edge.properties.len(), 1);
        assert!(edge.properties.contains_key("dose"));
    }
}
