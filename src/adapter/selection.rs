//! Field selection: which node types, study fields and edge types to produce
//!
//! Configuration names are plain snake_case strings. A non-empty caller list
//! is taken verbatim (unknown names simply never match); an absent or empty
//! list falls back to every recognized value on that axis. Edge fields have
//! no catch-all and default to empty.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Node types the adapter can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Study,
    Organisation,
    Outcome,
    Drug,
    Disease,
    Location,
}

impl NodeType {
    /// Every node type, in emission order
    pub const ALL: [NodeType; 6] = [
        NodeType::Study,
        NodeType::Organisation,
        NodeType::Outcome,
        NodeType::Drug,
        NodeType::Disease,
        NodeType::Location,
    ];

    /// Configuration name, also used as the emitted node label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Organisation => "organisation",
            Self::Outcome => "outcome",
            Self::Drug => "drug",
            Self::Disease => "disease",
            Self::Location => "location",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Study fields and their slash-separated paths below `protocolSection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudyField {
    Id,
    BriefTitle,
    OfficialTitle,
    Status,
    BriefSummary,
    Type,
    Allocation,
    Phases,
    Model,
    PrimaryPurpose,
    NumberOfPatients,
    EligibilityCriteria,
    HealthyVolunteers,
    Sex,
    MinimumAge,
    MaximumAge,
    StandardisedAges,
}

impl StudyField {
    pub const ALL: [StudyField; 17] = [
        StudyField::Id,
        StudyField::BriefTitle,
        StudyField::OfficialTitle,
        StudyField::Status,
        StudyField::BriefSummary,
        StudyField::Type,
        StudyField::Allocation,
        StudyField::Phases,
        StudyField::Model,
        StudyField::PrimaryPurpose,
        StudyField::NumberOfPatients,
        StudyField::EligibilityCriteria,
        StudyField::HealthyVolunteers,
        StudyField::Sex,
        StudyField::MinimumAge,
        StudyField::MaximumAge,
        StudyField::StandardisedAges,
    ];

    /// Configuration name, also the emitted property key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::BriefTitle => "brief_title",
            Self::OfficialTitle => "official_title",
            Self::Status => "status",
            Self::BriefSummary => "brief_summary",
            Self::Type => "type",
            Self::Allocation => "allocation",
            Self::Phases => "phases",
            Self::Model => "model",
            Self::PrimaryPurpose => "primary_purpose",
            Self::NumberOfPatients => "number_of_patients",
            Self::EligibilityCriteria => "eligibility_criteria",
            Self::HealthyVolunteers => "healthy_volunteers",
            Self::Sex => "sex",
            Self::MinimumAge => "minimum_age",
            Self::MaximumAge => "maximum_age",
            Self::StandardisedAges => "standardised_ages",
        }
    }

    /// Location of the field inside `protocolSection`
    pub fn path(&self) -> &'static str {
        match self {
            Self::Id => "identificationModule/nctId",
            Self::BriefTitle => "identificationModule/briefTitle",
            Self::OfficialTitle => "identificationModule/officialTitle",
            Self::Status => "statusModule/overallStatus",
            Self::BriefSummary => "descriptionModule/briefSummary",
            Self::Type => "designModule/studyType",
            Self::Allocation => "designModule/designInfo/allocation",
            Self::Phases => "designModule/phases",
            Self::Model => "designModule/designInfo/interventionModel",
            Self::PrimaryPurpose => "designModule/designInfo/primaryPurpose",
            Self::NumberOfPatients => "designModule/enrollmentInfo/count",
            Self::EligibilityCriteria => "eligibilityModule/eligibilityCriteria",
            Self::HealthyVolunteers => "eligibilityModule/healthyVolunteers",
            Self::Sex => "eligibilityModule/sex",
            Self::MinimumAge => "eligibilityModule/minimumAge",
            Self::MaximumAge => "eligibilityModule/maximumAge",
            Self::StandardisedAges => "eligibilityModule/stdAges",
        }
    }

    pub fn path_segments(&self) -> impl Iterator<Item = &'static str> {
        self.path().split('/')
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Edge types the adapter can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    StudyToDrug,
    StudyToDisease,
    StudyToLocation,
}

impl EdgeType {
    /// Every edge type, in emission order
    pub const ALL: [EdgeType; 3] = [
        EdgeType::StudyToDrug,
        EdgeType::StudyToDisease,
        EdgeType::StudyToLocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudyToDrug => "study_to_drug",
            Self::StudyToDisease => "study_to_disease",
            Self::StudyToLocation => "study_to_location",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Caller-supplied selection lists, as they appear in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub node_types: Option<Vec<String>>,
    pub node_fields: Option<Vec<String>>,
    pub edge_types: Option<Vec<String>>,
    pub edge_fields: Option<Vec<String>>,
}

/// The resolved selection. Membership checks gate extraction and emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    node_types: Vec<NodeType>,
    node_fields: Vec<StudyField>,
    edge_types: Vec<EdgeType>,
    edge_fields: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::resolve(&SelectionConfig::default())
    }
}

impl Selection {
    /// Resolve caller lists against the recognized identifiers.
    pub fn resolve(config: &SelectionConfig) -> Self {
        Self {
            node_types: resolve_axis(config.node_types.as_deref(), "node type", NodeType::parse, &NodeType::ALL),
            node_fields: resolve_axis(config.node_fields.as_deref(), "node field", StudyField::parse, &StudyField::ALL),
            edge_types: resolve_axis(config.edge_types.as_deref(), "edge type", EdgeType::parse, &EdgeType::ALL),
            edge_fields: match config.edge_fields.as_deref() {
                Some(fields) if !fields.is_empty() => fields.to_vec(),
                _ => Vec::new(),
            },
        }
    }

    /// Restrict node types, keeping every other axis at its default
    pub fn with_node_types(mut self, types: &[NodeType]) -> Self {
        self.node_types = types.to_vec();
        self
    }

    /// Restrict edge types, keeping every other axis at its default
    pub fn with_edge_types(mut self, types: &[EdgeType]) -> Self {
        self.edge_types = types.to_vec();
        self
    }

    /// Restrict study fields, keeping every other axis at its default
    pub fn with_node_fields(mut self, fields: &[StudyField]) -> Self {
        self.node_fields = fields.to_vec();
        self
    }

    pub fn includes_node(&self, node_type: NodeType) -> bool {
        self.node_types.contains(&node_type)
    }

    pub fn includes_edge(&self, edge_type: EdgeType) -> bool {
        self.edge_types.contains(&edge_type)
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn node_fields(&self) -> &[StudyField] {
        &self.node_fields
    }

    pub fn edge_types(&self) -> &[EdgeType] {
        &self.edge_types
    }

    /// Edge property keys to keep; empty means keep everything
    pub fn edge_fields(&self) -> &[String] {
        &self.edge_fields
    }
}

fn resolve_axis<T: Copy + PartialEq>(
    requested: Option<&[String]>,
    axis: &str,
    parse: impl Fn(&str) -> Option<T>,
    all: &[T],
) -> Vec<T> {
    match requested {
        Some(names) if !names.is_empty() => {
            let mut resolved = Vec::new();
            for name in names {
                match parse(name) {
                    Some(value) if !resolved.contains(&value) => resolved.push(value),
                    Some(_) => {}
                    None => debug!(axis, name = %name, "ignoring unrecognized selection entry"),
                }
            }
            resolved
        }
        _ => all.to_vec(),
    }
}
