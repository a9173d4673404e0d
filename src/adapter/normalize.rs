//! Record normalization: raw registry records → deduplicated entity tables
//!
//! Each record is processed independently, in arrival order. A record whose
//! registry id cannot be resolved is dropped before anything is extracted
//! from it. Every other extraction step is gated by the selection and runs
//! on its own; a missing section only skips that step.
//!
//! Tables are keyed by natural key and keep insertion order. The first
//! occurrence of a key wins, except disease keywords, which accumulate.

use super::lookup::{lookup, lookup_array, lookup_text, lookup_text_list, text_or_sentinel, SENTINEL};
use super::selection::{NodeType, Selection};
use crate::graph::{relationship, Edge, Properties, PropertyValue};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

const PROTOCOL_SECTION: &str = "protocolSection";
const ID_PATH: [&str; 3] = [PROTOCOL_SECTION, "identificationModule", "nctId"];

/// Sponsor organisation
#[derive(Debug, Clone, PartialEq)]
pub struct Organisation {
    pub class: String,
}

/// Primary or secondary outcome measure
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub primary: bool,
    pub time_frame: String,
    pub description: String,
}

/// Intervention of any type; only drug-typed ones produce edges
#[derive(Debug, Clone, PartialEq)]
pub struct Drug {
    pub intervention_type: String,
    pub description: String,
    pub mapped_names: Vec<String>,
}

/// Studied condition
#[derive(Debug, Clone, PartialEq)]
pub struct Disease {
    pub keywords: Vec<String>,
}

/// Trial site
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Organisation {
    pub fn properties(&self) -> Properties {
        Properties::from([("class".to_string(), PropertyValue::from(self.class.as_str()))])
    }
}

impl Outcome {
    pub fn properties(&self) -> Properties {
        Properties::from([
            ("primary".to_string(), PropertyValue::Bool(self.primary)),
            ("time_frame".to_string(), PropertyValue::from(self.time_frame.as_str())),
            ("description".to_string(), PropertyValue::from(self.description.as_str())),
        ])
    }
}

impl Drug {
    pub fn properties(&self) -> Properties {
        let mapped_names = if self.mapped_names.is_empty() {
            PropertyValue::from(SENTINEL)
        } else {
            PropertyValue::from(self.mapped_names.clone())
        };
        Properties::from([
            ("type".to_string(), PropertyValue::from(self.intervention_type.as_str())),
            ("description".to_string(), PropertyValue::from(self.description.as_str())),
            ("mapped_names".to_string(), mapped_names),
        ])
    }
}

impl Disease {
    pub fn properties(&self) -> Properties {
        Properties::from([("keywords".to_string(), PropertyValue::from(self.keywords.clone()))])
    }
}

impl Location {
    pub fn properties(&self) -> Properties {
        Properties::from([
            ("city".to_string(), PropertyValue::from(self.city.as_str())),
            ("state".to_string(), PropertyValue::from(self.state.as_str())),
            ("country".to_string(), PropertyValue::from(self.country.as_str())),
        ])
    }
}

/// Counters describing one normalization run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeStats {
    /// Records handed to the normalizer
    pub records_seen: usize,
    /// Records dropped because no registry id resolved
    pub records_skipped: usize,
    /// Occurrences of an already-known key, per node type
    pub duplicates: HashMap<NodeType, usize>,
}

impl NormalizeStats {
    pub fn duplicates_of(&self, node_type: NodeType) -> usize {
        self.duplicates.get(&node_type).copied().unwrap_or(0)
    }

    fn count_duplicate(&mut self, node_type: NodeType) {
        *self.duplicates.entry(node_type).or_insert(0) += 1;
    }
}

/// The five entity tables and three edge lists of one pipeline run.
///
/// Built once, eagerly; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TrialTables {
    studies: IndexMap<String, Value>,
    organisations: IndexMap<String, Organisation>,
    outcomes: IndexMap<String, Outcome>,
    drugs: IndexMap<String, Drug>,
    diseases: IndexMap<String, Disease>,
    locations: IndexMap<String, Location>,
    study_to_drug: Vec<Edge>,
    study_to_disease: Vec<Edge>,
    study_to_location: Vec<Edge>,
    stats: NormalizeStats,
}

impl TrialTables {
    /// Normalize `records` under `selection`.
    pub fn build(records: Vec<Value>, selection: &Selection) -> Self {
        let mut tables = Self::default();
        for record in records {
            tables.add_record(record, selection);
        }

        info!(
            records = tables.stats.records_seen,
            skipped = tables.stats.records_skipped,
            studies = tables.studies.len(),
            organisations = tables.organisations.len(),
            outcomes = tables.outcomes.len(),
            drugs = tables.drugs.len(),
            diseases = tables.diseases.len(),
            locations = tables.locations.len(),
            edges = tables.edge_count(),
            "normalized study records"
        );

        tables
    }

    /// Normalize one raw record into the tables.
    pub fn add_record(&mut self, record: Value, selection: &Selection) {
        self.stats.records_seen += 1;

        let Some(study_id) = lookup_text(&record, ID_PATH) else {
            self.stats.records_skipped += 1;
            return;
        };

        // Edges need their Study endpoint; without it they would dangle.
        let link = selection.includes_node(NodeType::Study);

        if let Some(protocol) = lookup(&record, [PROTOCOL_SECTION]) {
            if selection.includes_node(NodeType::Organisation) {
                self.add_organisation(protocol);
            }
            if selection.includes_node(NodeType::Outcome) {
                self.add_outcomes(protocol);
            }
            if selection.includes_node(NodeType::Drug) {
                self.add_interventions(&study_id, protocol, link);
            }
            if selection.includes_node(NodeType::Disease) {
                self.add_conditions(&study_id, protocol, link);
            }
            if selection.includes_node(NodeType::Location) {
                self.add_locations(&study_id, protocol, link);
            }
        }

        if self.studies.contains_key(&study_id) {
            self.stats.count_duplicate(NodeType::Study);
        } else {
            self.studies.insert(study_id, record);
        }
    }

    fn add_organisation(&mut self, protocol: &Value) {
        let Some(name) = lookup_text(protocol, ["identificationModule", "organization", "fullName"]) else {
            return;
        };
        if self.organisations.contains_key(&name) {
            self.stats.count_duplicate(NodeType::Organisation);
            return;
        }
        let class = lookup_text(protocol, ["identificationModule", "organization", "class"]);
        self.organisations.insert(
            name,
            Organisation {
                class: class.unwrap_or_else(|| SENTINEL.to_string()),
            },
        );
    }

    fn add_outcomes(&mut self, protocol: &Value) {
        for (key, primary) in [("primaryOutcomes", true), ("secondaryOutcomes", false)] {
            let Some(outcomes) = lookup_array(protocol, ["outcomesModule", key]) else {
                continue;
            };
            for outcome in outcomes {
                self.add_outcome(outcome, primary);
            }
        }
    }

    fn add_outcome(&mut self, outcome: &Value, primary: bool) {
        let Some(measure) = lookup_text(outcome, ["measure"]) else {
            return;
        };
        if self.outcomes.contains_key(&measure) {
            self.stats.count_duplicate(NodeType::Outcome);
            return;
        }
        self.outcomes.insert(
            measure,
            Outcome {
                primary,
                time_frame: lookup_text(outcome, ["timeFrame"]).unwrap_or_else(|| SENTINEL.to_string()),
                description: lookup_text(outcome, ["description"]).unwrap_or_else(|| SENTINEL.to_string()),
            },
        );
    }

    fn add_interventions(&mut self, study_id: &str, protocol: &Value, link: bool) {
        let Some(interventions) = lookup_array(protocol, ["armsInterventionsModule", "interventions"]) else {
            return;
        };

        for intervention in interventions {
            let Some(name) = lookup_text(intervention, ["name"]) else {
                continue;
            };
            let intervention_type = lookup_text(intervention, ["type"]);
            let description = lookup_text(intervention, ["description"]);

            if self.drugs.contains_key(&name) {
                self.stats.count_duplicate(NodeType::Drug);
            } else {
                self.drugs.insert(
                    name.clone(),
                    Drug {
                        intervention_type: intervention_type.clone().unwrap_or_else(|| SENTINEL.to_string()),
                        description: description.clone().unwrap_or_else(|| SENTINEL.to_string()),
                        mapped_names: lookup_text_list(intervention, ["interventionMappedName"]),
                    },
                );
            }

            let is_drug = intervention_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("drug"));
            if link && is_drug {
                self.study_to_drug.push(
                    Edge::new(study_id, name, relationship::STUDY_HAS_DRUG)
                        .with_property("description", text_or_sentinel(description)),
                );
            }
        }
    }

    fn add_conditions(&mut self, study_id: &str, protocol: &Value, link: bool) {
        let conditions = lookup_text_list(protocol, ["conditionsModule", "conditions"]);
        if conditions.is_empty() {
            return;
        }
        let keywords = lookup_text_list(protocol, ["conditionsModule", "keywords"]);

        for condition in conditions {
            match self.diseases.get_mut(&condition) {
                Some(existing) => {
                    existing.keywords.extend(keywords.iter().cloned());
                    self.stats.count_duplicate(NodeType::Disease);
                }
                None => {
                    self.diseases.insert(
                        condition.clone(),
                        Disease {
                            keywords: keywords.clone(),
                        },
                    );
                }
            }

            if link {
                self.study_to_disease
                    .push(Edge::new(study_id, condition, relationship::STUDY_HAS_DISEASE));
            }
        }
    }

    fn add_locations(&mut self, study_id: &str, protocol: &Value, link: bool) {
        let Some(locations) = lookup_array(protocol, ["contactsLocationsModule", "locations"]) else {
            return;
        };

        for location in locations {
            let Some(facility) = lookup_text(location, ["facility"]) else {
                continue;
            };

            if self.locations.contains_key(&facility) {
                self.stats.count_duplicate(NodeType::Location);
            } else {
                let field = |key: &str| lookup_text(location, [key]).unwrap_or_else(|| SENTINEL.to_string());
                self.locations.insert(
                    facility.clone(),
                    Location {
                        city: field("city"),
                        state: field("state"),
                        country: field("country"),
                    },
                );
            }

            if link {
                self.study_to_location
                    .push(Edge::new(study_id, facility, relationship::STUDY_HAS_LOCATION));
            }
        }
    }

    /// Raw records by registry id
    pub fn studies(&self) -> &IndexMap<String, Value> {
        &self.studies
    }

    pub fn organisations(&self) -> &IndexMap<String, Organisation> {
        &self.organisations
    }

    pub fn outcomes(&self) -> &IndexMap<String, Outcome> {
        &self.outcomes
    }

    pub fn drugs(&self) -> &IndexMap<String, Drug> {
        &self.drugs
    }

    pub fn diseases(&self) -> &IndexMap<String, Disease> {
        &self.diseases
    }

    pub fn locations(&self) -> &IndexMap<String, Location> {
        &self.locations
    }

    pub fn study_to_drug(&self) -> &[Edge] {
        &self.study_to_drug
    }

    pub fn study_to_disease(&self) -> &[Edge] {
        &self.study_to_disease
    }

    pub fn study_to_location(&self) -> &[Edge] {
        &self.study_to_location
    }

    pub fn edge_count(&self) -> usize {
        self.study_to_drug.len() + self.study_to_disease.len() + self.study_to_location.len()
    }

    pub fn stats(&self) -> &NormalizeStats {
        &self.stats
    }
}
