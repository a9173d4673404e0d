//! Run configuration, loadable from YAML
//!
//! ```yaml
//! base_url: https://clinicaltrials.gov/api/v2
//! query:
//!   condition: iga nephropathy
//!   page_size: 100
//!   extra:
//!     filter.overallStatus: RECRUITING
//! selection:
//!   node_types: [study, drug, disease]
//!   edge_types: [study_to_drug, study_to_disease]
//! ```
//!
//! Every key is optional; missing keys take the built-in defaults.

use crate::adapter::{Selection, SelectionConfig};
use crate::source::{StudyQuery, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialGraphConfig {
    /// Registry API root; `/studies` is appended
    pub base_url: String,
    pub query: StudyQuery,
    pub selection: SelectionConfig,
}

impl Default for TrialGraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query: StudyQuery::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl TrialGraphConfig {
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Resolved field selection
    pub fn selection(&self) -> Selection {
        Selection::resolve(&self.selection)
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.query.condition = condition.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{EdgeType, NodeType};
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = TrialGraphConfig::from_yaml("{}").unwrap();
        assert_eq!(config, TrialGraphConfig::default());
        assert_eq!(config.query.format, "json");
        assert_eq!(config.query.parser, "advanced");
        assert_eq!(config.selection(), Selection::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = TrialGraphConfig::from_yaml(
            r#"
base_url: http://localhost:9000/api
query:
  condition: asthma
  page_size: 25
  extra:
    filter.overallStatus: RECRUITING
selection:
  node_types: [study, drug]
  edge_types: [study_to_drug, not_an_edge]
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.query.condition, "asthma");
        assert_eq!(config.query.format, "json");
        assert_eq!(config.query.page_size, Some(25));
        assert_eq!(config.query.extra["filter.overallStatus"], "RECRUITING");

        let selection = config.selection();
        assert_eq!(selection.node_types(), &[NodeType::Study, NodeType::Drug]);
        assert_eq!(selection.edge_types(), &[EdgeType::StudyToDrug]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "query:\n  condition: lupus").unwrap();

        let config = TrialGraphConfig::load(file.path()).unwrap();
        assert_eq!(config.query.condition, "lupus");
        assert_eq!(config.query.format, "json");

        let config = config.with_condition("gout");
        assert_eq!(config.query.condition, "gout");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TrialGraphConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            TrialGraphConfig::from_yaml("query: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
