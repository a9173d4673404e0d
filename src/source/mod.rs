//! Paginated access to the remote study registry
//!
//! A `StudySource` answers one page request at a time. `fetch_all` drives
//! the continuation-token loop until the source stops handing out tokens
//! and returns every raw record in arrival order.

mod http;

pub use http::{HttpStudySource, DEFAULT_BASE_URL};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// Query parameter carrying the continuation token
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// Ordered query-parameter map sent with every page request
pub type QueryParams = IndexMap<String, String>;

/// Errors that abort a fetch. There is no retry: any of these ends the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// One page of the registry's `/studies` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyPage {
    /// Raw nested study records
    #[serde(default, deserialize_with = "null_as_empty")]
    pub studies: Vec<Value>,
    /// Continuation token; absent on the last page
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Study search sent to the registry.
///
/// `format`, `parser` and `condition` are always sent; `page_size` and
/// `extra` (e.g. `filter.overallStatus`) only when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyQuery {
    /// Output format indicator (`format`)
    pub format: String,
    /// Query language mode (`query.parser`)
    pub parser: String,
    /// Free-text condition filter (`query.cond`)
    pub condition: String,
    /// Records per page (`pageSize`); registry default when unset
    pub page_size: Option<u32>,
    /// Additional raw parameters, sent verbatim
    pub extra: BTreeMap<String, String>,
}

impl Default for StudyQuery {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            parser: "advanced".to_string(),
            condition: "iga nephropathy".to_string(),
            page_size: None,
            extra: BTreeMap::new(),
        }
    }
}

impl StudyQuery {
    /// Query with the default format and parser for the given condition
    pub fn for_condition(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build the first-page parameter map
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("format".to_string(), self.format.clone());
        params.insert("query.parser".to_string(), self.parser.clone());
        params.insert("query.cond".to_string(), self.condition.clone());
        if let Some(size) = self.page_size {
            params.insert("pageSize".to_string(), size.to_string());
        }
        for (key, value) in &self.extra {
            params.insert(key.clone(), value.clone());
        }
        params
    }
}

/// Anything that can answer a single page request.
pub trait StudySource {
    /// Fetch the page selected by `params` (which carries `pageToken`
    /// after the first round).
    fn fetch_page(&self, params: &QueryParams) -> FetchResult<StudyPage>;
}

/// Fetch every page for `query` and concatenate the records in order.
///
/// Stops when a page has no continuation token (an empty token counts
/// as none). Errors propagate immediately and discard earlier pages.
pub fn fetch_all<S: StudySource + ?Sized>(source: &S, query: &StudyQuery) -> FetchResult<Vec<Value>> {
    let mut params = query.to_params();
    let mut studies = Vec::new();
    let mut pages = 0usize;

    info!(condition = %query.condition, "fetching studies");

    loop {
        let page = source.fetch_page(&params)?;
        pages += 1;
        debug!(page = pages, records = page.studies.len(), "fetched study page");
        studies.extend(page.studies);

        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => {
                params.insert(PAGE_TOKEN_PARAM.to_string(), token);
            }
            None => break,
        }
    }

    info!(pages, records = studies.len(), "fetched all studies");
    Ok(studies)
}
