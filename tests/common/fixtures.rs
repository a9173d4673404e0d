//! Canned registry pages and record builders

use serde_json::{json, Value};
use std::cell::RefCell;
use trialgraph::source::{FetchError, FetchResult, QueryParams, StudyPage, StudySource, PAGE_TOKEN_PARAM};

/// Serves pre-recorded pages keyed by the `pageToken` they answer.
///
/// Records the parameter map of every request so tests can check what
/// the paginator sent.
#[derive(Debug, Default)]
pub struct CannedSource {
    pages: Vec<(Option<String>, StudyPage)>,
    failing: Option<String>,
    requests: RefCell<Vec<QueryParams>>,
}

impl CannedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the page returned for `token` (None = first page).
    pub fn page(mut self, token: Option<&str>, studies: Vec<Value>, next: Option<&str>) -> Self {
        self.pages.push((
            token.map(str::to_string),
            StudyPage {
                studies,
                next_page_token: next.map(str::to_string),
            },
        ));
        self
    }

    /// Answer the request carrying `token` with a 503 instead of a page.
    pub fn fail_at(mut self, token: &str) -> Self {
        self.failing = Some(token.to_string());
        self
    }

    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.borrow().clone()
    }

    /// The page token carried by each request, in order
    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.requests
            .borrow()
            .iter()
            .map(|params| params.get(PAGE_TOKEN_PARAM).cloned())
            .collect()
    }
}

impl StudySource for CannedSource {
    fn fetch_page(&self, params: &QueryParams) -> FetchResult<StudyPage> {
        self.requests.borrow_mut().push(params.clone());
        let token = params.get(PAGE_TOKEN_PARAM).cloned();
        if token.is_some() && token == self.failing {
            return Err(FetchError::Status {
                status: 503,
                url: "canned://studies".to_string(),
            });
        }
        Ok(self
            .pages
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, page)| page.clone())
            .unwrap_or_default())
    }
}

/// A raw study record with the given id and extra protocol modules.
pub fn study(id: &str, modules: Value) -> Value {
    let mut protocol = modules;
    protocol["identificationModule"]["nctId"] = json!(id);
    json!({ "protocolSection": protocol })
}
