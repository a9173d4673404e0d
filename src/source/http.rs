//! Blocking HTTP implementation of `StudySource`

use super::{FetchError, FetchResult, QueryParams, StudyPage, StudySource};
use reqwest::blocking::Client;
use tracing::debug;

/// ClinicalTrials.gov v2 API root
pub const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";

/// Fetches pages from `{base_url}/studies` with a blocking client.
pub struct HttpStudySource {
    client: Client,
    base_url: String,
}

impl HttpStudySource {
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("trialgraph/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client (proxy, TLS settings, ...)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The `/studies` endpoint for this base URL
    pub fn studies_url(&self) -> String {
        format!("{}/studies", self.base_url.trim_end_matches('/'))
    }
}

impl StudySource for HttpStudySource {
    fn fetch_page(&self, params: &QueryParams) -> FetchResult<StudyPage> {
        let url = self.studies_url();
        debug!(url = %url, page_token = ?params.get(super::PAGE_TOKEN_PARAM), "requesting page");

        let response = self.client.get(&url).query(params).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}
