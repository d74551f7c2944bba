//! Remote document index client
//!
//! Talks JSON to a single fixed endpoint URL. The service's internals
//! (content addressing, anchoring, consensus) are opaque; this client only
//! speaks the get/set contract and maps transport-level failures onto the
//! error taxonomy.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{FolioError, FolioResult};
use crate::identity::Did;
use crate::store::DocumentIndex;

/// Default index service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://index.didfolio.dev";

#[derive(Serialize)]
struct SetRequest<'a> {
    did: &'a str,
    document: &'a serde_json::Value,
}

/// HTTP [`DocumentIndex`] client against a fixed endpoint
#[derive(Debug)]
pub struct HttpIndex {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpIndex {
    /// Client against the default endpoint
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT).expect("default endpoint URL is valid")
    }

    /// Client against a specific endpoint URL
    pub fn with_endpoint(endpoint: &str) -> FolioResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| FolioError::NetworkError(format!("invalid endpoint URL: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    fn document_url(&self, key: &str, identity_ref: &str) -> FolioResult<Url> {
        let mut url = self
            .endpoint
            .join(&format!("api/v0/documents/{}", key))
            .map_err(|e| FolioError::NetworkError(format!("invalid document URL: {}", e)))?;
        url.query_pairs_mut().append_pair("identity", identity_ref);
        Ok(url)
    }
}

impl Default for HttpIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentIndex for HttpIndex {
    async fn get(
        &self,
        key: &str,
        identity_ref: &str,
    ) -> FolioResult<Option<serde_json::Value>> {
        let url = self.document_url(key, identity_ref)?;
        debug!(%url, "GET document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FolioError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let value = response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| FolioError::MalformedDocument(e.to_string()))?;
                Ok(Some(value))
            }
            status => Err(FolioError::NetworkError(format!(
                "index returned {}",
                status
            ))),
        }
    }

    async fn set(
        &self,
        key: &str,
        document: serde_json::Value,
        did: &Did,
        identity_ref: &str,
    ) -> FolioResult<()> {
        let url = self.document_url(key, identity_ref)?;
        debug!(%url, did = %did, "PUT document");

        let response = self
            .client
            .put(url)
            .json(&SetRequest {
                did: did.as_str(),
                document: &document,
            })
            .send()
            .await
            .map_err(|e| FolioError::NetworkError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FolioError::Unauthorized(
                format!("index rejected write for {}", identity_ref),
            )),
            status => Err(FolioError::NetworkError(format!(
                "index returned {}",
                status
            ))),
        }
    }
}
