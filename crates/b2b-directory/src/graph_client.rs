//! Microsoft Graph HTTP client with pagination.
//!
//! Every request is attempted once. Throttling and transient failures are
//! surfaced to the caller as errors.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{DirectoryError, DirectoryResult, EntraCloudEnvironment, TokenCache};

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// Response wrapper for paginated Graph API responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client bound to one tenant's token cache.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    cloud_environment: EntraCloudEnvironment,
    api_version: String,
}

impl GraphClient {
    /// Creates a new Graph client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        token_cache: Arc<TokenCache>,
        cloud_environment: EntraCloudEnvironment,
        api_version: String,
    ) -> DirectoryResult<Self> {
        let http_client = build_http_client()?;

        Ok(Self {
            http_client,
            token_cache,
            cloud_environment,
            api_version,
        })
    }

    /// Returns the base URL for Graph API requests.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.cloud_environment.graph_endpoint(),
            self.api_version
        )
    }

    /// Performs a POST request and decodes the JSON body of the reply.
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> DirectoryResult<T> {
        let response = self.send(Method::POST, url, false, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Performs a POST request whose reply carries no body (204 No Content).
    #[instrument(skip(self, body))]
    pub async fn post_no_content<B: Serialize>(&self, url: &str, body: &B) -> DirectoryResult<()> {
        self.send(Method::POST, url, false, Some(body)).await?;
        Ok(())
    }

    /// Fetches all pages of a collection, handing each page to `callback`.
    ///
    /// With `advanced_query` set, each request carries `ConsistencyLevel: eventual`,
    /// which Graph requires for `$count` and for filters on attributes such as
    /// `companyName` or `department`.
    #[instrument(skip(self, callback))]
    pub async fn get_paginated<T, F>(
        &self,
        initial_url: &str,
        advanced_query: bool,
        mut callback: F,
    ) -> DirectoryResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>) -> DirectoryResult<()>,
    {
        let mut url = initial_url.to_string();

        loop {
            debug!("Fetching page: {}", url);
            let response = self
                .send(Method::GET, &url, advanced_query, None::<&()>)
                .await?;
            let page: ODataResponse<T> = response.json().await?;

            callback(page.value)?;

            match page.next_link {
                Some(next) => url = next,
                None => return Ok(()),
            }
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        advanced_query: bool,
        body: Option<&B>,
    ) -> DirectoryResult<reqwest::Response> {
        let token = self.token_cache.get_token().await?;

        let mut request: RequestBuilder = self
            .http_client
            .request(method, url)
            .bearer_auth(&token);

        if advanced_query {
            request = request.header("ConsistencyLevel", "eventual");
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &error_body))
    }
}

/// Builds the shared HTTP client used for both token and Graph requests.
pub(crate) fn build_http_client() -> DirectoryResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| DirectoryError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Maps a non-success Graph reply to a [`DirectoryError`].
fn error_from_response(status: StatusCode, body: &str) -> DirectoryError {
    let (code, message) = match serde_json::from_str::<ODataError>(body) {
        Ok(odata) => (odata.error.code, odata.error.message),
        Err(_) => (status.to_string(), body.to_string()),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DirectoryError::PermissionDenied(format!("{code}: {message}"))
        }
        StatusCode::NOT_FOUND => DirectoryError::NotFound(format!("{code}: {message}")),
        _ => DirectoryError::GraphApi {
            status: status.as_u16(),
            code,
            message,
        },
    }
}
