//! OAuth2 client credentials authentication for Microsoft Graph.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{DirectoryError, DirectoryResult, EntraCloudEnvironment, EntraCredentials};

/// OAuth2 token response from Azure AD.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// OAuth2 error response from Azure AD.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Holds the app credentials and the current access token for one tenant.
#[derive(Debug)]
pub struct TokenCache {
    credentials: EntraCredentials,
    cloud_environment: EntraCloudEnvironment,
    tenant_id: String,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    /// Grace period before expiry to trigger refresh.
    grace_period: Duration,
}

impl TokenCache {
    pub fn new(
        credentials: EntraCredentials,
        cloud_environment: EntraCloudEnvironment,
        tenant_id: String,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            cloud_environment,
            tenant_id,
            http_client,
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Gets a valid access token, acquiring a new one if needed.
    #[instrument(skip(self), fields(tenant_id = %self.tenant_id))]
    pub async fn get_token(&self) -> DirectoryResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Acquiring access token");
        let new_token = self.acquire_token().await?;
        let access_token = new_token.access_token.clone();
        *self.cached_token.write().await = Some(new_token);

        Ok(access_token)
    }

    /// Acquires a new access token using the client credentials flow.
    async fn acquire_token(&self) -> DirectoryResult<CachedToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.cloud_environment.login_endpoint(),
            self.tenant_id
        );
        let scope = format!("{}/.default", self.cloud_environment.graph_endpoint());

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose_secret()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DirectoryError::Auth(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(DirectoryError::Auth(format!(
                "Token request for tenant {} failed with status {status}: {detail}",
                self.tenant_id
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Auth(format!("Failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(
            "Acquired token, expires at {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Drops the cached token, so the next call authenticates again.
    pub async fn invalidate(&self) {
        *self.cached_token.write().await = None;
    }

    /// Returns true while a token is held.
    pub async fn has_token(&self) -> bool {
        self.cached_token.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry() {
        let token = CachedToken {
            access_token: "test".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        };

        assert!(!token.is_expired(Duration::minutes(5)));
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_cached_token_already_expired() {
        let token = CachedToken {
            access_token: "test".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        };

        assert!(token.is_expired(Duration::minutes(0)));
    }

    #[test]
    fn test_token_error_parsing() {
        let json = r#"{
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        }"#;
        let err: TokenErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error, "invalid_client");
        assert!(err.error_description.unwrap().starts_with("AADSTS7000215"));
    }
}
