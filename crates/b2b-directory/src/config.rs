//! Tenant, cloud and credential configuration.

use secrecy::SecretString;
use std::fmt;

use crate::{DirectoryError, DirectoryResult};

/// Default redirect URL handed to invited users, `{tenant_id}` is substituted.
pub const DEFAULT_INVITE_REDIRECT_URL: &str =
    "https://myapplications.microsoft.com/?tenantid={tenant_id}";

/// Largest page size accepted by the Graph `users` endpoint.
pub const MAX_PAGE_SIZE: u32 = 999;

/// National cloud hosting the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntraCloudEnvironment {
    /// Global Azure cloud.
    #[default]
    Commercial,
    /// Azure US Government (GCC High / DoD).
    UsGovernment,
    /// Azure China operated by 21Vianet.
    China,
    /// Azure Germany.
    Germany,
    /// Explicit endpoints, used against sovereign deployments and mock servers.
    Custom {
        login_endpoint: String,
        graph_endpoint: String,
    },
}

impl EntraCloudEnvironment {
    /// Returns the Azure AD login authority for this cloud.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Germany => "https://login.microsoftonline.de",
            Self::Custom { login_endpoint, .. } => login_endpoint,
        }
    }

    /// Returns the Microsoft Graph root for this cloud.
    #[must_use]
    pub fn graph_endpoint(&self) -> &str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
            Self::Custom { graph_endpoint, .. } => graph_endpoint,
        }
    }
}

/// Application credentials for the `OAuth2` client credentials flow.
pub struct EntraCredentials {
    /// Application (client) ID of the app registration.
    pub client_id: String,
    /// Client secret of the app registration.
    pub client_secret: SecretString,
}

impl fmt::Debug for EntraCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntraCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Directory connection settings for one tenant.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Tenant (directory) ID.
    pub tenant_id: String,
    /// Cloud hosting the tenant.
    pub cloud_environment: EntraCloudEnvironment,
    /// Graph API version segment, e.g. `v1.0`.
    pub api_version: String,
    /// `$top` used for paged queries.
    pub page_size: u32,
    /// Redirect URL template for invitations.
    pub invite_redirect_url: String,
}

impl DirectoryConfig {
    /// Starts a builder with default settings.
    #[must_use]
    pub fn builder() -> DirectoryConfigBuilder {
        DirectoryConfigBuilder::default()
    }

    /// Returns the redirect URL with the tenant substituted.
    #[must_use]
    pub fn redirect_url(&self) -> String {
        self.invite_redirect_url
            .replace("{tenant_id}", &self.tenant_id)
    }
}

/// Builder for [`DirectoryConfig`].
#[derive(Debug, Clone)]
pub struct DirectoryConfigBuilder {
    tenant_id: Option<String>,
    cloud_environment: EntraCloudEnvironment,
    api_version: String,
    page_size: u32,
    invite_redirect_url: String,
}

impl Default for DirectoryConfigBuilder {
    fn default() -> Self {
        Self {
            tenant_id: None,
            cloud_environment: EntraCloudEnvironment::Commercial,
            api_version: "v1.0".to_string(),
            page_size: MAX_PAGE_SIZE,
            invite_redirect_url: DEFAULT_INVITE_REDIRECT_URL.to_string(),
        }
    }
}

impl DirectoryConfigBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub fn cloud_environment(mut self, cloud_environment: EntraCloudEnvironment) -> Self {
        self.cloud_environment = cloud_environment;
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn invite_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.invite_redirect_url = url.into();
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Config`] when the tenant is missing or blank,
    /// the page size is outside `1..=999`, or the redirect URL does not parse.
    pub fn build(self) -> DirectoryResult<DirectoryConfig> {
        let tenant_id = self
            .tenant_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DirectoryError::Config("tenant_id is required".into()))?;

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DirectoryError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if self.api_version.trim().is_empty() {
            return Err(DirectoryError::Config("api_version must not be empty".into()));
        }

        let config = DirectoryConfig {
            tenant_id,
            cloud_environment: self.cloud_environment,
            api_version: self.api_version,
            page_size: self.page_size,
            invite_redirect_url: self.invite_redirect_url,
        };

        url::Url::parse(&config.redirect_url()).map_err(|e| {
            DirectoryError::Config(format!("invalid invitation redirect URL: {e}"))
        })?;

        Ok(config)
    }
}
