//! Connection settings shared by all commands

use b2b_directory::{
    DirectoryConfig, EntraCloudEnvironment, EntraCredentials, EntraDirectory, MAX_PAGE_SIZE,
};
use clap::{Args, ValueEnum};
use std::fmt;

use crate::error::CliResult;

/// National cloud selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Cloud {
    #[default]
    Commercial,
    UsGovernment,
    China,
    Germany,
}

impl From<Cloud> for EntraCloudEnvironment {
    fn from(cloud: Cloud) -> Self {
        match cloud {
            Cloud::Commercial => EntraCloudEnvironment::Commercial,
            Cloud::UsGovernment => EntraCloudEnvironment::UsGovernment,
            Cloud::China => EntraCloudEnvironment::China,
            Cloud::Germany => EntraCloudEnvironment::Germany,
        }
    }
}

/// Tenant and app registration used to reach the directory
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// Tenant (directory) ID
    #[arg(long, env = "B2B_TENANT_ID")]
    pub tenant_id: String,

    /// Application (client) ID of the app registration
    #[arg(long, env = "B2B_CLIENT_ID")]
    pub client_id: String,

    /// Client secret of the app registration
    #[arg(long, env = "B2B_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Cloud hosting the tenant
    #[arg(long, env = "B2B_CLOUD", value_enum, default_value_t = Cloud::Commercial)]
    pub cloud: Cloud,

    /// Microsoft Graph API version
    #[arg(long, default_value = "v1.0")]
    pub graph_api_version: String,

    /// Page size for directory queries (1-999)
    #[arg(long, default_value_t = MAX_PAGE_SIZE)]
    pub page_size: u32,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("cloud", &self.cloud)
            .field("graph_api_version", &self.graph_api_version)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl ConnectionArgs {
    /// Build the directory configuration, optionally overriding the invitation redirect URL
    pub fn directory_config(&self, redirect_url: Option<&str>) -> CliResult<DirectoryConfig> {
        let mut builder = DirectoryConfig::builder()
            .tenant_id(&self.tenant_id)
            .cloud_environment(self.cloud.into())
            .api_version(&self.graph_api_version)
            .page_size(self.page_size);

        if let Some(url) = redirect_url {
            builder = builder.invite_redirect_url(url);
        }

        Ok(builder.build()?)
    }

    pub fn credentials(&self) -> EntraCredentials {
        EntraCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone().into(),
        }
    }

    /// Open an authenticated session; the caller must `disconnect` it on every path
    pub async fn connect(
        &self,
        redirect_url: Option<&str>,
        permissions: &[&str],
    ) -> CliResult<EntraDirectory> {
        let config = self.directory_config(redirect_url)?;
        Ok(EntraDirectory::connect(config, self.credentials(), permissions).await?)
    }
}
