//! The directory seam and its Microsoft Graph session.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::graph_client::build_http_client;
use crate::{
    DirectoryConfig, DirectoryResult, DirectoryUser, EntraCredentials, GraphClient, Group,
    Invitation, InvitationRequest, MembershipChange, TokenCache, UserFilter,
};

/// Read and write operations the administration workflows need from a directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns every user matching `filter`.
    async fn find_users(&self, filter: &UserFilter) -> DirectoryResult<Vec<DirectoryUser>>;

    /// Returns groups whose display name equals `display_name`, in service order.
    async fn find_groups_by_display_name(&self, display_name: &str)
        -> DirectoryResult<Vec<Group>>;

    /// Returns the object IDs of the group's direct members.
    async fn list_group_member_ids(&self, group_id: &str) -> DirectoryResult<HashSet<String>>;

    /// Adds a user to a group. Adding an existing member is not an error.
    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> DirectoryResult<MembershipChange>;

    /// Creates a B2B invitation.
    async fn invite_user(&self, request: &InvitationRequest) -> DirectoryResult<Invitation>;
}

/// A directory handle that holds an authenticated session until released.
#[async_trait]
pub trait DirectorySession: Directory + Sized {
    /// Ends the session. The handle cannot be used afterwards.
    async fn disconnect(self);
}

/// An authenticated Microsoft Graph session for one tenant.
///
/// Obtained with [`EntraDirectory::connect`] and released with
/// [`DirectorySession::disconnect`].
#[derive(Debug)]
pub struct EntraDirectory {
    config: DirectoryConfig,
    token_cache: Arc<TokenCache>,
    graph_client: GraphClient,
}

impl EntraDirectory {
    /// Authenticates against the tenant and opens a session.
    ///
    /// `permissions` lists the Graph application permissions the caller is
    /// about to exercise; they are logged so a consent gap is easy to spot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DirectoryError::Auth`] if no token can be acquired.
    #[instrument(skip(config, credentials), fields(tenant_id = %config.tenant_id))]
    pub async fn connect(
        config: DirectoryConfig,
        credentials: EntraCredentials,
        permissions: &[&str],
    ) -> DirectoryResult<Self> {
        info!(
            permissions = %permissions.join(","),
            "Connecting to tenant {}", config.tenant_id
        );

        let token_cache = Arc::new(TokenCache::new(
            credentials,
            config.cloud_environment.clone(),
            config.tenant_id.clone(),
            build_http_client()?,
        ));
        let graph_client = GraphClient::new(
            Arc::clone(&token_cache),
            config.cloud_environment.clone(),
            config.api_version.clone(),
        )?;

        token_cache.get_token().await?;
        info!("Connected to tenant {}", config.tenant_id);

        Ok(Self {
            config,
            token_cache,
            graph_client,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// The token cache backing this session.
    #[must_use]
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.token_cache
    }

    pub(crate) fn graph_client(&self) -> &GraphClient {
        &self.graph_client
    }
}

#[async_trait]
impl Directory for EntraDirectory {
    async fn find_users(&self, filter: &UserFilter) -> DirectoryResult<Vec<DirectoryUser>> {
        self.query_users(filter).await
    }

    async fn find_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> DirectoryResult<Vec<Group>> {
        self.query_groups_by_display_name(display_name).await
    }

    async fn list_group_member_ids(&self, group_id: &str) -> DirectoryResult<HashSet<String>> {
        self.query_group_member_ids(group_id).await
    }

    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> DirectoryResult<MembershipChange> {
        self.post_group_member(group_id, user_id).await
    }

    async fn invite_user(&self, request: &InvitationRequest) -> DirectoryResult<Invitation> {
        self.post_invitation(request).await
    }
}

#[async_trait]
impl DirectorySession for EntraDirectory {
    /// Discards the access token.
    async fn disconnect(self) {
        self.token_cache.invalidate().await;
        info!("Disconnected from tenant {}", self.config.tenant_id);
    }
}
