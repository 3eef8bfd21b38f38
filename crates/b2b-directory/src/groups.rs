//! Group lookup and membership.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::filter::odata_string;
use crate::{DirectoryResult, EntraDirectory};

/// A directory group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Directory object ID.
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Outcome of adding a member to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The membership was created.
    Added,
    /// The user already was a member; nothing changed.
    AlreadyMember,
}

#[derive(Debug, Deserialize)]
struct DirectoryObjectRef {
    id: String,
}

impl EntraDirectory {
    /// Finds groups whose display name equals `display_name`.
    #[instrument(skip(self))]
    pub(crate) async fn query_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> DirectoryResult<Vec<Group>> {
        let filter = format!("displayName eq {}", odata_string(display_name));
        let url = format!(
            "{}/groups?$select=id,displayName&$filter={}&$top={}",
            self.graph_client().base_url(),
            urlencoding::encode(&filter),
            self.config().page_size
        );

        let mut groups = Vec::new();
        self.graph_client()
            .get_paginated(&url, false, |page: Vec<Group>| {
                groups.extend(page);
                Ok(())
            })
            .await?;

        debug!("{} group(s) named '{}'", groups.len(), display_name);
        Ok(groups)
    }

    /// Fetches the object IDs of the direct members of a group.
    #[instrument(skip(self))]
    pub(crate) async fn query_group_member_ids(
        &self,
        group_id: &str,
    ) -> DirectoryResult<HashSet<String>> {
        let url = format!(
            "{}/groups/{}/members?$select=id&$top={}",
            self.graph_client().base_url(),
            urlencoding::encode(group_id),
            self.config().page_size
        );

        let mut member_ids = HashSet::new();
        self.graph_client()
            .get_paginated(&url, false, |page: Vec<DirectoryObjectRef>| {
                member_ids.extend(page.into_iter().map(|m| m.id));
                Ok(())
            })
            .await?;

        debug!("Group {} has {} member(s)", group_id, member_ids.len());
        Ok(member_ids)
    }

    /// Adds a user to a group.
    #[instrument(skip(self))]
    pub(crate) async fn post_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> DirectoryResult<MembershipChange> {
        let base_url = self.graph_client().base_url();
        let url = format!(
            "{}/groups/{}/members/$ref",
            base_url,
            urlencoding::encode(group_id)
        );
        let body = serde_json::json!({
            "@odata.id": format!("{}/directoryObjects/{}", base_url, user_id)
        });

        match self.graph_client().post_no_content(&url, &body).await {
            Ok(()) => {
                info!("Added user {} to group {}", user_id, group_id);
                Ok(MembershipChange::Added)
            }
            Err(e) if e.is_already_exists() => {
                warn!("User {} is already a member of group {}", user_id, group_id);
                Ok(MembershipChange::AlreadyMember)
            }
            Err(e) => Err(e),
        }
    }
}
