//! B2B invitations.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{DirectoryResult, EntraDirectory};

/// Request body for `POST /invitations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub invited_user_email_address: String,
    pub invited_user_display_name: String,
    /// Where the invitee lands after redeeming.
    pub invite_redirect_url: String,
    /// Whether the service emails the invitation.
    pub send_invitation_message: bool,
}

impl InvitationRequest {
    /// Invitation addressed to `address`, which also serves as the display name.
    #[must_use]
    pub fn for_address(address: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            invited_user_display_name: address.clone(),
            invited_user_email_address: address,
            invite_redirect_url: redirect_url.into(),
            send_invitation_message: true,
        }
    }
}

/// Invitation created by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub invited_user_email_address: String,
    #[serde(default)]
    pub invite_redeem_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl EntraDirectory {
    #[instrument(skip(self, request), fields(invitee = %request.invited_user_email_address))]
    pub(crate) async fn post_invitation(
        &self,
        request: &InvitationRequest,
    ) -> DirectoryResult<Invitation> {
        let url = format!("{}/invitations", self.graph_client().base_url());

        let invitation: Invitation = self.graph_client().post(&url, request).await?;

        info!(
            "Invitation {} created for {}",
            invitation.id, invitation.invited_user_email_address
        );

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_request_serialization() {
        let request = InvitationRequest::for_address(
            "jane@acme.com",
            "https://myapplications.microsoft.com/?tenantid=t1",
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["invitedUserEmailAddress"], "jane@acme.com");
        assert_eq!(json["invitedUserDisplayName"], "jane@acme.com");
        assert_eq!(
            json["inviteRedirectUrl"],
            "https://myapplications.microsoft.com/?tenantid=t1"
        );
        assert_eq!(json["sendInvitationMessage"], true);
    }

    #[test]
    fn test_invitation_response_parsing() {
        let json = serde_json::json!({
            "id": "inv-1",
            "invitedUserEmailAddress": "jane@acme.com",
            "inviteRedeemUrl": "https://login.microsoftonline.com/redeem?x=1",
            "status": "PendingAcceptance",
            "invitedUser": { "id": "user-9" }
        });

        let invitation: Invitation = serde_json::from_value(json).unwrap();
        assert_eq!(invitation.id, "inv-1");
        assert_eq!(invitation.status.as_deref(), Some("PendingAcceptance"));
    }
}
