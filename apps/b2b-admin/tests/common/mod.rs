//! Common test utilities for b2b-admin workflow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use b2b_directory::{
    Directory, DirectoryError, DirectoryResult, DirectorySession, DirectoryUser, Group,
    Invitation, InvitationRequest, MembershipChange, UserFilter, UserType,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory directory that records every call.
#[derive(Default)]
pub struct FakeDirectory {
    pub users: Vec<DirectoryUser>,
    pub groups: Vec<Group>,
    pub members: Mutex<HashSet<(String, String)>>,
    /// User IDs whose add is rejected by the service.
    pub failing_adds: HashSet<String>,
    /// Addresses whose invitation is rejected by the service.
    pub failing_invites: HashSet<String>,
    pub user_queries: Mutex<Vec<UserFilter>>,
    pub group_lookups: Mutex<Vec<String>>,
    pub invitations: Mutex<Vec<InvitationRequest>>,
    pub add_attempts: Mutex<Vec<(String, String)>>,
    /// Whether user queries are rejected by the service.
    pub failing_user_queries: bool,
    /// Set once the session is released; shared so it outlives the handle.
    pub released: Arc<AtomicBool>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: Vec<DirectoryUser>) -> Self {
        self.users = users;
        self
    }

    pub fn with_group(mut self, id: &str, display_name: &str) -> Self {
        self.groups.push(Group {
            id: id.to_string(),
            display_name: display_name.to_string(),
        });
        self
    }

    pub fn with_member(self, group_id: &str, user_id: &str) -> Self {
        self.members
            .lock()
            .unwrap()
            .insert((group_id.to_string(), user_id.to_string()));
        self
    }

    pub fn failing_add(mut self, user_id: &str) -> Self {
        self.failing_adds.insert(user_id.to_string());
        self
    }

    pub fn failing_invite(mut self, address: &str) -> Self {
        self.failing_invites.insert(address.to_string());
        self
    }

    pub fn failing_user_queries(mut self) -> Self {
        self.failing_user_queries = true;
        self
    }

    /// Flag that flips when the session is disconnected.
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }

    pub fn invited_addresses(&self) -> Vec<String> {
        self.invitations
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.invited_user_email_address.clone())
            .collect()
    }

    pub fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.members
            .lock()
            .unwrap()
            .contains(&(group_id.to_string(), user_id.to_string()))
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn find_users(&self, filter: &UserFilter) -> DirectoryResult<Vec<DirectoryUser>> {
        self.user_queries.lock().unwrap().push(filter.clone());
        if self.failing_user_queries {
            return Err(DirectoryError::GraphApi {
                status: 503,
                code: "ServiceUnavailable".to_string(),
                message: "The service is temporarily unavailable".to_string(),
            });
        }
        Ok(self
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn find_groups_by_display_name(
        &self,
        display_name: &str,
    ) -> DirectoryResult<Vec<Group>> {
        self.group_lookups
            .lock()
            .unwrap()
            .push(display_name.to_string());
        Ok(self
            .groups
            .iter()
            .filter(|g| g.display_name.eq_ignore_ascii_case(display_name))
            .cloned()
            .collect())
    }

    async fn list_group_member_ids(&self, group_id: &str) -> DirectoryResult<HashSet<String>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|(g, _)| g == group_id)
            .map(|(_, u)| u.clone())
            .collect())
    }

    async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> DirectoryResult<MembershipChange> {
        self.add_attempts
            .lock()
            .unwrap()
            .push((group_id.to_string(), user_id.to_string()));

        if self.failing_adds.contains(user_id) {
            return Err(DirectoryError::GraphApi {
                status: 400,
                code: "Request_BadRequest".to_string(),
                message: "Invalid object identifier".to_string(),
            });
        }

        let inserted = self
            .members
            .lock()
            .unwrap()
            .insert((group_id.to_string(), user_id.to_string()));
        Ok(if inserted {
            MembershipChange::Added
        } else {
            MembershipChange::AlreadyMember
        })
    }

    async fn invite_user(&self, request: &InvitationRequest) -> DirectoryResult<Invitation> {
        if self
            .failing_invites
            .contains(&request.invited_user_email_address)
        {
            return Err(DirectoryError::GraphApi {
                status: 400,
                code: "BadRequest".to_string(),
                message: "The invited user's email address is invalid".to_string(),
            });
        }

        let mut invitations = self.invitations.lock().unwrap();
        invitations.push(request.clone());
        Ok(Invitation {
            id: format!("inv-{}", invitations.len()),
            invited_user_email_address: request.invited_user_email_address.clone(),
            invite_redeem_url: None,
            status: Some("PendingAcceptance".to_string()),
        })
    }
}

#[async_trait]
impl DirectorySession for FakeDirectory {
    async fn disconnect(self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Internal member with mail and department set.
pub fn member(id: &str, mail: &str, department: &str) -> DirectoryUser {
    DirectoryUser {
        display_name: format!("User {}", id),
        mail: Some(mail.to_string()),
        department: Some(department.to_string()),
        ..DirectoryUser::new(id, mail)
    }
}

/// Guest invited from a partner tenant.
pub fn guest(id: &str, mail: &str, company: &str, job_title: &str) -> DirectoryUser {
    DirectoryUser {
        display_name: mail.to_string(),
        mail: Some(mail.to_string()),
        company_name: Some(company.to_string()),
        job_title: Some(job_title.to_string()),
        user_type: UserType::Guest,
        ..DirectoryUser::new(
            id,
            format!("{}#EXT#@contoso.onmicrosoft.com", mail.replace('@', "_")),
        )
    }
}

/// Member account provisioned from another tenant.
pub fn external_member(id: &str, mail: &str, company: &str, job_title: &str) -> DirectoryUser {
    DirectoryUser {
        user_type: UserType::Member,
        ..guest(id, mail, company, job_title)
    }
}
