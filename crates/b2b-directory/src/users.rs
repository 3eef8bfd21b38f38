//! Directory users and B2B classification.

use tracing::{debug, info, instrument};

use crate::{DirectoryError, DirectoryResult, EntraDirectory, UserFilter};

/// Marker Entra inserts into the principal name of accounts homed in another tenant.
pub const EXTERNAL_ACCOUNT_MARKER: &str = "#EXT#";

/// User fields to select from Graph API.
pub(crate) const USER_SELECT_FIELDS: &str = "id,displayName,userPrincipalName,mail,\
    companyName,jobTitle,department,officeLocation,city,state,country,accountEnabled,userType";

/// Classification of a directory account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserType {
    Member,
    Guest,
    /// Any value the service may add later.
    Other(String),
}

impl UserType {
    /// Parses the Graph `userType` value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("member") {
            Self::Member
        } else if value.eq_ignore_ascii_case("guest") {
            Self::Guest
        } else {
            Self::Other(value.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Member => "Member",
            Self::Guest => "Guest",
            Self::Other(value) => value,
        }
    }
}

/// A directory user as read from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    /// Directory object ID.
    pub id: String,
    pub display_name: String,
    /// Sign-in name; external accounts carry [`EXTERNAL_ACCOUNT_MARKER`].
    pub user_principal_name: String,
    pub mail: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub office_location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub account_enabled: bool,
    pub user_type: UserType,
}

impl DirectoryUser {
    /// Creates an enabled member with only the identifying fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, user_principal_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            user_principal_name: user_principal_name.into(),
            mail: None,
            company_name: None,
            job_title: None,
            department: None,
            office_location: None,
            city: None,
            state: None,
            country: None,
            account_enabled: true,
            user_type: UserType::Member,
        }
    }

    /// Parses a user from the Graph API JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Parse`] if `id` or `userPrincipalName` is missing.
    pub fn from_json(value: &serde_json::Value) -> DirectoryResult<Self> {
        let text = |key: &str| value.get(key).and_then(|v| v.as_str()).map(String::from);

        Ok(Self {
            id: text("id").ok_or_else(|| DirectoryError::Parse("Missing user id".into()))?,
            user_principal_name: text("userPrincipalName")
                .ok_or_else(|| DirectoryError::Parse("Missing userPrincipalName".into()))?,
            display_name: text("displayName").unwrap_or_default(),
            mail: text("mail"),
            company_name: text("companyName"),
            job_title: text("jobTitle"),
            department: text("department"),
            office_location: text("officeLocation"),
            city: text("city"),
            state: text("state"),
            country: text("country"),
            account_enabled: value
                .get("accountEnabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
            user_type: text("userType")
                .map(|t| UserType::parse(&t))
                .unwrap_or(UserType::Member),
        })
    }
}

/// Returns true for guests and for members provisioned from another tenant.
#[must_use]
pub fn is_b2b_user(user: &DirectoryUser) -> bool {
    match user.user_type {
        UserType::Guest => true,
        UserType::Member => user
            .user_principal_name
            .to_ascii_uppercase()
            .contains(EXTERNAL_ACCOUNT_MARKER),
        UserType::Other(_) => false,
    }
}

impl EntraDirectory {
    /// Builds the user query URL for a filter.
    ///
    /// Filtered queries are sent as advanced queries (`$count=true`), which
    /// Graph requires for attributes like `companyName` and `department`.
    fn build_user_query_url(&self, filter: &UserFilter) -> String {
        let mut url = format!(
            "{}/users?$select={}&$top={}",
            self.graph_client().base_url(),
            USER_SELECT_FIELDS,
            self.config().page_size
        );

        if let Some(expr) = filter.to_odata() {
            url.push_str(&format!(
                "&$filter={}&$count=true",
                urlencoding::encode(&expr)
            ));
        }

        url
    }

    /// Fetches every user matching `filter`, following all pages.
    #[instrument(skip(self))]
    pub(crate) async fn query_users(
        &self,
        filter: &UserFilter,
    ) -> DirectoryResult<Vec<DirectoryUser>> {
        let url = self.build_user_query_url(filter);
        let mut users = Vec::new();

        self.graph_client()
            .get_paginated(&url, !filter.is_empty(), |page: Vec<serde_json::Value>| {
                debug!("Processing page with {} users", page.len());
                for value in page {
                    users.push(DirectoryUser::from_json(&value)?);
                }
                Ok(())
            })
            .await?;

        info!("User query returned {} users", users.len());
        Ok(users)
    }
}
