//! Exact-match user filters and their `OData` rendering.

use std::fmt;

use crate::DirectoryUser;

/// User attributes that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAttribute {
    Department,
    CompanyName,
    JobTitle,
    Mail,
    UserPrincipalName,
    UserType,
}

impl UserAttribute {
    /// Graph property name of the attribute.
    #[must_use]
    pub fn graph_name(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::CompanyName => "companyName",
            Self::JobTitle => "jobTitle",
            Self::Mail => "mail",
            Self::UserPrincipalName => "userPrincipalName",
            Self::UserType => "userType",
        }
    }

    /// Reads the attribute from a user.
    #[must_use]
    pub fn value_of(self, user: &DirectoryUser) -> Option<&str> {
        match self {
            Self::Department => user.department.as_deref(),
            Self::CompanyName => user.company_name.as_deref(),
            Self::JobTitle => user.job_title.as_deref(),
            Self::Mail => user.mail.as_deref(),
            Self::UserPrincipalName => Some(user.user_principal_name.as_str()),
            Self::UserType => Some(user.user_type.as_str()),
        }
    }
}

impl fmt::Display for UserAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.graph_name())
    }
}

/// Conjunction of `attribute eq 'value'` conditions.
///
/// An empty filter matches every user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    conditions: Vec<(UserAttribute, String)>,
}

impl UserFilter {
    /// A filter matching every user.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter with a single equality condition.
    #[must_use]
    pub fn eq(attribute: UserAttribute, value: impl Into<String>) -> Self {
        Self::all().and_eq(attribute, value)
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn and_eq(mut self, attribute: UserAttribute, value: impl Into<String>) -> Self {
        self.conditions.push((attribute, value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders the filter as an `OData` `$filter` expression.
    ///
    /// Returns `None` for an empty filter.
    #[must_use]
    pub fn to_odata(&self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }

        Some(
            self.conditions
                .iter()
                .map(|(attr, value)| format!("{} eq {}", attr.graph_name(), odata_string(value)))
                .collect::<Vec<_>>()
                .join(" and "),
        )
    }

    /// Evaluates the filter locally with the directory's case-insensitive equality.
    #[must_use]
    pub fn matches(&self, user: &DirectoryUser) -> bool {
        self.conditions.iter().all(|(attr, expected)| {
            attr.value_of(user)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
        })
    }
}

/// Quotes a string literal for `OData`, doubling embedded single quotes.
#[must_use]
pub fn odata_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_renders_none() {
        assert_eq!(UserFilter::all().to_odata(), None);
        assert!(UserFilter::all().is_empty());
    }

    #[test]
    fn test_single_condition() {
        let filter = UserFilter::eq(UserAttribute::Department, "Managed SOC");
        assert_eq!(
            filter.to_odata().as_deref(),
            Some("department eq 'Managed SOC'")
        );
    }

    #[test]
    fn test_conjunction_and_escaping() {
        let filter = UserFilter::eq(UserAttribute::CompanyName, "O'Brien & Co")
            .and_eq(UserAttribute::JobTitle, "Analyst");
        assert_eq!(
            filter.to_odata().as_deref(),
            Some("companyName eq 'O''Brien & Co' and jobTitle eq 'Analyst'")
        );
    }

    #[test]
    fn test_local_match_is_case_insensitive() {
        let user = DirectoryUser {
            company_name: Some("ACME".to_string()),
            job_title: Some("analyst".to_string()),
            ..DirectoryUser::new("u1", "u1@contoso.com")
        };

        let filter = UserFilter::eq(UserAttribute::CompanyName, "Acme")
            .and_eq(UserAttribute::JobTitle, "Analyst");
        assert!(filter.matches(&user));

        let other = UserFilter::eq(UserAttribute::Department, "Sales");
        assert!(!other.matches(&user));
        assert!(UserFilter::all().matches(&user));
    }
}
