//! Add B2B users matching company and job title to a group

use async_trait::async_trait;
use b2b_directory::{
    is_b2b_user, Directory, Group, MembershipChange, UserAttribute, UserFilter,
};
use clap::Args;
use tracing::{info, warn};

use super::{run_in_session, Workflow};
use crate::config::ConnectionArgs;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::report::RunReport;

/// Graph application permissions the enrollment needs
pub const REQUIRED_PERMISSIONS: &[&str] =
    &["User.Read.All", "Group.Read.All", "GroupMember.ReadWrite.All"];

/// Arguments for the enroll-group command
#[derive(Args, Debug)]
pub struct EnrollGroupArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Company name to match (exact)
    #[arg(long)]
    pub company_name: String,

    /// Job title to match (exact)
    #[arg(long)]
    pub job_title: String,

    /// Display name of the target group
    #[arg(long)]
    pub group_name: String,

    /// Object ID of the target group, to pick among groups sharing the display name
    #[arg(long)]
    pub group_id: Option<String>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// How to pick the target group when several share its display name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupSelection {
    /// Take the first group the service returns, with a warning
    #[default]
    FirstMatch,
    /// Take the group with this object ID
    ById(String),
}

/// Which users to enroll and where
#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    pub company_name: String,
    pub job_title: String,
    pub group_name: String,
    pub selection: GroupSelection,
}

/// What an enrollment run did
#[derive(Debug, Clone)]
pub enum EnrollmentOutcome {
    /// No B2B user matched; the group was never looked up
    NoMatches,
    Completed { group: Group, report: RunReport },
}

/// Pick the target group among display-name matches
pub fn resolve_group(
    group_name: &str,
    mut candidates: Vec<Group>,
    selection: &GroupSelection,
) -> CliResult<Group> {
    if candidates.is_empty() {
        return Err(CliError::NotFound(format!(
            "no group named '{}'",
            group_name
        )));
    }

    match selection {
        GroupSelection::ById(id) => candidates
            .into_iter()
            .find(|g| g.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| {
                CliError::NotFound(format!(
                    "no group named '{}' has ID {}",
                    group_name, id
                ))
            }),
        GroupSelection::FirstMatch => {
            if candidates.len() > 1 {
                warn!(
                    "{} groups named '{}', using the first",
                    candidates.len(),
                    group_name
                );
                output::warn(format!(
                    "{} groups are named '{}'; using {}. Pass --group-id to choose.",
                    candidates.len(),
                    group_name,
                    candidates[0].id
                ));
            }
            Ok(candidates.swap_remove(0))
        }
    }
}

/// Enroll matching B2B users into the target group
///
/// Each add is attempted independently; a failed add is recorded and the
/// run moves on to the next user.
pub async fn enroll_group<D: Directory + ?Sized>(
    directory: &D,
    request: &EnrollmentRequest,
) -> CliResult<EnrollmentOutcome> {
    let filter = UserFilter::eq(UserAttribute::CompanyName, &request.company_name)
        .and_eq(UserAttribute::JobTitle, &request.job_title);
    let users: Vec<_> = directory
        .find_users(&filter)
        .await?
        .into_iter()
        .filter(is_b2b_user)
        .collect();

    if users.is_empty() {
        return Ok(EnrollmentOutcome::NoMatches);
    }
    info!("{} B2B users match", users.len());

    let groups = directory
        .find_groups_by_display_name(&request.group_name)
        .await?;
    let group = resolve_group(&request.group_name, groups, &request.selection)?;
    let members = directory.list_group_member_ids(&group.id).await?;

    let mut report = RunReport::new("enroll-group", users.len());

    for (index, user) in users.into_iter().enumerate() {
        let name = user.user_principal_name;

        if members.contains(&user.id) {
            report.add_skipped(index, name, Some(user.id), "already a member".to_string());
            continue;
        }

        match directory.add_group_member(&group.id, &user.id).await {
            Ok(MembershipChange::Added) => {
                output::status(format!("Added {}", name));
                report.add_success(index, name, Some(user.id));
            }
            Ok(MembershipChange::AlreadyMember) => {
                report.add_skipped(index, name, Some(user.id), "already a member".to_string());
            }
            Err(e) => {
                warn!("Failed to add {} to {}: {}", name, group.id, e);
                output::warn(format!("Failed to add {}: {}", name, e));
                report.add_failure(index, name, Some(user.id), e.to_string());
            }
        }
    }

    Ok(EnrollmentOutcome::Completed { group, report })
}

#[async_trait]
impl Workflow for EnrollmentRequest {
    type Output = EnrollmentOutcome;

    async fn run<D: Directory + ?Sized>(&self, directory: &D) -> CliResult<EnrollmentOutcome> {
        enroll_group(directory, self).await
    }
}

/// Execute the enroll-group command
pub async fn execute(args: EnrollGroupArgs) -> CliResult<()> {
    let request = EnrollmentRequest {
        company_name: args.company_name,
        job_title: args.job_title,
        group_name: args.group_name,
        selection: args
            .group_id
            .map(GroupSelection::ById)
            .unwrap_or_default(),
    };

    let directory = args.connection.connect(None, REQUIRED_PERMISSIONS).await?;

    match run_in_session(directory, &request).await? {
        EnrollmentOutcome::NoMatches => {
            output::warn(format!(
                "No B2B users found with company '{}' and job title '{}'",
                request.company_name, request.job_title
            ));
        }
        EnrollmentOutcome::Completed { group, report } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::success(format!(
                    "Group '{}' ({}): Added: {}, Skipped: {}, Failed: {}",
                    group.display_name,
                    group.id,
                    report.success_count,
                    report.skipped_count,
                    report.failure_count
                ));
            }
            if report.has_failures() {
                for item in report.failed_items() {
                    output::warn(format!(
                        "Not added: {} ({})",
                        item.name,
                        item.detail.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
        }
    }

    Ok(())
}
