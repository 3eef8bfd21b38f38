//! Send B2B invitations to addresses listed in a CSV file

use async_trait::async_trait;
use b2b_directory::{Directory, DirectoryUser, InvitationRequest, UserFilter};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use super::{run_in_session, Workflow};
use crate::config::ConnectionArgs;
use crate::error::{CliError, CliResult};
use crate::formats::csv::{read_invitation_file, InvitationCandidate};
use crate::output;
use crate::report::RunReport;

/// Graph application permissions the invitation run needs
pub const REQUIRED_PERMISSIONS: &[&str] = &["User.Read.All", "User.Invite.All"];

/// How a candidate is compared against existing users' mail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// Mail equals the candidate (case-insensitive)
    #[default]
    Exact,
    /// Mail contains the candidate (case-insensitive)
    Substring,
}

impl MatchMode {
    /// Compare two already lowercased addresses
    pub fn matches(self, mail: &str, candidate: &str) -> bool {
        match self {
            MatchMode::Exact => mail == candidate,
            MatchMode::Substring => mail.contains(candidate),
        }
    }
}

/// What to do when a candidate already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// Stop the whole run at the first existing user
    #[default]
    FailFast,
    /// Skip existing users and keep going
    Continue,
}

/// Arguments for the send-invitations command
#[derive(Args, Debug)]
pub struct SendInvitationsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// CSV file with a userPrincipalName column
    #[arg(long)]
    pub file: PathBuf,

    /// How to decide that a candidate already exists
    #[arg(long, value_enum, default_value_t = MatchMode::Exact)]
    pub match_mode: MatchMode,

    /// What to do when a candidate already exists
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::FailFast)]
    pub on_duplicate: DuplicatePolicy,

    /// Redirect URL for invitees; `{tenant_id}` is substituted
    #[arg(long)]
    pub redirect_url: Option<String>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Settings for one invitation run
#[derive(Debug, Clone)]
pub struct InvitationOptions {
    pub match_mode: MatchMode,
    pub duplicate_policy: DuplicatePolicy,
    pub redirect_url: String,
}

/// Existing users keyed by lowercased mail, built once per run
#[derive(Debug)]
pub struct MailIndex<'a> {
    entries: Vec<(String, &'a DirectoryUser)>,
}

impl<'a> MailIndex<'a> {
    /// Index every user that has a mail address
    pub fn new(snapshot: &'a [DirectoryUser]) -> Self {
        let entries = snapshot
            .iter()
            .filter_map(|user| user.mail.as_deref().map(|mail| (mail.to_lowercase(), user)))
            .collect();
        Self { entries }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Find an existing user whose mail matches the candidate, ignoring case
    pub fn find(&self, candidate: &str, mode: MatchMode) -> Option<&'a DirectoryUser> {
        let candidate = candidate.to_lowercase();
        self.entries
            .iter()
            .find(|(mail, _)| mode.matches(mail, &candidate))
            .map(|(_, user)| *user)
    }
}

/// Invite every candidate not already present, in input order
///
/// The directory is read once up front; every candidate is checked against
/// that snapshot. Under [`DuplicatePolicy::FailFast`] the first existing user
/// ends the run with [`CliError::DuplicateUser`]; invitations already sent stay sent.
pub async fn send_invitations<D: Directory + ?Sized>(
    directory: &D,
    candidates: &[InvitationCandidate],
    options: &InvitationOptions,
) -> CliResult<RunReport> {
    let snapshot = directory.find_users(&UserFilter::all()).await?;
    let existing_users = MailIndex::new(&snapshot);
    info!(
        "Checking {} candidates against {} existing users ({} with mail)",
        candidates.len(),
        snapshot.len(),
        existing_users.len()
    );

    let mut report = RunReport::new("send-invitations", candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        let address = &candidate.user_principal_name;

        if let Some(existing) = existing_users.find(address, options.match_mode) {
            let existing_mail = existing.mail.clone().unwrap_or_default();
            warn!(line = candidate.line, "{} already exists as {}", address, existing_mail);

            match options.duplicate_policy {
                DuplicatePolicy::FailFast => {
                    return Err(CliError::DuplicateUser {
                        candidate: address.clone(),
                        existing_mail,
                    });
                }
                DuplicatePolicy::Continue => {
                    output::warn(format!("{} already exists, skipping", address));
                    report.add_skipped(
                        index,
                        address.clone(),
                        Some(existing.id.clone()),
                        format!("already exists as {}", existing_mail),
                    );
                    continue;
                }
            }
        }

        let request = InvitationRequest::for_address(address.as_str(), options.redirect_url.as_str());
        let invitation = directory.invite_user(&request).await?;

        output::status(format!("Invited {}", address));
        report.add_success(index, address.clone(), Some(invitation.id));
    }

    Ok(report)
}

/// Invitation run over a validated candidate list
#[derive(Debug, Clone)]
pub struct SendInvitations {
    pub candidates: Vec<InvitationCandidate>,
    pub options: InvitationOptions,
}

#[async_trait]
impl Workflow for SendInvitations {
    type Output = RunReport;

    async fn run<D: Directory + ?Sized>(&self, directory: &D) -> CliResult<RunReport> {
        send_invitations(directory, &self.candidates, &self.options).await
    }
}

/// Execute the send-invitations command
pub async fn execute(args: SendInvitationsArgs) -> CliResult<()> {
    let candidates = read_invitation_file(&args.file)?;
    if candidates.is_empty() {
        output::warn(format!("No candidates in {}", args.file.display()));
        return Ok(());
    }

    let directory = args
        .connection
        .connect(args.redirect_url.as_deref(), REQUIRED_PERMISSIONS)
        .await?;
    let workflow = SendInvitations {
        candidates,
        options: InvitationOptions {
            match_mode: args.match_mode,
            duplicate_policy: args.on_duplicate,
            redirect_url: directory.config().redirect_url(),
        },
    };

    let report = run_in_session(directory, &workflow).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::success(format!(
            "Invited: {}, Already existing: {}",
            report.success_count, report.skipped_count
        ));
    }

    Ok(())
}
