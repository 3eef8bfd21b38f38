//! CSV handling for user exports and invitation input
//!
//! - Export: one row per directory user with a fixed 11-column schema
//! - Invitations: any CSV with a `userPrincipalName` column; other columns are ignored

use crate::error::{CliError, CliResult};
use b2b_directory::DirectoryUser;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row of an exported user file, in column order
pub const EXPORT_COLUMNS: [&str; 11] = [
    "DisplayName",
    "UserPrincipalName",
    "Mail",
    "Department",
    "JobTitle",
    "OfficeLocation",
    "City",
    "State",
    "Country",
    "AccountEnabled",
    "Id",
];

/// Column that carries the invitee address in an invitation file
pub const INVITATION_COLUMN: &str = "userPrincipalName";

/// CSV record for an exported user
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UserExportRecord {
    pub display_name: String,
    pub user_principal_name: String,
    pub mail: String,
    pub department: String,
    pub job_title: String,
    pub office_location: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub account_enabled: bool,
    pub id: String,
}

impl From<&DirectoryUser> for UserExportRecord {
    fn from(user: &DirectoryUser) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            display_name: user.display_name.clone(),
            user_principal_name: user.user_principal_name.clone(),
            mail: text(&user.mail),
            department: text(&user.department),
            job_title: text(&user.job_title),
            office_location: text(&user.office_location),
            city: text(&user.city),
            state: text(&user.state),
            country: text(&user.country),
            account_enabled: user.account_enabled,
            id: user.id.clone(),
        }
    }
}

/// Write users as CSV, returning the number of data rows written
pub fn write_users_csv<W: Write>(users: &[DirectoryUser], writer: W) -> CliResult<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Header comes from EXPORT_COLUMNS rather than serde field names
    wtr.write_record(EXPORT_COLUMNS)
        .map_err(|e| CliError::Io(format!("CSV write error: {}", e)))?;

    for user in users {
        wtr.serialize(UserExportRecord::from(user))
            .map_err(|e| CliError::Io(format!("CSV write error: {}", e)))?;
    }

    wtr.flush()
        .map_err(|e| CliError::Io(format!("Failed to flush CSV: {}", e)))?;

    Ok(users.len())
}

/// Create or truncate `path` and export users into it
pub fn write_users_file(users: &[DirectoryUser], path: &Path) -> CliResult<usize> {
    let file = File::create(path).map_err(|e| {
        CliError::Io(format!("Cannot create '{}': {}", path.display(), e))
    })?;
    write_users_csv(users, file)
}

/// One invitee read from an invitation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationCandidate {
    /// Line number in the source file (header is line 1)
    pub line: u64,
    pub user_principal_name: String,
}

/// Parse invitation file content
///
/// The whole file is validated before anything is returned: a missing
/// `userPrincipalName` column or a blank value on any row is an error.
/// The column name is matched case-insensitively.
pub fn read_invitation_candidates(content: &str) -> CliResult<Vec<InvitationCandidate>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| CliError::Validation(format!("CSV parse error: {}", e)))?;
    let column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(INVITATION_COLUMN))
        .ok_or_else(|| {
            CliError::Validation(format!(
                "CSV missing required column: {}",
                INVITATION_COLUMN
            ))
        })?;

    let mut candidates = Vec::new();
    for result in rdr.records() {
        let record =
            result.map_err(|e| CliError::Validation(format!("CSV parse error: {}", e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.iter().all(str::is_empty) {
            continue;
        }

        match record.get(column).filter(|v| !v.is_empty()) {
            Some(value) => candidates.push(InvitationCandidate {
                line,
                user_principal_name: value.to_string(),
            }),
            None => {
                return Err(CliError::Validation(format!(
                    "line {}: empty {}",
                    line, INVITATION_COLUMN
                )))
            }
        }
    }

    Ok(candidates)
}

/// Read and parse an invitation file from disk
pub fn read_invitation_file(path: &Path) -> CliResult<Vec<InvitationCandidate>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    read_invitation_candidates(&content)
}
