//! Export directory users of one department to CSV

use async_trait::async_trait;
use b2b_directory::{Directory, UserAttribute, UserFilter};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{run_in_session, Workflow};
use crate::config::ConnectionArgs;
use crate::error::{CliError, CliResult};
use crate::formats::csv::write_users_file;
use crate::output;

/// Graph application permissions the export needs
pub const REQUIRED_PERMISSIONS: &[&str] = &["User.Read.All"];

/// Arguments for the export-users command
#[derive(Args, Debug)]
pub struct ExportUsersArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Department to export (exact match)
    #[arg(long)]
    pub department_name: String,

    /// CSV file to write; overwritten if it exists
    #[arg(long)]
    pub output_file: PathBuf,
}

/// What an export run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No user matched; no file was touched
    NoMatches,
    /// File written with one row per matching user
    Written { path: PathBuf, rows: usize },
}

/// Query users in `department` and write them to `output_file`
pub async fn export_users<D: Directory + ?Sized>(
    directory: &D,
    department: &str,
    output_file: &Path,
) -> CliResult<ExportOutcome> {
    let filter = UserFilter::eq(UserAttribute::Department, department);
    let users = directory.find_users(&filter).await?;

    if users.is_empty() {
        return Ok(ExportOutcome::NoMatches);
    }

    info!(
        "Exporting {} users from department '{}'",
        users.len(),
        department
    );
    let rows = write_users_file(&users, output_file)?;

    Ok(ExportOutcome::Written {
        path: output_file.to_path_buf(),
        rows,
    })
}

/// Department export bound to its output file
#[derive(Debug, Clone)]
pub struct ExportUsers {
    pub department: String,
    pub output_file: PathBuf,
}

impl ExportUsers {
    /// Reject a blank department; any other value is matched exactly as given
    pub fn new(department: String, output_file: PathBuf) -> CliResult<Self> {
        if department.trim().is_empty() {
            return Err(CliError::Validation(
                "--department-name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            department,
            output_file,
        })
    }
}

#[async_trait]
impl Workflow for ExportUsers {
    type Output = ExportOutcome;

    async fn run<D: Directory + ?Sized>(&self, directory: &D) -> CliResult<ExportOutcome> {
        export_users(directory, &self.department, &self.output_file).await
    }
}

/// Execute the export-users command
pub async fn execute(args: ExportUsersArgs) -> CliResult<()> {
    let workflow = ExportUsers::new(args.department_name, args.output_file)?;
    let directory = args.connection.connect(None, REQUIRED_PERMISSIONS).await?;
    let department = &workflow.department;

    match run_in_session(directory, &workflow).await? {
        ExportOutcome::NoMatches => {
            output::warn(format!("No users found in department '{}'", department));
        }
        ExportOutcome::Written { path, rows } => {
            output::success(format!("Exported {} users to {}", rows, path.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_department_rejected() {
        let err = ExportUsers::new("   ".to_string(), PathBuf::from("out.csv")).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_department_kept_verbatim() {
        let workflow = ExportUsers::new(" Managed SOC ".to_string(), PathBuf::from("out.csv"))
            .unwrap();
        assert_eq!(workflow.department, " Managed SOC ");
    }
}
