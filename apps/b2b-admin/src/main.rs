//! b2b-admin - B2B user administration for a Microsoft Entra ID tenant
//!
//! This CLI enables administrators to:
//! - Export the users of one department to CSV
//! - Invite external users listed in a CSV file, skipping existing ones
//! - Add B2B users of a partner company and job title to a group

use b2b_admin::commands;
use b2b_admin::error::{CliError, CliResult};
use b2b_admin::logging::{init_logging, LogFormat};
use clap::{Parser, Subcommand};

/// b2b-admin - Entra ID B2B user administration
#[derive(Parser)]
#[command(name = "b2b-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase diagnostic output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export users of a department to a CSV file
    ExportUsers(commands::export::ExportUsersArgs),

    /// Invite the users listed in a CSV file
    SendInvitations(commands::invite::SendInvitationsArgs),

    /// Add B2B users matching company and job title to a group
    EnrollGroup(commands::enroll::EnrollGroupArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result = match init_logging(cli.verbose, cli.log_format) {
        Ok(()) => run(cli).await,
        Err(e) => Err(CliError::Config(format!("Failed to initialize logging: {}", e))),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::ExportUsers(args) => commands::export::execute(args).await,
        Commands::SendInvitations(args) => commands::invite::execute(args).await,
        Commands::EnrollGroup(args) => commands::enroll::execute(args).await,
    }
}
