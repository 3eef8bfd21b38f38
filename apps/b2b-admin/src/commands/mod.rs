//! CLI command implementations

use async_trait::async_trait;
use b2b_directory::{Directory, DirectorySession};

use crate::error::CliResult;

pub mod enroll;
pub mod export;
pub mod invite;

/// One command's work against an open directory
#[async_trait]
pub trait Workflow: Sync {
    type Output: Send;

    async fn run<D: Directory + ?Sized>(&self, directory: &D) -> CliResult<Self::Output>;
}

/// Run `workflow` on `session`, then release the session whatever the result
pub async fn run_in_session<S, W>(session: S, workflow: &W) -> CliResult<W::Output>
where
    S: DirectorySession,
    W: Workflow,
{
    let result = workflow.run(&session).await;
    session.disconnect().await;
    result
}
