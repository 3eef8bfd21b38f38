//! Microsoft Entra ID directory access for B2B administration
//!
//! This crate talks to Microsoft Graph on behalf of the `b2b-admin` tool:
//! it authenticates an app registration against a tenant and exposes the
//! handful of reads and writes the B2B workflows need behind the
//! [`Directory`] trait.
//!
//! # Features
//!
//! - `OAuth2` client credentials authentication with token caching
//! - Exact-match user queries with transparent paging
//! - Group lookup by display name and member enumeration
//! - Idempotent group membership adds
//! - B2B invitations
//! - Multi-cloud support (Commercial, US Government, China, Germany)
//!
//! # Example
//!
//! ```no_run
//! use b2b_directory::{
//!     Directory, DirectoryConfig, DirectorySession, EntraCredentials, EntraDirectory,
//!     UserAttribute, UserFilter,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DirectoryConfig::builder()
//!     .tenant_id("your-tenant-id")
//!     .build()?;
//!
//! let credentials = EntraCredentials {
//!     client_id: "your-client-id".to_string(),
//!     client_secret: "your-client-secret".to_string().into(),
//! };
//!
//! let directory = EntraDirectory::connect(config, credentials, &["User.Read.All"]).await?;
//! let users = directory
//!     .find_users(&UserFilter::eq(UserAttribute::Department, "Managed SOC"))
//!     .await;
//! directory.disconnect().await;
//! println!("{} users", users?.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod directory;
mod error;
mod filter;
mod graph_client;
mod groups;
mod invitations;
mod users;

pub use auth::TokenCache;
pub use config::{
    DirectoryConfig, DirectoryConfigBuilder, EntraCloudEnvironment, EntraCredentials,
    DEFAULT_INVITE_REDIRECT_URL, MAX_PAGE_SIZE,
};
pub use directory::{Directory, DirectorySession, EntraDirectory};
pub use error::{DirectoryError, DirectoryResult};
pub use filter::{odata_string, UserAttribute, UserFilter};
pub use graph_client::GraphClient;
pub use groups::{Group, MembershipChange};
pub use invitations::{Invitation, InvitationRequest};
pub use users::{is_b2b_user, DirectoryUser, UserType, EXTERNAL_ACCOUNT_MARKER};
