//! Gateway to the GitHub REST API.
//!
//! [`UpstreamGateway`] is the single upstream handle the broker is built
//! around. The trait-based design enables mocking in tests while
//! [`OctocrabUpstreamGateway`] handles real HTTP requests.

pub mod app_auth;
mod client;
mod error_mapping;
mod http_utils;
mod upstream;

pub use app_auth::{AppTokenSigner, RsaAppTokenSigner};
pub use upstream::OctocrabUpstreamGateway;

use async_trait::async_trait;

use crate::github::error::BrokerError;
use crate::github::locator::{InstallationId, RepositoryFullName};
use crate::github::models::{
    InstallationRecord, InstallationTokenRecord, RepositoryRecord, TokenRequest, UserRecord,
};
use crate::github::pagination::{Page, PageRequest};

/// Upstream operations the broker needs from GitHub.
///
/// Listing calls return one page at a time; callers drive pagination.
/// Implementations must be safe to share between concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Fetch one page of installations visible to the principal.
    async fn installations_page(
        &self,
        request: PageRequest,
    ) -> Result<Page<InstallationRecord>, BrokerError>;

    /// Fetch one page of repositories the principal can reach through an
    /// installation.
    async fn installation_repositories_page(
        &self,
        installation_id: InstallationId,
        request: PageRequest,
    ) -> Result<Page<RepositoryRecord>, BrokerError>;

    /// Fetch the authenticated principal.
    async fn authenticated_user(&self) -> Result<UserRecord, BrokerError>;

    /// Look up a single repository by `owner/name`.
    async fn repository(
        &self,
        repository: &RepositoryFullName,
    ) -> Result<RepositoryRecord, BrokerError>;

    /// Create an installation access token for the given request.
    async fn create_installation_token(
        &self,
        installation_id: InstallationId,
        request: &TokenRequest,
    ) -> Result<InstallationTokenRecord, BrokerError>;
}
