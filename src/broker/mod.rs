//! Scoped credential broker.
//!
//! [`CredentialBroker`] is the capability surface handed to collaborators.
//! [`GitHubAppBroker`] implements it on top of a single injected
//! [`UpstreamGateway`] by delegating to four independent components:
//!
//! - [`InstallationDirectory`] lists installations visible to the principal.
//! - [`RepositoryDirectory`] lists repositories and their permission flags.
//! - [`IdentityResolver`] resolves the principal's login.
//! - [`CredentialIssuer`] mints read-only, single-repository tokens.
//!
//! The broker holds no mutable state, so every operation can run
//! concurrently from many tasks.

mod identity;
mod installations;
mod issuer;
mod repositories;

pub use identity::IdentityResolver;
pub use installations::InstallationDirectory;
pub use issuer::CredentialIssuer;
pub use repositories::RepositoryDirectory;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::github::error::BrokerError;
use crate::github::gateway::UpstreamGateway;
use crate::github::locator::InstallationId;
use crate::github::models::{InstallationSet, PermissionDescriptor, ScopedToken};
use crate::github::pagination::PageRequest;
use crate::telemetry::{NoopTelemetrySink, TelemetrySink};

/// Default bound on each upstream step.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Operations the broker exposes to collaborators.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Lists installations reachable with the principal's credentials.
    async fn list_installations_for_principal(&self) -> Result<InstallationSet, BrokerError>;

    /// Lists full names of repositories visible under an installation.
    async fn list_repositories_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Vec<String>, BrokerError>;

    /// Maps each repository visible under an installation to its permission
    /// flags.
    async fn list_repository_permissions(
        &self,
        installation_id: InstallationId,
    ) -> Result<HashMap<String, PermissionDescriptor>, BrokerError>;

    /// Resolves the principal's canonical login.
    async fn get_identity(&self) -> Result<String, BrokerError>;

    /// Mints a read-only token restricted to `repo_full_name`.
    async fn issue_scoped_token(
        &self,
        installation_id: InstallationId,
        repo_full_name: &str,
    ) -> Result<ScopedToken, BrokerError>;
}

/// Page size and per-step timeout shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerSettings {
    first_page: PageRequest,
    request_timeout: Duration,
}

impl BrokerSettings {
    /// Validates and builds settings.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidArgument`] when `per_page` is outside
    /// `1..=100` or `request_timeout` is zero.
    pub fn new(per_page: u8, request_timeout: Duration) -> Result<Self, BrokerError> {
        let first_page = PageRequest::first(per_page)?;
        if request_timeout.is_zero() {
            return Err(BrokerError::InvalidArgument {
                message: "request timeout must be greater than zero".to_owned(),
            });
        }

        Ok(Self {
            first_page,
            request_timeout,
        })
    }

    /// Request for the first page of any listing.
    #[must_use]
    pub const fn first_page(&self) -> PageRequest {
        self.first_page
    }

    /// Bound applied to each upstream step.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            first_page: PageRequest::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// [`CredentialBroker`] backed by a GitHub App installation.
pub struct GitHubAppBroker<Gateway>
where
    Gateway: UpstreamGateway,
{
    gateway: Gateway,
    settings: BrokerSettings,
    telemetry: Arc<dyn TelemetrySink>,
}

impl<Gateway> GitHubAppBroker<Gateway>
where
    Gateway: UpstreamGateway,
{
    /// Creates a broker with default settings and no audit sink.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            settings: BrokerSettings::default(),
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Replaces the page size and timeout.
    #[must_use]
    pub const fn with_settings(mut self, settings: BrokerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Routes issuance audit events to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> BrokerSettings {
        self.settings
    }
}

#[async_trait]
impl<Gateway> CredentialBroker for GitHubAppBroker<Gateway>
where
    Gateway: UpstreamGateway,
{
    async fn list_installations_for_principal(&self) -> Result<InstallationSet, BrokerError> {
        InstallationDirectory::new(&self.gateway, self.settings)
            .list_installations_for_principal()
            .await
    }

    async fn list_repositories_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Vec<String>, BrokerError> {
        RepositoryDirectory::new(&self.gateway, self.settings)
            .list_repositories_for_installation(installation_id)
            .await
    }

    async fn list_repository_permissions(
        &self,
        installation_id: InstallationId,
    ) -> Result<HashMap<String, PermissionDescriptor>, BrokerError> {
        RepositoryDirectory::new(&self.gateway, self.settings)
            .list_repository_permissions(installation_id)
            .await
    }

    async fn get_identity(&self) -> Result<String, BrokerError> {
        IdentityResolver::new(&self.gateway, self.settings)
            .get_identity()
            .await
    }

    async fn issue_scoped_token(
        &self,
        installation_id: InstallationId,
        repo_full_name: &str,
    ) -> Result<ScopedToken, BrokerError> {
        CredentialIssuer::new(&self.gateway, self.settings, self.telemetry.as_ref())
            .issue_scoped_token(installation_id, repo_full_name)
            .await
    }
}
