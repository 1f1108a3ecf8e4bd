//! Scoped installation token issuance.
//!
//! Issuance narrows scope before anything reaches GitHub: the request body is
//! always a [`TokenRequest`] for exactly one repository id with read access to
//! contents, content references, and metadata. Whatever broader access the
//! installation holds never flows into the token.

use crate::github::error::BrokerError;
use crate::github::gateway::UpstreamGateway;
use crate::github::locator::{InstallationId, RepositoryFullName};
use crate::github::models::{ScopedToken, TokenRequest};
use crate::github::pagination::with_timeout;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::BrokerSettings;

/// Mints read-only, single-repository installation tokens.
pub struct CredentialIssuer<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    client: &'client Gateway,
    settings: BrokerSettings,
    telemetry: &'client dyn TelemetrySink,
}

impl<'client, Gateway> CredentialIssuer<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    /// Create an issuer over the provided gateway.
    #[must_use]
    pub const fn new(
        client: &'client Gateway,
        settings: BrokerSettings,
        telemetry: &'client dyn TelemetrySink,
    ) -> Self {
        Self {
            client,
            settings,
            telemetry,
        }
    }

    /// Validates `repo_full_name`, resolves its id, and mints a token.
    ///
    /// Each upstream step is attempted once under its own timeout.
    ///
    /// # Errors
    ///
    /// - [`BrokerError::InvalidArgument`] for a malformed name, before any
    ///   upstream call.
    /// - [`BrokerError::UpstreamData`] when the lookup fails or yields no id.
    /// - [`BrokerError::UpstreamAuthorization`] when GitHub refuses to mint a
    ///   token for this installation and repository.
    /// - [`BrokerError::CredentialIssuance`] when token creation yields no
    ///   usable token.
    /// - [`BrokerError::UpstreamUnavailable`] on transport failure or timeout.
    pub async fn issue_scoped_token(
        &self,
        installation_id: InstallationId,
        repo_full_name: &str,
    ) -> Result<ScopedToken, BrokerError> {
        let repository = RepositoryFullName::parse(repo_full_name)?;
        let repository_id = self.resolve_repository_id(&repository).await?;

        let request = TokenRequest::read_only_for(repository_id);
        let step = format!("create installation token for installation {installation_id}");
        let record = with_timeout(
            &step,
            self.settings.request_timeout(),
            self.client.create_installation_token(installation_id, &request),
        )
        .await?;

        let value = record
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BrokerError::CredentialIssuance {
                message: format!("{step}: response has no token"),
            })?;
        let token = ScopedToken::new(value, record.expires_at);

        tracing::info!(
            installation_id = installation_id.get(),
            repository = %repository,
            repository_id,
            expires_at = ?token.expires_at(),
            "issued read-only installation token"
        );
        self.telemetry.record(TelemetryEvent::ScopedTokenIssued {
            installation_id: installation_id.get(),
            repository: repository.to_string(),
            repository_id,
            expires_at: token.expires_at().map(ToOwned::to_owned),
        });

        Ok(token)
    }

    async fn resolve_repository_id(
        &self,
        repository: &RepositoryFullName,
    ) -> Result<u64, BrokerError> {
        let step = format!("look up repository {repository}");
        let record = with_timeout(
            &step,
            self.settings.request_timeout(),
            self.client.repository(repository),
        )
        .await?;

        record.id.ok_or_else(|| BrokerError::UpstreamData {
            message: format!("{step}: response has no repository id"),
        })
    }
}
