//! Installation listing for the calling principal.

use crate::github::error::BrokerError;
use crate::github::gateway::UpstreamGateway;
use crate::github::models::{Installation, InstallationSet};
use crate::github::pagination::drain_pages;

use super::BrokerSettings;

/// Lists installations reachable by the principal's credentials.
pub struct InstallationDirectory<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    client: &'client Gateway,
    settings: BrokerSettings,
}

impl<'client, Gateway> InstallationDirectory<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    /// Create a directory over the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway, settings: BrokerSettings) -> Self {
        Self { client, settings }
    }

    /// Drains every installation page, preserving upstream order.
    ///
    /// # Errors
    ///
    /// Returns the first page failure unmodified. No partial set is returned.
    pub async fn list_installations_for_principal(&self) -> Result<InstallationSet, BrokerError> {
        let records = drain_pages(
            "list installations",
            self.settings.first_page(),
            self.settings.request_timeout(),
            |request| self.client.installations_page(request),
        )
        .await?;

        Ok(records.into_iter().map(Installation::from).collect())
    }
}
