//! Principal identity lookup.

use crate::github::error::BrokerError;
use crate::github::gateway::UpstreamGateway;
use crate::github::pagination::with_timeout;

use super::BrokerSettings;

const STEP: &str = "get authenticated user";

/// Resolves the login of the principal behind the gateway's credentials.
pub struct IdentityResolver<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    client: &'client Gateway,
    settings: BrokerSettings,
}

impl<'client, Gateway> IdentityResolver<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    /// Create a resolver over the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway, settings: BrokerSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the principal's canonical login.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures and timeouts. Returns
    /// [`BrokerError::UpstreamData`] when GitHub omits the login.
    pub async fn get_identity(&self) -> Result<String, BrokerError> {
        let user = with_timeout(
            STEP,
            self.settings.request_timeout(),
            self.client.authenticated_user(),
        )
        .await?;

        user.login
            .filter(|login| !login.is_empty())
            .ok_or_else(|| BrokerError::UpstreamData {
                message: format!("{STEP}: response has no login"),
            })
    }
}
