//! Broker construction against a Wiremock server.

use std::sync::Arc;
use std::time::Duration;

use installation_broker::{
    ApiBase, BrokerError, BrokerSettings, GitHubAppBroker, OctocrabUpstreamGateway,
    PersonalAccessToken, RsaAppTokenSigner,
};

/// Principal token sent on every listing call.
pub const PRINCIPAL_TOKEN: &str = "principal-token";

const APP_ID: &str = "12345";
const APP_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/app-private-key.pem");

/// Builds a broker whose gateway targets `server_uri` with a real RS256
/// App signer.
///
/// Must run inside a Tokio runtime because Octocrab builds its HTTP client
/// eagerly.
///
/// # Errors
///
/// Returns an error when the token, URL, page size, or fixture key is
/// rejected.
pub fn broker_for(
    server_uri: &str,
    per_page: u8,
) -> Result<GitHubAppBroker<OctocrabUpstreamGateway>, BrokerError> {
    let token = PersonalAccessToken::new(PRINCIPAL_TOKEN)?;
    let api_base = ApiBase::parse(server_uri)?;
    let signer = RsaAppTokenSigner::from_pem(APP_ID, APP_PRIVATE_KEY)?;
    let settings = BrokerSettings::new(per_page, Duration::from_secs(5))?;

    let gateway =
        OctocrabUpstreamGateway::for_token(&token, &api_base)?.with_app_signer(Arc::new(signer));
    Ok(GitHubAppBroker::new(gateway).with_settings(settings))
}
