//! Broker construction from configuration.

use std::sync::Arc;

use camino::Utf8Path;
use installation_broker::config::AppCredentials;
use installation_broker::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use installation_broker::{
    BrokerConfig, BrokerError, GitHubAppBroker, OctocrabUpstreamGateway, RsaAppTokenSigner,
};

/// Builds the Octocrab-backed broker described by `config`.
///
/// The App signer is only attached when App credentials are configured; the
/// listing operations work with the principal token alone.
///
/// # Errors
///
/// Returns [`BrokerError::Configuration`] when the token, API base, settings,
/// or App key are missing or invalid.
pub fn build_broker(
    config: &BrokerConfig,
) -> Result<GitHubAppBroker<OctocrabUpstreamGateway>, BrokerError> {
    let token = config.resolve_token()?;
    let api_base = config.api_base()?;
    let settings = config.broker_settings()?;

    let mut gateway = OctocrabUpstreamGateway::for_token(&token, &api_base)?;
    if let Some(credentials) = config.app_credentials()? {
        gateway = gateway.with_app_signer(Arc::new(load_signer(credentials)?));
    }

    Ok(GitHubAppBroker::new(gateway)
        .with_settings(settings)
        .with_telemetry(telemetry_sink(config.audit)))
}

fn load_signer(credentials: AppCredentials<'_>) -> Result<RsaAppTokenSigner, BrokerError> {
    RsaAppTokenSigner::from_pem_file(
        credentials.app_id,
        Utf8Path::new(credentials.private_key_path),
    )
}

fn telemetry_sink(audit: bool) -> Arc<dyn TelemetrySink> {
    if audit {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}
