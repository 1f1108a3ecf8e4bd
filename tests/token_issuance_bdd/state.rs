//! Scenario state and request helpers for the token issuance BDD tests.

use std::sync::Arc;

use installation_broker::github::pagination::DEFAULT_PER_PAGE;
use installation_broker::telemetry::test_support::RecordingTelemetrySink;
use installation_broker::{BrokerError, CredentialBroker, InstallationId, ScopedToken};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::{Mock, MockServer, Request};

use super::broker::broker_for;
use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct IssuanceState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) token: Slot<ScopedToken>,
    pub(crate) error: Slot<BrokerError>,
    pub(crate) audit: Slot<Arc<RecordingTelemetrySink>>,
}

pub(crate) fn mount(issuance_state: &IssuanceState, mock: Mock) {
    runtime::mount(&issuance_state.runtime, &issuance_state.server, mock)
        .unwrap_or_else(|error| panic!("failed to mount mock: {error}"));
}

fn shared_runtime(issuance_state: &IssuanceState) -> SharedRuntime {
    runtime::ensure_runtime_and_server(&issuance_state.runtime, &issuance_state.server)
        .unwrap_or_else(|error| panic!("failed to start runtime: {error}"))
}

/// Requests a token and stores the outcome in the scenario state.
///
/// Audit events land in the `audit` slot's recorder.
pub(crate) fn issue(issuance_state: &IssuanceState, installation: u64, repository: &str) {
    let runtime = shared_runtime(issuance_state);
    let audit = Arc::new(RecordingTelemetrySink::default());
    issuance_state.audit.set(Arc::clone(&audit));
    let server_uri = issuance_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"));

    let result = runtime.block_on(async {
        let broker = broker_for(&server_uri, DEFAULT_PER_PAGE)?.with_telemetry(audit);
        broker
            .issue_scoped_token(InstallationId::new(installation), repository)
            .await
    });

    match result {
        Ok(token) => {
            drop(issuance_state.error.take());
            issuance_state.token.set(token);
        }
        Err(error) => {
            drop(issuance_state.token.take());
            issuance_state.error.set(error);
        }
    }
}

/// Requests the mock server has recorded so far.
pub(crate) fn received_requests(issuance_state: &IssuanceState) -> Vec<Request> {
    let runtime = shared_runtime(issuance_state);
    issuance_state
        .server
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .unwrap_or_else(|| panic!("request recording is disabled"))
}
