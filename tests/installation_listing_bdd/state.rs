//! Scenario state for the installation listing BDD tests.

use std::collections::HashMap;
use std::future::Future;

use installation_broker::{
    BrokerError, GitHubAppBroker, OctocrabUpstreamGateway, PermissionDescriptor,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::{Mock, MockServer};

use super::broker::broker_for;
use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct ListingState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) installations: Slot<Vec<u64>>,
    pub(crate) repositories: Slot<Vec<String>>,
    pub(crate) permissions: Slot<HashMap<String, PermissionDescriptor>>,
    pub(crate) error: Slot<BrokerError>,
}

/// Mounts `mock` on the scenario server.
pub(crate) fn mount(listing_state: &ListingState, mock: Mock) {
    runtime::mount(&listing_state.runtime, &listing_state.server, mock)
        .unwrap_or_else(|error| panic!("failed to mount mock: {error}"));
}

/// Builds a broker for the scenario server and runs `operation` on it.
///
/// A failure is stored in the `error` slot and returned as `None`.
pub(crate) fn run_with_broker<T, F, Fut>(
    listing_state: &ListingState,
    per_page: u8,
    operation: F,
) -> Option<T>
where
    F: FnOnce(GitHubAppBroker<OctocrabUpstreamGateway>) -> Fut,
    Fut: Future<Output = Result<T, BrokerError>>,
{
    let shared_runtime =
        runtime::ensure_runtime_and_server(&listing_state.runtime, &listing_state.server)
            .unwrap_or_else(|error| panic!("failed to start runtime: {error}"));
    let server_uri = listing_state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server URL missing"));

    let result = shared_runtime.block_on(async {
        let broker = broker_for(&server_uri, per_page)?;
        operation(broker).await
    });

    match result {
        Ok(value) => {
            drop(listing_state.error.take());
            Some(value)
        }
        Err(error) => {
            listing_state.error.set(error);
            None
        }
    }
}
