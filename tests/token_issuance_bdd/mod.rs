//! Support modules for the token issuance BDD tests.

#[path = "../support/broker.rs"]
pub(crate) mod broker;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{IssuanceState, issue, mount, received_requests};
