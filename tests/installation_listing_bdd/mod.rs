//! Support modules for the installation listing BDD tests.

#[path = "../support/broker.rs"]
pub(crate) mod broker;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{ListingState, mount, run_with_broker};
