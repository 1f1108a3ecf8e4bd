//! Scoped credential broker for GitHub App installations.
//!
//! The library enumerates the installations and repositories a principal can
//! act on and mints installation access tokens narrowed to a single
//! repository with read-only permissions. The App's private key and any
//! broadly-scoped token stay inside the broker.

pub mod broker;
pub mod config;
pub mod github;
pub mod telemetry;

pub use broker::{BrokerSettings, CredentialBroker, GitHubAppBroker};
pub use config::{BrokerConfig, OperationMode};
pub use github::{
    ApiBase, BrokerError, InstallationId, InstallationSet, OctocrabUpstreamGateway,
    PermissionDescriptor, PersonalAccessToken, RsaAppTokenSigner, ScopedToken, UpstreamGateway,
};
