//! GitHub App installation access.
//!
//! This module wraps Octocrab to enumerate installations and repositories,
//! resolve the authenticated principal, and mint installation access tokens.
//! Upstream failures are mapped into [`BrokerError`] variants so that callers
//! can react to the failure class without inspecting Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;

pub use error::BrokerError;
pub use gateway::{AppTokenSigner, OctocrabUpstreamGateway, RsaAppTokenSigner, UpstreamGateway};
pub use locator::{
    ApiBase, InstallationId, PersonalAccessToken, RepositoryFullName, RepositoryName,
    RepositoryOwner,
};
pub use models::{Installation, InstallationSet, PermissionDescriptor, ScopedToken, TokenRequest};
pub use pagination::{Page, PageRequest};

#[cfg(test)]
pub use gateway::MockUpstreamGateway;
