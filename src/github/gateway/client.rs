//! Octocrab client construction helpers for the gateway implementation.

use http::Uri;
use http::header::HeaderName;
use octocrab::Octocrab;

use crate::github::error::BrokerError;
use crate::github::locator::ApiBase;

/// REST API version pinned on every request.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Builds an Octocrab client for `api_base`.
///
/// With `Some(token)` every request carries it as a bearer credential. With
/// `None` the client sends no credential of its own and callers attach an
/// `Authorization` header per request.
///
/// # Errors
///
/// Returns `BrokerError::Configuration` when the base URI cannot be parsed or
/// Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    bearer_token: Option<&str>,
    api_base: &ApiBase,
) -> Result<Octocrab, BrokerError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| BrokerError::Configuration {
            message: format!("API base URL is invalid: {error}"),
        })?;

    let mut builder = Octocrab::builder().add_header(
        HeaderName::from_static("x-github-api-version"),
        GITHUB_API_VERSION.to_owned(),
    );
    if let Some(token) = bearer_token {
        builder = builder.personal_token(token.to_owned());
    }

    builder
        .base_uri(base_uri)
        .map_err(|error| BrokerError::Configuration {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| BrokerError::Configuration {
            message: format!("build client failed: {error}"),
        })
}
