//! Error mapping helpers for the Octocrab upstream gateway.
//!
//! The same HTTP status means different things depending on the endpoint: a
//! 404 from a repository lookup is a data problem, while a 404 from the
//! token-creation endpoint means the installation cannot reach the
//! repository.

use http::StatusCode;

use crate::github::error::BrokerError;

/// Upstream endpoint family used to classify failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Endpoint {
    /// Paginated listings and the identity lookup.
    Listing,
    /// Single repository lookup by `owner/name`.
    RepositoryLookup,
    /// Installation access token creation.
    TokenCreation,
}

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the status and message describe a rate limit rather than a
/// permission denial.
pub(super) fn is_rate_limit_error(status: StatusCode, message: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    status == StatusCode::FORBIDDEN && message.to_lowercase().contains("rate limit")
}

pub(super) fn map_octocrab_error(
    operation: &str,
    endpoint: Endpoint,
    error: &octocrab::Error,
) -> BrokerError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            endpoint,
            source.status_code,
            Some(source.message.clone()),
        );
    }

    if is_network_error(error) {
        return BrokerError::UpstreamUnavailable {
            message: format!("{operation} failed: {error}"),
        };
    }

    map_decode_error(operation, endpoint, &error.to_string())
}

pub(super) fn map_http_error(
    operation: &str,
    endpoint: Endpoint,
    status: StatusCode,
    maybe_message: Option<String>,
) -> BrokerError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());

    if is_rate_limit_error(status, &message) || status.is_server_error() {
        return BrokerError::UpstreamUnavailable {
            message: format!("{operation} failed with status {status}: {message}"),
        };
    }

    if is_auth_failure(status) || is_denial_for(endpoint, status) {
        return BrokerError::UpstreamAuthorization {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        };
    }

    let detail = format!("{operation} failed with status {status}: {message}");
    match endpoint {
        Endpoint::Listing => BrokerError::UpstreamUnavailable { message: detail },
        Endpoint::RepositoryLookup => BrokerError::UpstreamData { message: detail },
        Endpoint::TokenCreation => BrokerError::CredentialIssuance { message: detail },
    }
}

/// Maps a response body that could not be read or decoded.
pub(super) fn map_decode_error(operation: &str, endpoint: Endpoint, detail: &str) -> BrokerError {
    let message = format!("{operation} response could not be decoded: {detail}");
    match endpoint {
        Endpoint::TokenCreation => BrokerError::CredentialIssuance { message },
        Endpoint::Listing | Endpoint::RepositoryLookup => BrokerError::UpstreamData { message },
    }
}

/// Statuses that mean "not permitted" for a specific endpoint even though
/// they are not 401/403.
const fn is_denial_for(endpoint: Endpoint, status: StatusCode) -> bool {
    match endpoint {
        // GitHub hides installations the principal cannot see behind 404.
        Endpoint::Listing => matches!(status, StatusCode::NOT_FOUND),
        Endpoint::RepositoryLookup => false,
        // 404/422: the installation cannot reach the requested repository.
        Endpoint::TokenCreation => matches!(
            status,
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
        ),
    }
}
