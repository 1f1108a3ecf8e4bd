//! Octocrab-backed implementation of [`UpstreamGateway`].
//!
//! Requests go through Octocrab's raw `_get`/`_post` helpers so the gateway
//! can read the `Link` header for pagination and classify error statuses per
//! endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use http::header::{AUTHORIZATION, LINK};
use http::request::Builder;
use http::{HeaderValue, Method, Uri};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;

use crate::github::error::BrokerError;
use crate::github::locator::{ApiBase, InstallationId, PersonalAccessToken, RepositoryFullName};
use crate::github::models::{
    InstallationRecord, InstallationTokenRecord, RepositoryRecord, TokenRequest, UserRecord,
};
use crate::github::pagination::{Page, PageRequest};

use super::UpstreamGateway;
use super::app_auth::AppTokenSigner;
use super::client::build_octocrab_client;
use super::error_mapping::{Endpoint, map_decode_error, map_http_error, map_octocrab_error};
use super::http_utils::{extract_github_message, next_page_from_link};

mod types;

use types::{InstallationsEnvelope, RepositoriesEnvelope};

/// Decoded response body together with the advertised next page.
struct Fetched<T> {
    body: T,
    next_page: Option<u32>,
}

/// Octocrab-backed upstream gateway.
///
/// Listings, identity, and repository lookups run with the principal's
/// token. Token creation goes through a second, credential-less client and
/// carries a fresh App JWT on each request; the JWT is never reused.
pub struct OctocrabUpstreamGateway {
    principal: Octocrab,
    app: Octocrab,
    app_signer: Option<Arc<dyn AppTokenSigner>>,
}

impl OctocrabUpstreamGateway {
    /// Creates a gateway from a client authenticated as the principal and a
    /// client without credentials used for App requests.
    #[must_use]
    pub const fn new(principal: Octocrab, app: Octocrab) -> Self {
        Self {
            principal,
            app,
            app_signer: None,
        }
    }

    /// Builds an Octocrab client for the principal's token and API base.
    ///
    /// # Errors
    ///
    /// Returns `BrokerError::Configuration` when the base URI cannot be
    /// parsed or Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &ApiBase,
    ) -> Result<Self, BrokerError> {
        let principal = build_octocrab_client(Some(token.value()), api_base)?;
        let app = build_octocrab_client(None, api_base)?;
        Ok(Self::new(principal, app))
    }

    /// Enables token creation with the given App JWT signer.
    #[must_use]
    pub fn with_app_signer(mut self, signer: Arc<dyn AppTokenSigner>) -> Self {
        self.app_signer = Some(signer);
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<Fetched<T>, BrokerError> {
        let uri = parse_path(operation, path)?;
        let response = self
            .principal
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(operation, endpoint, &error))?;

        let status = response.status();
        let next_page = next_page_from_link(response.headers().get(LINK));
        let body = self
            .principal
            .body_to_string(response)
            .await
            .map_err(|error| BrokerError::UpstreamUnavailable {
                message: format!("{operation} response body could not be read: {error}"),
            })?;

        if !status.is_success() {
            return Err(map_http_error(
                operation,
                endpoint,
                status,
                extract_github_message(&body),
            ));
        }

        let decoded = serde_json::from_str(&body)
            .map_err(|error| map_decode_error(operation, endpoint, &error.to_string()))?;

        Ok(Fetched {
            body: decoded,
            next_page,
        })
    }

    fn sign_app_jwt(&self, operation: &str) -> Result<String, BrokerError> {
        let signer = self
            .app_signer
            .as_ref()
            .ok_or_else(|| BrokerError::Configuration {
                message: format!("{operation}: GitHub App credentials are not configured"),
            })?;
        signer.sign_app_jwt(Utc::now().timestamp())
    }
}

#[async_trait]
impl UpstreamGateway for OctocrabUpstreamGateway {
    async fn installations_page(
        &self,
        request: PageRequest,
    ) -> Result<Page<InstallationRecord>, BrokerError> {
        let path = format!(
            "/user/installations?per_page={per_page}&page={page}",
            per_page = request.per_page(),
            page = request.page()
        );
        let fetched: Fetched<InstallationsEnvelope> = self
            .get_json("list installations", Endpoint::Listing, &path)
            .await?;

        Ok(Page {
            items: fetched.body.installations,
            next_page: fetched.next_page,
        })
    }

    async fn installation_repositories_page(
        &self,
        installation_id: InstallationId,
        request: PageRequest,
    ) -> Result<Page<RepositoryRecord>, BrokerError> {
        let path = format!(
            "/user/installations/{installation_id}/repositories?per_page={per_page}&page={page}",
            per_page = request.per_page(),
            page = request.page()
        );
        let operation = format!("list repositories for installation {installation_id}");
        let fetched: Fetched<RepositoriesEnvelope> = self
            .get_json(&operation, Endpoint::Listing, &path)
            .await?;

        Ok(Page {
            items: fetched.body.repositories,
            next_page: fetched.next_page,
        })
    }

    async fn authenticated_user(&self) -> Result<UserRecord, BrokerError> {
        let fetched: Fetched<UserRecord> = self
            .get_json("get authenticated user", Endpoint::Listing, "/user")
            .await?;
        Ok(fetched.body)
    }

    async fn repository(
        &self,
        repository: &RepositoryFullName,
    ) -> Result<RepositoryRecord, BrokerError> {
        let operation = format!("look up repository {repository}");
        let fetched: Fetched<RepositoryRecord> = self
            .get_json(
                &operation,
                Endpoint::RepositoryLookup,
                &repository.repository_path(),
            )
            .await?;
        Ok(fetched.body)
    }

    async fn create_installation_token(
        &self,
        installation_id: InstallationId,
        request: &TokenRequest,
    ) -> Result<InstallationTokenRecord, BrokerError> {
        let operation = format!("create installation token for installation {installation_id}");
        let endpoint = Endpoint::TokenCreation;

        let jwt = self.sign_app_jwt(&operation)?;
        let uri = parse_path(
            &operation,
            &format!("/app/installations/{installation_id}/access_tokens"),
        )?;
        let builder = Builder::new()
            .method(Method::POST)
            .uri(uri)
            .header(AUTHORIZATION, bearer_header(&operation, &jwt)?);

        let outgoing = self
            .app
            .build_request(builder, Some(request))
            .map_err(|error| map_octocrab_error(&operation, endpoint, &error))?;
        let response = self
            .app
            .execute(outgoing)
            .await
            .map_err(|error| map_octocrab_error(&operation, endpoint, &error))?;

        let status = response.status();
        let body = self
            .app
            .body_to_string(response)
            .await
            .map_err(|error| BrokerError::UpstreamUnavailable {
                message: format!("{operation} response body could not be read: {error}"),
            })?;

        if !status.is_success() {
            return Err(map_http_error(
                &operation,
                endpoint,
                status,
                extract_github_message(&body),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|error| map_decode_error(&operation, endpoint, &error.to_string()))
    }
}

fn bearer_header(operation: &str, jwt: &str) -> Result<HeaderValue, BrokerError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {jwt}")).map_err(|error| {
        BrokerError::Configuration {
            message: format!("{operation}: signed App JWT is not a valid header value: {error}"),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn parse_path(operation: &str, path: &str) -> Result<Uri, BrokerError> {
    path.parse::<Uri>()
        .map_err(|error| BrokerError::InvalidArgument {
            message: format!("{operation}: request path is invalid: {error}"),
        })
}
