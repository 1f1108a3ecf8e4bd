//! Broker configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults (100 items per page, 10 second
//!    request timeout)
//! 2. **Configuration file** – `.installation-broker.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `BROKER_TOKEN`, `BROKER_APP_ID`, and so on,
//!    or `GITHUB_TOKEN` for the principal token
//! 4. **Command-line arguments** – `--token`/`-t`, `--installation-id`/`-i`,
//!    `--repo`/`-r`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghu_example"
//! api_base = "https://github.example.com/api/v3"
//! app_id = "123456"
//! app_private_key_path = "/etc/broker/app.pem"
//! installation_id = 42
//! per_page = 50
//! request_timeout_seconds = 5
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::broker::{BrokerSettings, DEFAULT_REQUEST_TIMEOUT};
use crate::github::error::BrokerError;
use crate::github::locator::{ApiBase, InstallationId, PersonalAccessToken};
use crate::github::pagination::DEFAULT_PER_PAGE;

/// Operation selected by the configured arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Issue a scoped token for one repository.
    IssueToken,
    /// Print permission descriptors for an installation's repositories.
    RepositoryPermissions,
    /// Print repository names for an installation.
    RepositoryListing,
    /// Print the principal's login.
    Identity,
    /// Print installation ids visible to the principal.
    InstallationListing,
}

/// GitHub App credentials used to sign App JWTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppCredentials<'config> {
    /// App id used as the JWT issuer.
    pub app_id: &'config str,
    /// Path to the App's PEM-encoded private key.
    pub private_key_path: &'config str,
}

/// Broker configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use installation_broker::BrokerConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BrokerConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// let settings = config.broker_settings().expect("settings should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BROKER",
    discovery(
        dotfile_name = ".installation-broker.toml",
        config_file_name = "installation-broker.toml",
        app_name = "installation-broker"
    )
)]
pub struct BrokerConfig {
    /// Principal access token used for listings, identity, and lookups.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `BROKER_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub REST API base URL.
    ///
    /// Defaults to `https://api.github.com`. GitHub Enterprise hosts use
    /// `https://<host>/api/v3`.
    #[ortho_config(cli_short = 'b')]
    pub api_base: Option<String>,

    /// GitHub App id, used as the App JWT issuer.
    #[ortho_config(cli_short = 'A')]
    pub app_id: Option<String>,

    /// Path to the GitHub App's PEM-encoded RSA private key.
    #[ortho_config(cli_short = 'k')]
    pub app_private_key_path: Option<String>,

    /// Installation to list repositories for or to mint tokens under.
    ///
    /// Can be provided via:
    /// - CLI: `--installation-id <ID>` or `-i <ID>`
    /// - Environment: `BROKER_INSTALLATION_ID`
    /// - Config file: `installation_id = 42`
    #[ortho_config(cli_short = 'i')]
    pub installation_id: Option<u64>,

    /// Repository (`owner/name`) to issue a scoped token for.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Prints permission descriptors instead of repository names.
    #[ortho_config(cli_short = 'p')]
    pub permissions: bool,

    /// Prints the principal's login.
    #[ortho_config(cli_short = 'w')]
    pub whoami: bool,

    /// Items requested per listing page (1 to 100).
    #[ortho_config(cli_short = 'n')]
    pub per_page: u8,

    /// Bound on each upstream request, in seconds.
    #[ortho_config(cli_short = 'T')]
    pub request_timeout_seconds: u64,

    /// Writes an audit record to stderr for every issued token.
    #[ortho_config(cli_short = 'a')]
    pub audit: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: None,
            app_id: None,
            app_private_key_path: None,
            installation_id: None,
            repo: None,
            permissions: false,
            whoami: false,
            per_page: DEFAULT_PER_PAGE,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            audit: false,
        }
    }
}

impl BrokerConfig {
    /// Resolves the principal token from configuration or `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when no source provides a
    /// non-blank token.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, BrokerError> {
        let raw = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or_else(|| BrokerError::Configuration {
                message: "principal access token is required (use --token or GITHUB_TOKEN)"
                    .to_owned(),
            })?;
        PersonalAccessToken::new(raw)
    }

    /// Returns the configured API base or the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the URL is invalid.
    pub fn api_base(&self) -> Result<ApiBase, BrokerError> {
        self.api_base
            .as_deref()
            .map_or_else(|| Ok(ApiBase::default()), ApiBase::parse)
    }

    /// Page size and timeout for the broker.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when `per_page` is outside
    /// `1..=100` or the timeout is zero.
    pub fn broker_settings(&self) -> Result<BrokerSettings, BrokerError> {
        BrokerSettings::new(
            self.per_page,
            Duration::from_secs(self.request_timeout_seconds),
        )
        .map_err(|error| BrokerError::Configuration {
            message: error.to_string(),
        })
    }

    /// Determines the operation from the configured arguments.
    ///
    /// An installation id with a repository issues a token; with
    /// `permissions` it lists permission descriptors; alone it lists
    /// repositories. Without an installation id, `whoami` resolves the
    /// principal and anything else lists installations.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        match (self.installation_id, &self.repo) {
            (Some(_), Some(_)) => OperationMode::IssueToken,
            (Some(_), None) if self.permissions => OperationMode::RepositoryPermissions,
            (Some(_), None) => OperationMode::RepositoryListing,
            (None, _) if self.whoami => OperationMode::Identity,
            (None, _) => OperationMode::InstallationListing,
        }
    }

    /// Returns the installation id or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when no id is configured.
    pub fn require_installation_id(&self) -> Result<InstallationId, BrokerError> {
        self.installation_id
            .map(InstallationId::new)
            .ok_or_else(|| BrokerError::Configuration {
                message: "installation id is required (use --installation-id or -i)".to_owned(),
            })
    }

    /// Returns the repository name or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when no repository is
    /// configured.
    pub fn require_repo(&self) -> Result<&str, BrokerError> {
        self.repo
            .as_deref()
            .ok_or_else(|| BrokerError::Configuration {
                message: "repository is required (use --repo or -r)".to_owned(),
            })
    }

    /// Returns the App credentials when both halves are configured.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when only one of `app_id` and
    /// `app_private_key_path` is set.
    pub fn app_credentials(&self) -> Result<Option<AppCredentials<'_>>, BrokerError> {
        match (self.app_id.as_deref(), self.app_private_key_path.as_deref()) {
            (Some(app_id), Some(private_key_path)) => Ok(Some(AppCredentials {
                app_id,
                private_key_path,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(BrokerError::Configuration {
                message: "--app-id requires --app-private-key-path".to_owned(),
            }),
            (None, Some(_)) => Err(BrokerError::Configuration {
                message: "--app-private-key-path requires --app-id".to_owned(),
            }),
        }
    }

    /// Validates that the configured arguments are mutually consistent.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when:
    /// - `repo` or `permissions` is set without an installation id;
    /// - only one half of the App credentials is set;
    /// - token issuance is requested without App credentials.
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.installation_id.is_none() && (self.repo.is_some() || self.permissions) {
            return Err(BrokerError::Configuration {
                message: "--repo and --permissions require --installation-id".to_owned(),
            });
        }

        let credentials = self.app_credentials()?;
        if self.operation_mode() == OperationMode::IssueToken && credentials.is_none() {
            return Err(BrokerError::Configuration {
                message: "issuing a token requires --app-id and --app-private-key-path"
                    .to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
