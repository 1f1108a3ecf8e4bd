//! Identity wrappers for installations, repositories, tokens, and API hosts.

use std::fmt;

use url::Url;

use super::error::BrokerError;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Numeric identifier of a GitHub App installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstallationId(u64);

impl InstallationId {
    /// Wraps a raw installation identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for InstallationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for InstallationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated `owner/name` repository identifier.
///
/// # Example
///
/// ```
/// use installation_broker::github::locator::RepositoryFullName;
///
/// let repository = RepositoryFullName::parse("octo/widgets")
///     .expect("well-formed name should parse");
/// assert_eq!(repository.owner().as_str(), "octo");
/// assert_eq!(repository.name().as_str(), "widgets");
/// assert!(RepositoryFullName::parse("octo/widgets/extra").is_err());
/// assert!(RepositoryFullName::parse("../user").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFullName {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryFullName {
    /// Parses `owner/name`, splitting on the first separator.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidArgument`] unless the input contains
    /// exactly one `/` and both parts are GitHub names: non-empty, not `.`
    /// or `..`, and limited to ASCII letters, digits, `.`, `_` and `-`.
    pub fn parse(input: &str) -> Result<Self, BrokerError> {
        let malformed = || BrokerError::InvalidArgument {
            message: format!("malformed repository name (expected owner/name): {input}"),
        };

        let (owner, name) = input.split_once('/').ok_or_else(malformed)?;
        if !is_name_segment(owner) || !is_name_segment(name) {
            return Err(malformed());
        }

        Ok(Self {
            owner: RepositoryOwner(owner.to_owned()),
            name: RepositoryName(name.to_owned()),
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Segments are placed into request paths unencoded.
fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment.chars().all(|character| {
            character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-')
        })
}

impl fmt::Display for RepositoryFullName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Principal access token wrapper enforcing presence.
///
/// The token may be a personal access token or a user-to-server OAuth token;
/// either way it identifies the principal on whose behalf listings run.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, BrokerError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BrokerError::Configuration {
                message: "principal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Base URL of the GitHub REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Parses an explicit API base such as `https://ghe.example.com/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the URL cannot be parsed or
    /// has no host.
    pub fn parse(input: &str) -> Result<Self, BrokerError> {
        let parsed = Url::parse(input.trim()).map_err(|error| BrokerError::Configuration {
            message: format!("API base URL is invalid: {error}"),
        })?;
        if parsed.host_str().is_none() {
            return Err(BrokerError::Configuration {
                message: "API base URL must include a host".to_owned(),
            });
        }
        Ok(Self(parsed.as_str().trim_end_matches('/').to_owned()))
    }

    /// Borrow the URL as a string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(GITHUB_API_BASE.to_owned())
    }
}
