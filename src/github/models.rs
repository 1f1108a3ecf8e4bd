//! Data models for installations, repositories, permissions, and tokens.
//!
//! Domain types (`Installation`, `PermissionDescriptor`, `ScopedToken`) are
//! what the broker hands to callers. The `*Record` types mirror the GitHub
//! REST payloads and keep optional fields optional so that a missing value is
//! reported as a precise error rather than a decode failure.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::locator::InstallationId;

/// A GitHub App installation reachable by the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installation {
    /// Installation identifier.
    pub id: InstallationId,
}

/// Installations in the order GitHub reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationSet(Vec<Installation>);

impl InstallationSet {
    /// Returns true if an installation with `id` is present.
    #[must_use]
    pub fn id_present(&self, id: InstallationId) -> bool {
        self.0.iter().any(|installation| installation.id == id)
    }

    /// Iterates over installation identifiers in upstream order.
    pub fn ids(&self) -> impl Iterator<Item = InstallationId> + '_ {
        self.0.iter().map(|installation| installation.id)
    }

    /// Borrow the installations.
    #[must_use]
    pub fn as_slice(&self) -> &[Installation] {
        &self.0
    }

    /// Number of installations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no installation is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Installation> for InstallationSet {
    fn from_iter<I: IntoIterator<Item = Installation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for InstallationSet {
    type Item = Installation;
    type IntoIter = std::vec::IntoIter<Installation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Capability flags GitHub reports for one repository under one installation.
///
/// A repository missing from a permissions map means its access could not be
/// determined, which is not the same as a descriptor with every flag false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDescriptor {
    /// Full repository name (`owner/name`).
    pub repo_full_name: String,
    /// Administrative access.
    pub admin: bool,
    /// Write access.
    pub push: bool,
    /// Read access.
    pub pull: bool,
}

impl PermissionDescriptor {
    /// Reads the `admin`, `push`, and `pull` flags out of GitHub's free-form
    /// permission map. Missing or non-boolean flags read as false.
    #[must_use]
    pub fn from_permission_map(
        repo_full_name: impl Into<String>,
        permissions: Option<&HashMap<String, serde_json::Value>>,
    ) -> Self {
        let flag = |name: &str| {
            permissions
                .and_then(|map| map.get(name))
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        };

        Self {
            repo_full_name: repo_full_name.into(),
            admin: flag("admin"),
            push: flag("push"),
            pull: flag("pull"),
        }
    }
}

/// Short-lived installation access token scoped to one repository.
///
/// The value is opaque to the broker. `Debug` output is redacted so the
/// token cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ScopedToken {
    value: String,
    expires_at: Option<String>,
}

impl ScopedToken {
    /// Wraps a token value returned by GitHub.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_at: Option<String>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Borrow the raw token for handing to a downstream system.
    #[must_use]
    pub const fn expose(&self) -> &str {
        self.value.as_str()
    }

    /// Expiry timestamp reported by GitHub, if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }

    /// Consumes the wrapper and returns the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl fmt::Debug for ScopedToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ScopedToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Access level requested for a token permission.
///
/// Only `read` exists: tokens minted by the broker can never carry write or
/// admin permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Read-only access.
    Read,
}

/// The fixed permission set requested for every scoped token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadOnlyPermissions {
    contents: AccessLevel,
    content_references: AccessLevel,
    metadata: AccessLevel,
}

impl ReadOnlyPermissions {
    /// Read access to contents, content references, and metadata.
    pub const CONTENT_READ: Self = Self {
        contents: AccessLevel::Read,
        content_references: AccessLevel::Read,
        metadata: AccessLevel::Read,
    };

    /// Permission names paired with their requested access level.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, AccessLevel); 3] {
        [
            ("contents", self.contents),
            ("content_references", self.content_references),
            ("metadata", self.metadata),
        ]
    }
}

/// Body of the installation token-creation request.
///
/// Only constructible for a single repository with
/// [`ReadOnlyPermissions::CONTENT_READ`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRequest {
    repository_ids: [u64; 1],
    permissions: ReadOnlyPermissions,
}

impl TokenRequest {
    /// Builds a read-only request scoped to `repository_id`.
    #[must_use]
    pub const fn read_only_for(repository_id: u64) -> Self {
        Self {
            repository_ids: [repository_id],
            permissions: ReadOnlyPermissions::CONTENT_READ,
        }
    }

    /// Repository identifiers the token is restricted to.
    #[must_use]
    pub const fn repository_ids(&self) -> &[u64] {
        &self.repository_ids
    }

    /// Requested permissions.
    #[must_use]
    pub const fn permissions(&self) -> &ReadOnlyPermissions {
        &self.permissions
    }
}

/// Installation entry as listed by `GET /user/installations`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallationRecord {
    /// Installation identifier.
    pub id: u64,
}

/// Repository entry as returned by GitHub listing and lookup endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
    /// Numeric repository identifier.
    pub id: Option<u64>,
    /// Full repository name (`owner/name`).
    pub full_name: Option<String>,
    /// Free-form permission map keyed by capability name.
    pub permissions: Option<HashMap<String, serde_json::Value>>,
}

/// Authenticated user as returned by `GET /user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    /// Canonical login name.
    pub login: Option<String>,
}

/// Installation access token as returned by the token-creation endpoint.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstallationTokenRecord {
    /// Token value.
    pub token: Option<String>,
    /// Expiry timestamp (RFC 3339).
    pub expires_at: Option<String>,
}

impl fmt::Debug for InstallationTokenRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InstallationTokenRecord")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl From<InstallationRecord> for Installation {
    fn from(value: InstallationRecord) -> Self {
        Self {
            id: InstallationId::new(value.id),
        }
    }
}
