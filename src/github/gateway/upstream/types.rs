//! Response envelopes for GitHub listing endpoints.

use serde::Deserialize;

use crate::github::models::{InstallationRecord, RepositoryRecord};

/// Body of `GET /user/installations`.
#[derive(Debug, Deserialize)]
pub(super) struct InstallationsEnvelope {
    pub(super) installations: Vec<InstallationRecord>,
}

/// Body of `GET /user/installations/{id}/repositories`.
#[derive(Debug, Deserialize)]
pub(super) struct RepositoriesEnvelope {
    pub(super) repositories: Vec<RepositoryRecord>,
}
