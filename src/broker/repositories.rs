//! Repository listing and permission derivation for one installation.

use std::collections::HashMap;

use crate::github::error::BrokerError;
use crate::github::gateway::UpstreamGateway;
use crate::github::locator::InstallationId;
use crate::github::models::{PermissionDescriptor, RepositoryRecord};
use crate::github::pagination::drain_pages;

use super::BrokerSettings;

/// Lists repositories visible under an installation.
pub struct RepositoryDirectory<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    client: &'client Gateway,
    settings: BrokerSettings,
}

impl<'client, Gateway> RepositoryDirectory<'client, Gateway>
where
    Gateway: UpstreamGateway,
{
    /// Create a directory over the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway, settings: BrokerSettings) -> Self {
        Self { client, settings }
    }

    /// Full names of every repository under `installation_id`, in upstream
    /// order.
    ///
    /// Records without a full name are skipped. A failing page still aborts
    /// the whole listing.
    ///
    /// # Errors
    ///
    /// Returns the first page failure unmodified.
    pub async fn list_repositories_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Vec<String>, BrokerError> {
        let records = self.fetch_all(installation_id).await?;

        Ok(records
            .into_iter()
            .filter_map(|record| named_record(installation_id, record))
            .map(|(full_name, _)| full_name)
            .collect())
    }

    /// Permission descriptors keyed by full repository name.
    ///
    /// Missing flags read as false. A repository repeated by upstream keeps
    /// its last descriptor.
    ///
    /// # Errors
    ///
    /// Returns the first page failure unmodified.
    pub async fn list_repository_permissions(
        &self,
        installation_id: InstallationId,
    ) -> Result<HashMap<String, PermissionDescriptor>, BrokerError> {
        let records = self.fetch_all(installation_id).await?;

        let mut descriptors = HashMap::with_capacity(records.len());
        for (full_name, record) in records
            .into_iter()
            .filter_map(|record| named_record(installation_id, record))
        {
            let descriptor = PermissionDescriptor::from_permission_map(
                full_name.clone(),
                record.permissions.as_ref(),
            );
            descriptors.insert(full_name, descriptor);
        }

        Ok(descriptors)
    }

    async fn fetch_all(
        &self,
        installation_id: InstallationId,
    ) -> Result<Vec<RepositoryRecord>, BrokerError> {
        let operation = format!("list repositories for installation {installation_id}");
        drain_pages(
            &operation,
            self.settings.first_page(),
            self.settings.request_timeout(),
            |request| self.client.installation_repositories_page(installation_id, request),
        )
        .await
    }
}

/// Splits off the full name, or logs and drops a record that has none.
fn named_record(
    installation_id: InstallationId,
    mut record: RepositoryRecord,
) -> Option<(String, RepositoryRecord)> {
    match record.full_name.take() {
        Some(full_name) if !full_name.is_empty() => Some((full_name, record)),
        _ => {
            tracing::warn!(
                installation_id = installation_id.get(),
                repository_id = ?record.id,
                "skipping repository record without a full name"
            );
            None
        }
    }
}
