//! CLI operation handlers.
//!
//! [`run_operation`] dispatches on [`OperationMode`] and writes results to
//! the supplied writer. Broker construction from configuration lives in
//! [`startup`]; formatting lives in [`output`].

use std::io::Write;

use installation_broker::{BrokerConfig, BrokerError, CredentialBroker, OperationMode};

pub mod output;
pub mod startup;

#[cfg(test)]
mod test_utils;

/// Runs the configured operation against `broker`.
///
/// # Errors
///
/// Returns [`BrokerError::Configuration`] when a field the operation needs is
/// missing, propagates broker failures unmodified, and returns
/// [`BrokerError::Io`] when writing output fails.
pub async fn run_operation<Broker, W>(
    broker: &Broker,
    config: &BrokerConfig,
    writer: &mut W,
) -> Result<(), BrokerError>
where
    Broker: CredentialBroker + ?Sized,
    W: Write,
{
    match config.operation_mode() {
        OperationMode::IssueToken => {
            let installation_id = config.require_installation_id()?;
            let repo = config.require_repo()?;
            let token = broker.issue_scoped_token(installation_id, repo).await?;
            output::write_token(writer, &token)
        }
        OperationMode::RepositoryPermissions => {
            let installation_id = config.require_installation_id()?;
            let descriptors = broker.list_repository_permissions(installation_id).await?;
            output::write_permissions(writer, &descriptors)
        }
        OperationMode::RepositoryListing => {
            let installation_id = config.require_installation_id()?;
            let names = broker
                .list_repositories_for_installation(installation_id)
                .await?;
            output::write_lines(writer, &names)
        }
        OperationMode::Identity => {
            let login = broker.get_identity().await?;
            output::write_lines(writer, &[login])
        }
        OperationMode::InstallationListing => {
            let installations = broker.list_installations_for_principal().await?;
            output::write_installations(writer, &installations)
        }
    }
}
