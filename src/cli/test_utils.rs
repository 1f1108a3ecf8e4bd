//! Shared test utilities for CLI tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use installation_broker::github::Installation;
use installation_broker::{
    BrokerError, CredentialBroker, InstallationId, InstallationSet, PermissionDescriptor,
    ScopedToken,
};

/// A broker that records each call and returns canned data for
/// installation 42 with repositories `org/a` and `org/b`.
#[derive(Clone, Default)]
pub struct RecordingBroker {
    /// Calls received, rendered as `operation(args)`.
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Error returned by every operation when set.
    pub failure: Option<BrokerError>,
}

impl RecordingBroker {
    /// Broker whose every operation fails with `error`.
    pub fn failing(error: BrokerError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Calls recorded so far.
    pub fn recorded(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .clone()
    }

    fn record(&self, call: String) -> Result<(), BrokerError> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .push(call);
        self.failure.clone().map_or(Ok(()), Err)
    }
}

fn descriptor(name: &str, pull: bool) -> PermissionDescriptor {
    PermissionDescriptor {
        repo_full_name: name.to_owned(),
        admin: false,
        push: false,
        pull,
    }
}

#[async_trait]
impl CredentialBroker for RecordingBroker {
    async fn list_installations_for_principal(&self) -> Result<InstallationSet, BrokerError> {
        self.record("list_installations_for_principal()".to_owned())?;
        Ok([42, 7]
            .into_iter()
            .map(|id| Installation {
                id: InstallationId::new(id),
            })
            .collect())
    }

    async fn list_repositories_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Vec<String>, BrokerError> {
        self.record(format!("list_repositories_for_installation({installation_id})"))?;
        Ok(vec!["org/a".to_owned(), "org/b".to_owned()])
    }

    async fn list_repository_permissions(
        &self,
        installation_id: InstallationId,
    ) -> Result<HashMap<String, PermissionDescriptor>, BrokerError> {
        self.record(format!("list_repository_permissions({installation_id})"))?;
        Ok(HashMap::from([
            ("org/b".to_owned(), descriptor("org/b", false)),
            ("org/a".to_owned(), descriptor("org/a", true)),
        ]))
    }

    async fn get_identity(&self) -> Result<String, BrokerError> {
        self.record("get_identity()".to_owned())?;
        Ok("octocat".to_owned())
    }

    async fn issue_scoped_token(
        &self,
        installation_id: InstallationId,
        repo_full_name: &str,
    ) -> Result<ScopedToken, BrokerError> {
        self.record(format!(
            "issue_scoped_token({installation_id}, {repo_full_name})"
        ))?;
        Ok(ScopedToken::new("ghs_scoped", None))
    }
}
