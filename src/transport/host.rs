//! Routing between local and remote access.

use super::{
    Attributes, FactQuery, LocalTransport, QueryTransport, RemoteFiles, ShareFiles, SshTransport,
};
use crate::assessment::target::local_identity;
use crate::assessment::Target;
use crate::config::TransportSettings;
use crate::error::Result;

/// Sends local targets to [`LocalTransport`] and every other target to
/// [`SshTransport`] and [`ShareFiles`].
#[derive(Debug, Clone)]
pub struct HostTransport {
    identity: String,
    local: LocalTransport,
    remote: SshTransport,
    share: ShareFiles,
}

impl HostTransport {
    /// Build routing for the machine running the assessment.
    pub fn new(settings: &TransportSettings) -> Self {
        Self::with_identity(local_identity(), settings)
    }

    /// Build routing with an explicit local identity.
    pub fn with_identity(identity: impl Into<String>, settings: &TransportSettings) -> Self {
        Self {
            identity: identity.into(),
            local: LocalTransport::new(),
            remote: SshTransport::new(settings.clone()),
            share: ShareFiles::new(settings.share_root.clone()),
        }
    }

    /// The host name treated as local.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    fn queries_for(&self, target: &Target) -> &dyn QueryTransport {
        if target.is_local(&self.identity) {
            &self.local
        } else {
            &self.remote
        }
    }

    fn files_for(&self, target: &Target) -> &dyn RemoteFiles {
        if target.is_local(&self.identity) {
            &self.local
        } else {
            &self.share
        }
    }
}

impl QueryTransport for HostTransport {
    fn is_reachable(&self, target: &Target) -> bool {
        self.queries_for(target).is_reachable(target)
    }

    fn query(&self, target: &Target, query: &FactQuery) -> Result<Vec<Attributes>> {
        self.queries_for(target).query(target, query)
    }

    fn create_process(&self, target: &Target, command_line: &str) -> Result<u32> {
        self.queries_for(target).create_process(target, command_line)
    }
}

impl RemoteFiles for HostTransport {
    fn exists(&self, target: &Target, path: &str) -> bool {
        self.files_for(target).exists(target, path)
    }

    fn read_to_string(&self, target: &Target, path: &str) -> Result<String> {
        self.files_for(target).read_to_string(target, path)
    }

    fn remove(&self, target: &Target, path: &str) -> Result<()> {
        self.files_for(target).remove(target, path)
    }
}
