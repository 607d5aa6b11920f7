// src/kubeconfig/merge.rs

use crate::utils::logging::Logger;
use std::io;

use super::config::{KubeConfig, KubeConfigError};
use super::types::{EntryKind, Named};

#[derive(Debug)]
pub enum MergeError {
    Decode(serde_yaml::Error),
    Encode(serde_yaml::Error),
    InvalidIncoming(String),
    Inconsistent { name: String, missing: Vec<EntryKind> },
    Io(io::Error),
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "could not decode kubeconfig: {}", e),
            Self::Encode(e) => write!(f, "could not encode kubeconfig: {}", e),
            Self::InvalidIncoming(s) => write!(f, "invalid new config: {}", s),
            Self::Inconsistent { name, missing } => {
                let missing: Vec<String> = missing.iter().map(|k| k.to_string()).collect();
                write!(
                    f,
                    "could not overwrite '{}': no {} with that name in kubeconfig",
                    name,
                    missing.join(" or ")
                )
            }
            Self::Io(e) => write!(f, "IO Error: {}", e),
        }
    }
}

impl std::error::Error for MergeError {}

impl From<io::Error> for MergeError {
    fn from(error: io::Error) -> Self {
        MergeError::Io(error)
    }
}

impl From<KubeConfigError> for MergeError {
    fn from(error: KubeConfigError) -> Self {
        match error {
            KubeConfigError::Decode(e) => MergeError::Decode(e),
            KubeConfigError::Encode(e) => MergeError::Encode(e),
            KubeConfigError::NotFound { kind, name } => MergeError::Inconsistent {
                name,
                missing: vec![kind],
            },
        }
    }
}

impl From<MergeError> for io::Error {
    fn from(error: MergeError) -> Self {
        match error {
            MergeError::Io(e) => e,
            MergeError::Decode(_) | MergeError::InvalidIncoming(_) => {
                io::Error::new(io::ErrorKind::InvalidData, error.to_string())
            }
            MergeError::Inconsistent { .. } => {
                io::Error::new(io::ErrorKind::NotFound, error.to_string())
            }
            MergeError::Encode(_) => io::Error::new(io::ErrorKind::Other, error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Overwrite,
    Skip,
}

/// Decides what happens when the requested name is already taken.
/// Cancelling a prompt must be reported as `Decision::Skip`; an `Err` is
/// reserved for a prompt that could not be shown at all.
pub trait CollisionPolicy {
    fn decide(&mut self, name: &str) -> io::Result<Decision>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Appended,
    Overwritten,
    Skipped,
}

#[derive(Debug)]
pub struct MergeResult {
    pub config: KubeConfig,
    pub outcome: MergeOutcome,
}

pub struct MergeEngine {
    logger: Box<dyn Logger>,
    policy: Box<dyn CollisionPolicy>,
}

impl MergeEngine {
    pub fn new(logger: Box<dyn Logger>, policy: Box<dyn CollisionPolicy>) -> Self {
        Self { logger, policy }
    }

    pub fn log(&mut self, message: &str) {
        self.logger.log(message);
    }

    pub fn debug_log(&mut self, message: &str) {
        self.logger.debug_log(message);
    }

    /// Decodes both documents, merges `incoming` into `current` under `name`
    /// and encodes the result. Nothing is returned on error, so a caller that
    /// only writes on `Ok` never persists a partial merge.
    pub fn merge_documents(
        &mut self,
        current: &[u8],
        incoming: &[u8],
        name: &str,
    ) -> Result<(Vec<u8>, MergeOutcome), MergeError> {
        let target = KubeConfig::from_yaml(current)?;
        let incoming = KubeConfig::from_yaml(incoming)?;

        let result = self.merge_entry(target, incoming, name)?;
        Ok((result.config.to_yaml()?, result.outcome))
    }

    pub fn merge_entry(
        &mut self,
        mut target: KubeConfig,
        mut incoming: KubeConfig,
        name: &str,
    ) -> Result<MergeResult, MergeError> {
        self.log(&format!("inserting context '{}'", name));
        check_incoming(&incoming)?;

        if let Some(host) = incoming.clusters[0]
            .cluster
            .server_url()
            .and_then(|url| url.host_str().map(str::to_string))
        {
            self.debug_log(&format!("new cluster points at {}", host));
        } else {
            self.debug_log(&format!(
                "new cluster server '{}' is not a valid URL",
                incoming.clusters[0].cluster.server
            ));
        }

        let collisions = self.collisions(&target, name);
        if collisions.is_empty() {
            self.append_entry(&mut target, &mut incoming, name);
            return Ok(MergeResult {
                config: target,
                outcome: MergeOutcome::Appended,
            });
        }

        self.log(&format!("name '{}' already exists in kubeconfig", name));
        match self.policy.decide(name)? {
            Decision::Skip => {
                self.log("did not overwrite config");
                Ok(MergeResult {
                    config: target,
                    outcome: MergeOutcome::Skipped,
                })
            }
            Decision::Overwrite => {
                self.overwrite_entry(&mut target, incoming, name)?;
                Ok(MergeResult {
                    config: target,
                    outcome: MergeOutcome::Overwritten,
                })
            }
        }
    }

    fn collisions(&mut self, target: &KubeConfig, name: &str) -> Vec<EntryKind> {
        let mut found = Vec::new();
        if target.contains_cluster(name) {
            found.push(EntryKind::Cluster);
        }
        if target.contains_user(name) {
            found.push(EntryKind::User);
        }
        if target.contains_context(name) {
            found.push(EntryKind::Context);
        }
        for kind in &found {
            self.debug_log(&format!("name '{}' already exists in {}s", name, kind));
        }
        found
    }

    fn append_entry(&mut self, target: &mut KubeConfig, incoming: &mut KubeConfig, name: &str) {
        self.debug_log(&format!("preparing/renaming new config as '{}'", name));
        let mut cluster = incoming.clusters.remove(0);
        let mut user = incoming.users.remove(0);
        let mut context = incoming.contexts.remove(0);

        for (kind, old) in [
            (EntryKind::Cluster, cluster.name().to_string()),
            (EntryKind::User, user.name().to_string()),
            (EntryKind::Context, context.name().to_string()),
        ] {
            self.debug_log(&format!("renaming {} '{}' to '{}'", kind, old, name));
        }
        cluster.rename(name);
        user.rename(name);
        context.rename(name);
        context.bind_to(name);

        self.debug_log(&format!("adding new config '{}'", name));
        target.append_cluster(cluster);
        target.append_user(user);
        target.append_context(context);
    }

    fn overwrite_entry(
        &mut self,
        target: &mut KubeConfig,
        mut incoming: KubeConfig,
        name: &str,
    ) -> Result<(), MergeError> {
        // Every collection must hold the name before anything is touched
        let mut missing = Vec::new();
        if !target.contains_cluster(name) {
            missing.push(EntryKind::Cluster);
        }
        if !target.contains_user(name) {
            missing.push(EntryKind::User);
        }
        if !target.contains_context(name) {
            missing.push(EntryKind::Context);
        }
        if !missing.is_empty() {
            return Err(MergeError::Inconsistent {
                name: name.to_string(),
                missing,
            });
        }

        let cluster = incoming.clusters.remove(0);
        let user = incoming.users.remove(0);
        let mut context = incoming.contexts.remove(0);
        context.bind_to(name);

        self.debug_log(&format!("overriding cluster, user and context '{}'", name));
        target.override_cluster(name, cluster.cluster)?;
        target.override_user(name, user.user)?;
        target.override_context(name, context.context)?;
        self.log(&format!("overwrote context '{}'", name));
        Ok(())
    }
}

fn check_incoming(incoming: &KubeConfig) -> Result<(), MergeError> {
    let counts = [
        (EntryKind::Cluster, incoming.clusters.len()),
        (EntryKind::User, incoming.users.len()),
        (EntryKind::Context, incoming.contexts.len()),
    ];
    for (kind, count) in counts {
        if count != 1 {
            return Err(MergeError::InvalidIncoming(format!(
                "expected exactly one {}, found {}",
                kind, count
            )));
        }
    }
    Ok(())
}
