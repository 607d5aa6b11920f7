// src/kubeconfig/config.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::io;

use super::types::{
    ClusterInfo, ContextInfo, EntryKind, Named, NamedCluster, NamedContext, NamedUser, UserInfo,
};

#[derive(Debug)]
pub enum KubeConfigError {
    NotFound { kind: EntryKind, name: String },
    Decode(serde_yaml::Error),
    Encode(serde_yaml::Error),
}

impl std::fmt::Display for KubeConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, name } => {
                write!(f, "{} '{}' can not be found in kubeconfig", kind, name)
            }
            Self::Decode(e) => write!(f, "could not decode kubeconfig: {}", e),
            Self::Encode(e) => write!(f, "could not encode kubeconfig: {}", e),
        }
    }
}

impl std::error::Error for KubeConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) | Self::Encode(e) => Some(e),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<KubeConfigError> for io::Error {
    fn from(error: KubeConfigError) -> Self {
        let kind = match &error {
            KubeConfigError::NotFound { .. } => io::ErrorKind::NotFound,
            KubeConfigError::Decode(_) => io::ErrorKind::InvalidData,
            KubeConfigError::Encode(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, error.to_string())
    }
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "Config".to_string()
}

// kubectl writes `clusters: null` for empty collections
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KubeConfig {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters: Vec<NamedCluster>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<NamedUser>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contexts: Vec<NamedContext>,
    #[serde(rename = "current-context", default, deserialize_with = "null_as_default")]
    pub current_context: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            clusters: Vec::new(),
            users: Vec::new(),
            contexts: Vec::new(),
            current_context: String::new(),
            kind: default_kind(),
            preferences: BTreeMap::new(),
            extra: Mapping::new(),
        }
    }
}

fn position<T: Named>(entries: &[T], name: &str) -> Result<usize, KubeConfigError> {
    entries
        .iter()
        .position(|entry| entry.name() == name)
        .ok_or_else(|| KubeConfigError::NotFound {
            kind: T::KIND,
            name: name.to_string(),
        })
}

impl KubeConfig {
    pub fn from_yaml(input: &[u8]) -> Result<Self, KubeConfigError> {
        // A blank document (e.g. a freshly created file) is an empty config
        if input.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_yaml::from_slice(input).map_err(KubeConfigError::Decode)
    }

    pub fn to_yaml(&self) -> Result<Vec<u8>, KubeConfigError> {
        serde_yaml::to_string(self)
            .map(String::into_bytes)
            .map_err(KubeConfigError::Encode)
    }

    pub fn find_cluster(&self, name: &str) -> Result<&NamedCluster, KubeConfigError> {
        position(&self.clusters, name).map(|i| &self.clusters[i])
    }

    pub fn find_user(&self, name: &str) -> Result<&NamedUser, KubeConfigError> {
        position(&self.users, name).map(|i| &self.users[i])
    }

    pub fn find_context(&self, name: &str) -> Result<&NamedContext, KubeConfigError> {
        position(&self.contexts, name).map(|i| &self.contexts[i])
    }

    pub fn contains_cluster(&self, name: &str) -> bool {
        self.find_cluster(name).is_ok()
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.find_user(name).is_ok()
    }

    pub fn contains_context(&self, name: &str) -> bool {
        self.find_context(name).is_ok()
    }

    pub fn append_cluster(&mut self, cluster: NamedCluster) {
        self.clusters.push(cluster);
    }

    pub fn append_user(&mut self, user: NamedUser) {
        self.users.push(user);
    }

    pub fn append_context(&mut self, context: NamedContext) {
        self.contexts.push(context);
    }

    pub fn override_cluster(
        &mut self,
        name: &str,
        payload: ClusterInfo,
    ) -> Result<(), KubeConfigError> {
        let index = position(&self.clusters, name)?;
        let entry = &mut self.clusters[index];
        entry.cluster = payload;
        entry.rename(name);
        Ok(())
    }

    pub fn override_user(&mut self, name: &str, payload: UserInfo) -> Result<(), KubeConfigError> {
        let index = position(&self.users, name)?;
        let entry = &mut self.users[index];
        entry.user = payload;
        entry.rename(name);
        Ok(())
    }

    pub fn override_context(
        &mut self,
        name: &str,
        payload: ContextInfo,
    ) -> Result<(), KubeConfigError> {
        let index = position(&self.contexts, name)?;
        let entry = &mut self.contexts[index];
        entry.context = payload;
        entry.rename(name);
        Ok(())
    }
}
