// src/kubeconfig/mod.rs
mod config;
mod merge;
mod types;

#[cfg(test)]
pub use config::KubeConfig;
pub use merge::{CollisionPolicy, Decision, MergeEngine, MergeOutcome};
