use crate::domain::options::launcher_factory::LauncherFactory;
use crate::error::{Error, Result};

/// Fully resolved configuration of a node or a template. Nothing here is inherited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOptions {
    pub num_executors: u32,

    /// Idle minutes before the node can be reclaimed. `0` disposes the node as soon as it is idle.
    pub retention_time: i32,

    /// Minimal number of active nodes the owning template keeps. Negative values act as `0`.
    pub instances_min: i32,

    pub launcher_factory: Option<LauncherFactory>,
    pub jvm_options: Option<String>,
    pub fs_root: String,
}

impl NodeOptions {
    pub fn builder() -> NodeOptionsBuilder {
        NodeOptionsBuilder::default()
    }

    /// Builder seeded with every value of `self`.
    pub fn to_builder(&self) -> NodeOptionsBuilder {
        NodeOptionsBuilder {
            num_executors: Some(self.num_executors),
            retention_time: Some(self.retention_time),
            instances_min: Some(self.instances_min),
            launcher_factory: self.launcher_factory.clone(),
            jvm_options: self.jvm_options.clone(),
            fs_root: Some(self.fs_root.clone()),
        }
    }

    pub fn launcher_factory(&self) -> LauncherFactory {
        self.launcher_factory.clone().unwrap_or(LauncherFactory::Jnlp)
    }

    pub fn effective_instances_min(&self) -> u32 {
        self.instances_min.max(0) as u32
    }
}

impl Default for NodeOptions {
    fn default() -> Self {
        NodeOptions {
            num_executors: 1,
            retention_time: 30,
            instances_min: 0,
            launcher_factory: Some(LauncherFactory::Jnlp),
            jvm_options: None,
            fs_root: "/jenkins".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeOptionsBuilder {
    num_executors: Option<u32>,
    retention_time: Option<i32>,
    instances_min: Option<i32>,
    launcher_factory: Option<LauncherFactory>,
    jvm_options: Option<String>,
    fs_root: Option<String>,
}

impl NodeOptionsBuilder {
    pub fn num_executors(mut self, num_executors: u32) -> Self {
        self.num_executors = Some(num_executors);
        self
    }

    pub fn retention_time(mut self, retention_time: i32) -> Self {
        self.retention_time = Some(retention_time);
        self
    }

    pub fn instances_min(mut self, instances_min: i32) -> Self {
        self.instances_min = Some(instances_min);
        self
    }

    pub fn launcher_factory(mut self, launcher_factory: LauncherFactory) -> Self {
        self.launcher_factory = Some(launcher_factory);
        self
    }

    /// Empty strings clear the value.
    pub fn jvm_options(mut self, jvm_options: Option<String>) -> Self {
        self.jvm_options = jvm_options.filter(|opts| !opts.trim().is_empty());
        self
    }

    pub fn fs_root(mut self, fs_root: impl Into<String>) -> Self {
        self.fs_root = Some(fs_root.into());
        self
    }

    pub fn build(self) -> Result<NodeOptions> {
        Ok(NodeOptions {
            num_executors: self.num_executors.ok_or_else(|| missing("numExecutors"))?,
            retention_time: self.retention_time.ok_or_else(|| missing("retentionTime"))?,
            instances_min: self.instances_min.unwrap_or(0),
            launcher_factory: self.launcher_factory,
            jvm_options: self.jvm_options,
            fs_root: self.fs_root.ok_or_else(|| missing("fsRoot"))?,
        })
    }
}

fn missing(field: &str) -> Error {
    Error::MigrationIncomplete(format!("option '{}' is not set", field))
}
