use serde::{Deserialize, Serialize};

use crate::domain::options::launcher_factory::LauncherFactory;
use crate::domain::options::node_options::{NodeOptions, NodeOptionsBuilder};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOptionsDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_executors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_factory: Option<LauncherFactoryDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum LauncherFactoryDto {
    Ssh {
        #[serde(rename = "credentialsId", default, skip_serializing_if = "Option::is_none")]
        credentials_id: Option<String>,
    },
    Jnlp,
}

impl NodeOptionsDto {
    /// Applies every value present in the document on top of `base`.
    pub fn overlay(self, base: NodeOptionsBuilder) -> NodeOptionsBuilder {
        let mut builder = base;
        if let Some(num_executors) = self.num_executors {
            builder = builder.num_executors(num_executors);
        }
        if let Some(retention_time) = self.retention_time {
            builder = builder.retention_time(retention_time);
        }
        if let Some(instances_min) = self.instances_min {
            builder = builder.instances_min(instances_min);
        }
        if let Some(launcher_factory) = self.launcher_factory {
            builder = builder.launcher_factory(launcher_factory.into());
        }
        if self.jvm_options.is_some() {
            builder = builder.jvm_options(self.jvm_options);
        }
        if let Some(fs_root) = self.fs_root {
            builder = builder.fs_root(fs_root);
        }
        builder
    }
}

impl From<LauncherFactoryDto> for LauncherFactory {
    fn from(dto: LauncherFactoryDto) -> Self {
        match dto {
            LauncherFactoryDto::Ssh { credentials_id } => LauncherFactory::Ssh { credentials_id },
            LauncherFactoryDto::Jnlp => LauncherFactory::Jnlp,
        }
    }
}

impl From<&LauncherFactory> for LauncherFactoryDto {
    fn from(factory: &LauncherFactory) -> Self {
        match factory {
            LauncherFactory::Ssh { credentials_id } => LauncherFactoryDto::Ssh { credentials_id: credentials_id.clone() },
            LauncherFactory::Jnlp => LauncherFactoryDto::Jnlp,
        }
    }
}

impl From<&NodeOptions> for NodeOptionsDto {
    fn from(options: &NodeOptions) -> Self {
        NodeOptionsDto {
            num_executors: Some(options.num_executors),
            retention_time: Some(options.retention_time),
            instances_min: Some(options.instances_min),
            launcher_factory: options.launcher_factory.as_ref().map(LauncherFactoryDto::from),
            jvm_options: options.jvm_options.clone(),
            fs_root: Some(options.fs_root.clone()),
        }
    }
}
