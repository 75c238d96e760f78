use thiserror::Error;

use crate::domain::utils::id::{CloudName, ServerId, TemplateName};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON document: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid controller configuration: {0}")]
    InvalidConfig(String),

    #[error("Node record cannot be migrated: {0}")]
    MigrationIncomplete(String),

    #[error("Server {server_id} does not exist in cloud {cloud}")]
    ResourceNotFound { cloud: CloudName, server_id: ServerId },

    #[error("No cloud named {0} is configured")]
    UnknownCloud(CloudName),

    #[error("Cloud {cloud} has no template named {template}")]
    UnknownTemplate { cloud: CloudName, template: TemplateName },

    #[error("Server {0} carries no template name tag")]
    MissingTemplateTag(ServerId),

    #[error("Cloud API request failed: {0}")]
    Cloud(CloudError),
}

impl Error {
    /// Lifts a cloud client error into the crate error, keeping not-found explicit.
    pub fn from_cloud(cloud: &CloudName, err: CloudError) -> Self {
        match err {
            CloudError::NotFound { server_id } => Error::ResourceNotFound { cloud: cloud.clone(), server_id },
            CloudError::UnknownCloud { cloud } => Error::UnknownCloud(cloud),
            other => Error::Cloud(other),
        }
    }
}

/// Failures reported by a [`CloudResourceClient`](crate::domain::cloud::cloud_client::CloudResourceClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloudError {
    #[error("server {server_id} not found")]
    NotFound { server_id: ServerId },

    #[error("cloud {cloud} is not configured")]
    UnknownCloud { cloud: CloudName },

    #[error("{message}")]
    Api { message: String },
}

/// Raised by a disposal action. Cloneable so the failure can be recorded and still handed
/// back to the disposer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisposalError {
    #[error("Failed to delete server {server_id} in cloud {cloud}: {reason}")]
    DeleteFailed { cloud: CloudName, server_id: ServerId, reason: String },

    #[error("Disposal of {name} failed: {reason}")]
    Other { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("Activity {activity} has not entered phase {phase:?} yet")]
    PhaseNotEntered { activity: String, phase: crate::domain::activity::provisioning_activity::Phase },
}

pub type Result<T> = std::result::Result<T, Error>;
