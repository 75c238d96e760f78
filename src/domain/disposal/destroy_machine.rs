use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::domain::cloud::cloud_client::CloudResourceClient;
use crate::domain::disposal::disposable::{Disposable, DisposalState, same_disposable};
use crate::domain::utils::id::{CloudName, ServerId};
use crate::error::{CloudError, DisposalError};

/// Deletes one server. A server or cloud that no longer exists counts as deleted.
#[derive(Debug, Clone)]
pub struct DestroyMachine {
    cloud: CloudName,
    server_id: ServerId,
    client: Arc<dyn CloudResourceClient>,
}

impl DestroyMachine {
    pub fn new(cloud: CloudName, server_id: ServerId, client: Arc<dyn CloudResourceClient>) -> Self {
        DestroyMachine { cloud, server_id, client }
    }
}

impl PartialEq for DestroyMachine {
    fn eq(&self, other: &Self) -> bool {
        self.cloud == other.cloud && self.server_id == other.server_id
    }
}

impl Eq for DestroyMachine {}

impl Hash for DestroyMachine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cloud.hash(state);
        self.server_id.hash(state);
    }
}

impl Disposable for DestroyMachine {
    fn dispose(&self) -> Result<DisposalState, DisposalError> {
        match self.client.delete_server(&self.cloud, &self.server_id) {
            Ok(()) => {
                log::info!("Server {} deleted from cloud {}", self.server_id, self.cloud);
                Ok(DisposalState::Purged)
            }
            Err(CloudError::NotFound { .. }) => {
                log::info!("Server {} is already gone from cloud {}", self.server_id, self.cloud);
                Ok(DisposalState::Purged)
            }
            Err(CloudError::UnknownCloud { .. }) => {
                log::warn!("Cloud {} is no longer configured, giving up on server {}", self.cloud, self.server_id);
                Ok(DisposalState::Purged)
            }
            Err(CloudError::Api { message }) => {
                Err(DisposalError::DeleteFailed { cloud: self.cloud.clone(), server_id: self.server_id.clone(), reason: message })
            }
        }
    }

    fn display_name(&self) -> String {
        format!("Delete server {} in cloud {}", self.server_id, self.cloud)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Disposable) -> bool {
        same_disposable(self, other)
    }
}
