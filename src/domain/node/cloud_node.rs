use std::sync::Arc;

use crate::domain::node::execution_channel::{ExecutionChannel, OfflineCause};
use crate::domain::node::node_record::NodeRecord;
use crate::domain::options::node_options::NodeOptions;
use crate::domain::utils::id::{CloudName, NodeName, ProvisioningActivityId, ServerId};

/// A restored node: its canonical record plus the execution channel while one is connected.
#[derive(Debug, Clone)]
pub struct CloudNode {
    pub name: NodeName,
    pub record: NodeRecord,
    channel: Option<Arc<dyn ExecutionChannel>>,
}

impl CloudNode {
    pub fn new(name: NodeName, record: NodeRecord) -> Self {
        CloudNode { name, record, channel: None }
    }

    pub fn attach_channel(&mut self, channel: Arc<dyn ExecutionChannel>) {
        self.channel = Some(channel);
    }

    pub fn detach_channel(&mut self) -> Option<Arc<dyn ExecutionChannel>> {
        self.channel.take()
    }

    pub fn channel(&self) -> Option<&Arc<dyn ExecutionChannel>> {
        self.channel.as_ref()
    }

    pub fn fatal_offline_cause(&self) -> Option<OfflineCause> {
        self.channel.as_ref().and_then(|channel| channel.fatal_offline_cause())
    }

    pub fn cloud_name(&self) -> &CloudName {
        &self.record.cloud_name
    }

    pub fn resource_id(&self) -> &ServerId {
        &self.record.resource_id
    }

    pub fn provisioning_id(&self) -> &ProvisioningActivityId {
        &self.record.provisioning_id
    }

    pub fn options(&self) -> &NodeOptions {
        &self.record.effective_options
    }

    pub fn created_at(&self) -> i64 {
        self.record.created_at
    }
}
