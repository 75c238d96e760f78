use std::path::Path;
use std::sync::Arc;

use crate::api::node_record_dto::NodeRecordDto;
use crate::domain::activity::activity_store::ActivityHistoryStore;
use crate::domain::cloud::cloud_client::{CloudResourceClient, ServerInfo};
use crate::domain::cloud::template::{Template, TemplateRegistry};
use crate::domain::config::ControllerConfig;
use crate::domain::disposal::async_disposer::AsyncDisposer;
use crate::domain::node::cloud_node::CloudNode;
use crate::domain::node::migrator;
use crate::domain::node::node_record::StoredNodeRecord;
use crate::domain::retention::retention_evaluator;
use crate::domain::termination::termination_coordinator::TerminationCoordinator;
use crate::domain::utils::id::NodeName;
use crate::error::{Error, Result};
use crate::loader::parser::{parse_json_file, write_json_file};

/// Entry point the host uses for everything that happens to an already provisioned node.
#[derive(Debug, Clone)]
pub struct NodeLifecycleController {
    config: ControllerConfig,
    cloud_client: Arc<dyn CloudResourceClient>,
    templates: Arc<dyn TemplateRegistry>,
    termination: TerminationCoordinator,
}

impl NodeLifecycleController {
    pub fn new(
        config: ControllerConfig,
        cloud_client: Arc<dyn CloudResourceClient>,
        templates: Arc<dyn TemplateRegistry>,
        activities: Arc<dyn ActivityHistoryStore>,
        disposer: Arc<dyn AsyncDisposer>,
    ) -> Self {
        let termination = TerminationCoordinator::new(activities, disposer, cloud_client.clone());
        NodeLifecycleController { config, cloud_client, templates, termination }
    }

    /// Migrates a stored record and wraps it into a node without an execution channel.
    pub fn restore_node(&self, dto: NodeRecordDto, name: NodeName) -> Result<CloudNode> {
        let stored = StoredNodeRecord::try_from(dto)?;
        let record = migrator::normalize(stored, &self.config.default_options)?;
        log::debug!("Restored node {} backed by server {}", name, record.resource_id);
        Ok(CloudNode::new(name, record))
    }

    pub fn load_node(&self, path: impl AsRef<Path>, name: NodeName) -> Result<CloudNode> {
        let dto: NodeRecordDto = parse_json_file(path)?;
        self.restore_node(dto, name)
    }

    /// Persists the node in the current record format.
    pub fn save_node(&self, node: &CloudNode, path: impl AsRef<Path>) -> Result<()> {
        write_json_file(path, &NodeRecordDto::from(&node.record))
    }

    /// Template the node's server was provisioned from, found through the server's metadata tag.
    pub fn template_for_node(&self, node: &CloudNode) -> Result<Arc<dyn Template>> {
        let server = self.server(node)?;
        let template_name = server.template_name().ok_or_else(|| Error::MissingTemplateTag(node.resource_id().clone()))?;

        self.templates
            .template(node.cloud_name(), &template_name)
            .ok_or_else(|| Error::UnknownTemplate { cloud: node.cloud_name().clone(), template: template_name })
    }

    /// Fails with `ResourceNotFound` when the server was deleted behind the controller's back.
    pub fn public_address(&self, node: &CloudNode) -> Result<Option<String>> {
        Ok(self.server(node)?.public_address().map(str::to_string))
    }

    pub fn public_address_ipv4(&self, node: &CloudNode) -> Result<Option<String>> {
        Ok(self.server(node)?.public_address_ipv4().map(str::to_string))
    }

    /// Whether the node has to be kept to satisfy its template's minimal instance count.
    pub fn should_be_retained(&self, node: &CloudNode) -> Result<bool> {
        let template = self.template_for_node(node)?;
        Ok(retention_evaluator::should_retain(node, template.as_ref()))
    }

    pub fn terminate(&self, node: &CloudNode) {
        self.termination.on_terminate(node);
    }

    fn server(&self, node: &CloudNode) -> Result<ServerInfo> {
        self.cloud_client.get_server_by_id(node.cloud_name(), node.resource_id()).map_err(|err| Error::from_cloud(node.cloud_name(), err))
    }
}
