use std::sync::{Arc, PoisonError};

use crate::domain::activity::activity_store::ActivityHistoryStore;
use crate::domain::activity::provisioning_activity::{Phase, PhaseExecutionAttachment, Status};
use crate::domain::cloud::cloud_client::CloudResourceClient;
use crate::domain::disposal::async_disposer::AsyncDisposer;
use crate::domain::disposal::destroy_machine::DestroyMachine;
use crate::domain::disposal::record_disposal::RecordDisposal;
use crate::domain::node::cloud_node::CloudNode;
use crate::logger::LIFECYCLE_TARGET;

/// Tears a node down: closes its provisioning activity and hands the server to the disposer.
#[derive(Debug, Clone)]
pub struct TerminationCoordinator {
    activities: Arc<dyn ActivityHistoryStore>,
    disposer: Arc<dyn AsyncDisposer>,
    cloud_client: Arc<dyn CloudResourceClient>,
}

impl TerminationCoordinator {
    pub fn new(activities: Arc<dyn ActivityHistoryStore>, disposer: Arc<dyn AsyncDisposer>, cloud_client: Arc<dyn CloudResourceClient>) -> Self {
        TerminationCoordinator { activities, disposer, cloud_client }
    }

    /// Called once per node while it is being removed. Bookkeeping problems are logged; the
    /// disposal is submitted in every case.
    pub fn on_terminate(&self, node: &CloudNode) {
        self.complete_activity(node);

        let task = RecordDisposal::new(
            DestroyMachine::new(node.cloud_name().clone(), node.resource_id().clone(), self.cloud_client.clone()),
            node.provisioning_id().clone(),
            self.activities.clone(),
        );

        tracing::info!(
            target: LIFECYCLE_TARGET,
            Node = %node.name,
            Cloud = %node.cloud_name(),
            ServerId = %node.resource_id(),
            ProvisioningId = %node.provisioning_id(),
            "Node terminated, server handed over for disposal"
        );
        self.disposer.submit(Box::new(task));
    }

    fn complete_activity(&self, node: &CloudNode) {
        let Some(handle) = self.activities.activity_for(node.provisioning_id()) else {
            tracing::warn!(
                target: LIFECYCLE_TARGET,
                Node = %node.name,
                ProvisioningId = %node.provisioning_id(),
                "No active provisioning activity for terminated node"
            );
            return;
        };

        let mut activity = handle.write().unwrap_or_else(PoisonError::into_inner);
        activity.enter_if_not_already(Phase::Completed);

        // Most likely reason the node is going away.
        if let Some(cause) = node.fatal_offline_cause() {
            if let Err(err) = activity.attach(Phase::Completed, PhaseExecutionAttachment::message(Status::Warn, cause.to_string())) {
                tracing::warn!(target: LIFECYCLE_TARGET, Node = %node.name, "Unable to record offline cause: {}", err);
            }
        }
    }
}
