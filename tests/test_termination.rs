mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use cloud_worker_lifecycle::domain::activity::activity_store::{ActivityHistoryStore, InMemoryActivityStore};
use cloud_worker_lifecycle::domain::activity::provisioning_activity::{Phase, ProvisioningActivity, Status};
use cloud_worker_lifecycle::domain::config::{ControllerConfig, DisposerConfig};
use cloud_worker_lifecycle::domain::controller::NodeLifecycleController;
use cloud_worker_lifecycle::domain::disposal::async_disposer::{AsyncDisposer, AsyncResourceDisposer};
use cloud_worker_lifecycle::domain::disposal::disposable::DisposalState;
use cloud_worker_lifecycle::domain::node::cloud_node::CloudNode;
use cloud_worker_lifecycle::domain::node::node_record::NodeRecord;
use cloud_worker_lifecycle::domain::options::node_options::NodeOptions;
use cloud_worker_lifecycle::domain::utils::id::{CloudName, NodeName, ProvisioningActivityId};
use cloud_worker_lifecycle::error::DisposalError;

use common::{MockChannel, MockCloud, MockTemplateRegistry, RecordingDisposer, server, wait_until};

fn node(server_id: &str, activity: &str) -> CloudNode {
    let record = NodeRecord::new(ProvisioningActivityId::new(activity), CloudName::new("openstack"), &server(server_id, None), NodeOptions::default());
    CloudNode::new(NodeName::new(format!("node-{}", server_id)), record)
}

fn controller(cloud: Arc<MockCloud>, activities: InMemoryActivityStore, disposer: Arc<dyn AsyncDisposer>) -> NodeLifecycleController {
    NodeLifecycleController::new(ControllerConfig::default(), cloud, Arc::new(MockTemplateRegistry::default()), Arc::new(activities), disposer)
}

fn fast_disposer() -> Arc<AsyncResourceDisposer> {
    let config = DisposerConfig { initial_backoff: Duration::from_millis(5), max_backoff: Duration::from_millis(20), tick: Duration::from_millis(2) };
    Arc::new(AsyncResourceDisposer::start(config).unwrap())
}

#[test]
fn termination_completes_activity_and_records_offline_cause() {
    let cloud = Arc::new(MockCloud::new());
    cloud.add_server(server("abc", None));
    let activities = InMemoryActivityStore::new();
    let handle = activities.register(ProvisioningActivity::new(ProvisioningActivityId::new("act-1")));
    handle.write().unwrap().enter_if_not_already(Phase::Operating);
    let disposer = Arc::new(RecordingDisposer::default());
    let controller = controller(cloud, activities.clone(), disposer.clone());

    let mut node = node("abc", "act-1");
    node.attach_channel(Arc::new(MockChannel::with_offline_cause("Agent went offline: heartbeat lost")));
    controller.terminate(&node);

    let activity = handle.read().unwrap();
    assert!(activity.is_completed());
    let attachments = activity.attachments(Phase::Completed);
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].status, Status::Warn);
    assert_eq!(attachments[0].title, "Agent went offline: heartbeat lost");
    assert!(!attachments[0].is_exception());

    assert_eq!(disposer.submitted.lock().unwrap().len(), 1);
}

#[test]
fn termination_without_activity_still_submits_disposal() {
    let cloud = Arc::new(MockCloud::new());
    cloud.add_server(server("abc", None));
    let disposer = Arc::new(RecordingDisposer::default());
    let controller = controller(cloud.clone(), InMemoryActivityStore::new(), disposer.clone());

    controller.terminate(&node("abc", "pruned"));

    let submitted = disposer.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].dispose().unwrap(), DisposalState::Purged);
    assert!(!cloud.has_server("abc"));
}

#[test]
fn disposal_failure_is_attached_once_and_rethrown() {
    let cloud = Arc::new(MockCloud::new());
    cloud.add_server(server("abc", None));
    cloud.fail_next_delete("503 Service Unavailable");
    let activities = InMemoryActivityStore::new();
    activities.register(ProvisioningActivity::new(ProvisioningActivityId::new("act-1")));
    let disposer = Arc::new(RecordingDisposer::default());
    let controller = controller(cloud.clone(), activities.clone(), disposer.clone());

    controller.terminate(&node("abc", "act-1"));
    let submitted = disposer.submitted.lock().unwrap();

    match submitted[0].dispose() {
        Err(DisposalError::DeleteFailed { reason, .. }) => assert_eq!(reason, "503 Service Unavailable"),
        other => panic!("expected the delete failure to be passed on, got {:?}", other),
    }

    let handle = activities.activity_including_completed(&ProvisioningActivityId::new("act-1")).unwrap();
    let exceptions: Vec<_> = handle.read().unwrap().attachments(Phase::Completed).iter().filter(|a| a.is_exception()).cloned().collect();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].status, Status::Warn);
    assert!(exceptions[0].title.contains("503 Service Unavailable"));

    assert_eq!(submitted[0].dispose().unwrap(), DisposalState::Purged);
    assert!(!cloud.has_server("abc"));
}

#[test]
fn background_disposer_retries_failed_delete() {
    let cloud = Arc::new(MockCloud::new());
    cloud.add_server(server("abc", None));
    cloud.fail_next_delete("timeout");
    cloud.fail_next_delete("timeout");
    let activities = InMemoryActivityStore::new();
    activities.register(ProvisioningActivity::new(ProvisioningActivityId::new("act-1")));
    let disposer = fast_disposer();
    let controller = controller(cloud.clone(), activities.clone(), disposer.clone());

    controller.terminate(&node("abc", "act-1"));

    assert!(wait_until(|| disposer.is_idle()));
    assert_eq!(cloud.delete_calls.load(Ordering::SeqCst), 3);
    assert!(!cloud.has_server("abc"));

    let handle = activities.activity_including_completed(&ProvisioningActivityId::new("act-1")).unwrap();
    assert_eq!(handle.read().unwrap().attachments(Phase::Completed).iter().filter(|a| a.is_exception()).count(), 2);
}

#[test]
fn repeated_termination_is_disposed_once() {
    let cloud = Arc::new(MockCloud::new());
    cloud.add_server(server("abc", None));
    for _ in 0..3 {
        cloud.fail_next_delete("busy");
    }
    let disposer = fast_disposer();
    let controller = controller(cloud.clone(), InMemoryActivityStore::new(), disposer.clone());
    let node = node("abc", "act-1");

    controller.terminate(&node);
    controller.terminate(&node);

    assert!(disposer.backlog().len() <= 1);
    assert!(wait_until(|| disposer.is_idle()));
    assert_eq!(cloud.delete_calls.load(Ordering::SeqCst), 4);
}
