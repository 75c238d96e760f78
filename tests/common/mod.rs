#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cloud_worker_lifecycle::domain::cloud::cloud_client::{
    AddressKind, CloudResourceClient, ServerAddress, ServerInfo, TEMPLATE_NAME_METADATA_KEY,
};
use cloud_worker_lifecycle::domain::cloud::template::{Template, TemplateRegistry};
use cloud_worker_lifecycle::domain::disposal::async_disposer::AsyncDisposer;
use cloud_worker_lifecycle::domain::disposal::disposable::Disposable;
use cloud_worker_lifecycle::domain::node::execution_channel::{ExecutionChannel, OfflineCause};
use cloud_worker_lifecycle::domain::options::node_options::NodeOptions;
use cloud_worker_lifecycle::domain::utils::id::{CloudName, ServerId, TemplateName};
use cloud_worker_lifecycle::error::CloudError;

/// Cloud with a fixed set of servers. Deletes can be scripted to fail.
#[derive(Debug, Default)]
pub struct MockCloud {
    servers: Mutex<HashMap<String, ServerInfo>>,
    delete_failures: Mutex<VecDeque<String>>,
    pub delete_calls: AtomicUsize,
}

impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_server(&self, server: ServerInfo) {
        self.servers.lock().unwrap().insert(server.id.to_string(), server);
    }

    pub fn fail_next_delete(&self, message: &str) {
        self.delete_failures.lock().unwrap().push_back(message.to_string());
    }

    pub fn has_server(&self, id: &str) -> bool {
        self.servers.lock().unwrap().contains_key(id)
    }
}

impl CloudResourceClient for MockCloud {
    fn get_server_by_id(&self, _cloud: &CloudName, server_id: &ServerId) -> Result<ServerInfo, CloudError> {
        self.servers.lock().unwrap().get(server_id.as_str()).cloned().ok_or_else(|| CloudError::NotFound { server_id: server_id.clone() })
    }

    fn delete_server(&self, _cloud: &CloudName, server_id: &ServerId) -> Result<(), CloudError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.delete_failures.lock().unwrap().pop_front() {
            return Err(CloudError::Api { message });
        }
        match self.servers.lock().unwrap().remove(server_id.as_str()) {
            Some(_) => Ok(()),
            None => Err(CloudError::NotFound { server_id: server_id.clone() }),
        }
    }
}

pub fn server(id: &str, template: Option<&str>) -> ServerInfo {
    let mut server = ServerInfo::new(ServerId::new(id), format!("node-{}", id));
    server.addresses.insert(
        "private".to_string(),
        vec![
            ServerAddress { addr: "10.0.0.7".to_string(), version: 4, kind: AddressKind::Fixed },
            ServerAddress { addr: "192.0.2.15".to_string(), version: 4, kind: AddressKind::Floating },
        ],
    );
    if let Some(template) = template {
        server.metadata.insert(TEMPLATE_NAME_METADATA_KEY.to_string(), template.to_string());
    }
    server
}

#[derive(Debug)]
pub struct MockTemplate {
    pub name: String,
    pub options: NodeOptions,
    pub active: AtomicUsize,
    pub used: AtomicUsize,
}

impl MockTemplate {
    pub fn new(name: &str, instances_min: i32, retention_time: i32) -> Self {
        MockTemplate {
            name: name.to_string(),
            options: NodeOptions { instances_min, retention_time, ..NodeOptions::default() },
            active: AtomicUsize::new(0),
            used: AtomicUsize::new(0),
        }
    }

    pub fn set_counts(&self, active: usize, used: usize) {
        self.active.store(active, Ordering::SeqCst);
        self.used.store(used, Ordering::SeqCst);
    }
}

impl Template for MockTemplate {
    fn name(&self) -> TemplateName {
        TemplateName::new(self.name.clone())
    }

    fn effective_options(&self) -> NodeOptions {
        self.options.clone()
    }

    fn active_node_count(&self, used_only: bool) -> usize {
        if used_only { self.used.load(Ordering::SeqCst) } else { self.active.load(Ordering::SeqCst) }
    }
}

#[derive(Debug, Default)]
pub struct MockTemplateRegistry {
    templates: Mutex<HashMap<(String, String), Arc<MockTemplate>>>,
}

impl MockTemplateRegistry {
    pub fn add(&self, cloud: &str, template: Arc<MockTemplate>) {
        self.templates.lock().unwrap().insert((cloud.to_string(), template.name.clone()), template);
    }
}

impl TemplateRegistry for MockTemplateRegistry {
    fn template(&self, cloud: &CloudName, name: &TemplateName) -> Option<Arc<dyn Template>> {
        let template = self.templates.lock().unwrap().get(&(cloud.to_string(), name.to_string())).cloned()?;
        Some(template)
    }
}

#[derive(Debug, Default)]
pub struct MockChannel {
    pub used: AtomicBool,
    pub offline_cause: Mutex<Option<OfflineCause>>,
}

impl MockChannel {
    pub fn with_offline_cause(description: &str) -> Self {
        MockChannel { used: AtomicBool::new(true), offline_cause: Mutex::new(Some(OfflineCause::new(description))) }
    }
}

impl ExecutionChannel for MockChannel {
    fn is_new(&self) -> bool {
        !self.used.load(Ordering::SeqCst)
    }

    fn fatal_offline_cause(&self) -> Option<OfflineCause> {
        self.offline_cause.lock().unwrap().clone()
    }
}

/// Keeps submitted tasks so tests can run them by hand.
#[derive(Debug, Default)]
pub struct RecordingDisposer {
    pub submitted: Mutex<Vec<Box<dyn Disposable>>>,
}

impl AsyncDisposer for RecordingDisposer {
    fn submit(&self, task: Box<dyn Disposable>) {
        self.submitted.lock().unwrap().push(task);
    }
}

pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub fn temp_file(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}-{}.json", prefix, uuid::Uuid::new_v4()))
}
