use std::collections::{BTreeMap, HashMap};

use crate::domain::utils::id::{CloudName, ServerId, TemplateName};
use crate::error::CloudError;

/// Server metadata key holding the name of the template a server was provisioned from.
pub const TEMPLATE_NAME_METADATA_KEY: &str = "jenkins-template-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Fixed,
    Floating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub addr: String,
    pub version: u8,
    pub kind: AddressKind,
}

/// The parts of a cloud server description the lifecycle controller looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub id: ServerId,
    pub name: String,
    /// Addresses grouped by network name.
    pub addresses: BTreeMap<String, Vec<ServerAddress>>,
    pub metadata: HashMap<String, String>,
}

impl ServerInfo {
    pub fn new(id: ServerId, name: impl Into<String>) -> Self {
        ServerInfo { id, name: name.into(), addresses: BTreeMap::new(), metadata: HashMap::new() }
    }

    /// Address the node is reachable on: IPv4 before IPv6, floating before fixed within a version.
    pub fn public_address(&self) -> Option<&str> {
        self.pick_address(|_| true)
    }

    pub fn public_address_ipv4(&self) -> Option<&str> {
        self.pick_address(|addr| addr.version == 4)
    }

    pub fn template_name(&self) -> Option<TemplateName> {
        self.metadata.get(TEMPLATE_NAME_METADATA_KEY).map(TemplateName::new)
    }

    fn pick_address(&self, accept: impl Fn(&ServerAddress) -> bool) -> Option<&str> {
        self.addresses
            .values()
            .flatten()
            .filter(|addr| accept(*addr))
            .min_by_key(|addr| (addr.version != 4, addr.kind != AddressKind::Floating))
            .map(|addr| addr.addr.as_str())
    }
}

/// Provider API used to inspect and delete servers.
pub trait CloudResourceClient: std::fmt::Debug + Send + Sync {
    fn get_server_by_id(&self, cloud: &CloudName, server_id: &ServerId) -> Result<ServerInfo, CloudError>;

    fn delete_server(&self, cloud: &CloudName, server_id: &ServerId) -> Result<(), CloudError>;
}
