use chrono::Utc;

use crate::api::node_options_dto::NodeOptionsDto;
use crate::api::node_record_dto::{LegacyPayloadDto, LegacyServerDto, NodeRecordDto};
use crate::domain::cloud::cloud_client::ServerInfo;
use crate::domain::node::migrator::strip_region_prefix;
use crate::domain::options::node_options::{NodeOptions, NodeOptionsBuilder};
use crate::domain::utils::id::{CloudName, ProvisioningActivityId, ServerId};
use crate::error::Error;

/// Canonical record of one leased server. Only produced by the migrator or for a freshly
/// provisioned server, so `effective_options` is always resolved and `resource_id` carries no
/// region prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub cloud_name: CloudName,
    pub resource_id: ServerId,
    pub effective_options: NodeOptions,
    pub provisioning_id: ProvisioningActivityId,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl NodeRecord {
    pub fn new(provisioning_id: ProvisioningActivityId, cloud_name: CloudName, server: &ServerInfo, options: NodeOptions) -> Self {
        NodeRecord {
            cloud_name,
            resource_id: ServerId::new(strip_region_prefix(server.id.as_str())),
            effective_options: options,
            provisioning_id,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Fields older record formats carried instead of structured options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyPayload {
    pub override_retention_time: Option<i32>,
    pub jvm_options: Option<String>,
    pub credentials_id: Option<String>,
    pub slave_type: Option<String>,
    /// Id of the server description older versions stored in place of the node id.
    pub metadata_server_id: Option<ServerId>,
}

/// A record as read from storage, before migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNodeRecord {
    pub cloud_name: CloudName,
    pub resource_id: Option<ServerId>,
    pub effective_options: Option<NodeOptions>,
    pub provisioning_id: ProvisioningActivityId,
    pub created_at: i64,
    pub legacy: LegacyPayload,
}

impl TryFrom<NodeRecordDto> for StoredNodeRecord {
    type Error = Error;

    fn try_from(dto: NodeRecordDto) -> Result<Self, Self::Error> {
        // Stored options are complete by construction; nothing is filled in from defaults here.
        let effective_options = match dto.options {
            Some(options) => Some(options.overlay(NodeOptionsBuilder::default()).build()?),
            None => None,
        };

        let legacy = LegacyPayload {
            override_retention_time: dto.legacy.override_retention_time,
            jvm_options: dto.legacy.jvm_options,
            credentials_id: dto.legacy.credentials_id,
            slave_type: dto.legacy.slave_type,
            metadata_server_id: dto.legacy.metadata.map(|server| ServerId::new(server.id)),
        };

        Ok(StoredNodeRecord {
            cloud_name: CloudName::new(dto.cloud_name),
            resource_id: dto.node_id.map(ServerId::new),
            effective_options,
            provisioning_id: ProvisioningActivityId::new(dto.provisioning_id),
            created_at: dto.created,
            legacy,
        })
    }
}

impl From<NodeRecord> for StoredNodeRecord {
    fn from(record: NodeRecord) -> Self {
        StoredNodeRecord {
            cloud_name: record.cloud_name,
            resource_id: Some(record.resource_id),
            effective_options: Some(record.effective_options),
            provisioning_id: record.provisioning_id,
            created_at: record.created_at,
            legacy: LegacyPayload::default(),
        }
    }
}

impl From<&StoredNodeRecord> for NodeRecordDto {
    fn from(record: &StoredNodeRecord) -> Self {
        NodeRecordDto {
            cloud_name: record.cloud_name.to_string(),
            node_id: record.resource_id.as_ref().map(ServerId::to_string),
            options: record.effective_options.as_ref().map(NodeOptionsDto::from),
            provisioning_id: record.provisioning_id.to_string(),
            created: record.created_at,
            legacy: LegacyPayloadDto {
                override_retention_time: record.legacy.override_retention_time,
                jvm_options: record.legacy.jvm_options.clone(),
                credentials_id: record.legacy.credentials_id.clone(),
                slave_type: record.legacy.slave_type.clone(),
                metadata: record.legacy.metadata_server_id.as_ref().map(|id| LegacyServerDto { id: id.to_string() }),
            },
        }
    }
}

impl From<&NodeRecord> for NodeRecordDto {
    fn from(record: &NodeRecord) -> Self {
        NodeRecordDto::from(&StoredNodeRecord::from(record.clone()))
    }
}
