use serde::{Deserialize, Serialize};

use crate::api::node_options_dto::NodeOptionsDto;

/// On-disk shape of a node record. Older versions of the format stored a handful of scalar
/// fields instead of `options` and sometimes the whole server description instead of `nodeId`;
/// those live in the flattened [`LegacyPayloadDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecordDto {
    pub cloud_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<NodeOptionsDto>,
    pub provisioning_id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(flatten)]
    pub legacy: LegacyPayloadDto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPayloadDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_retention_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slave_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LegacyServerDto>,
}

/// Only the identifier of the legacy server description is still of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyServerDto {
    pub id: String,
}
