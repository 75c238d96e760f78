use serde::Deserialize;

use crate::api::node_options_dto::NodeOptionsDto;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfigDto {
    #[serde(default)]
    pub default_options: Option<NodeOptionsDto>,
    #[serde(default)]
    pub disposer: Option<DisposerConfigDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposerConfigDto {
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub tick_ms: Option<u64>,
}
