use crate::domain::node::node_record::{LegacyPayload, NodeRecord, StoredNodeRecord};
use crate::domain::options::launcher_factory::LauncherFactory;
use crate::domain::options::node_options::NodeOptions;
use crate::domain::utils::id::ServerId;
use crate::error::{Error, Result};

const LEGACY_SSH_SLAVE_TYPE: &str = "SSH";

/// Brings a stored record of any format version into canonical form.
///
/// Records without structured options get them rebuilt from `defaults` plus whatever the
/// legacy scalar fields say. A legacy server id wins over a missing or different `resource_id`.
/// The region prefix is always stripped. The legacy payload is dropped.
///
/// Normalizing an already canonical record returns it unchanged.
pub fn normalize(stored: StoredNodeRecord, defaults: &NodeOptions) -> Result<NodeRecord> {
    let StoredNodeRecord { cloud_name, resource_id, effective_options, provisioning_id, created_at, legacy } = stored;

    let effective_options = match effective_options {
        Some(options) => options,
        None => {
            log::info!("Rebuilding options of node record {} from legacy fields", provisioning_id);
            options_from_legacy(&legacy, defaults)?
        }
    };

    let resource_id = match (resource_id, legacy.metadata_server_id) {
        (Some(current), Some(legacy_id)) if current == legacy_id => current,
        (_, Some(legacy_id)) => {
            log::info!("Node record {} adopts server id {} from legacy metadata", provisioning_id, legacy_id);
            legacy_id
        }
        (Some(current), None) => current,
        (None, None) => {
            return Err(Error::MigrationIncomplete(format!("node record {} names no server", provisioning_id)));
        }
    };

    let stripped = strip_region_prefix(resource_id.as_str());
    if stripped.is_empty() {
        return Err(Error::MigrationIncomplete(format!("node record {} has an empty server id '{}'", provisioning_id, resource_id)));
    }

    Ok(NodeRecord { cloud_name, resource_id: ServerId::new(stripped), effective_options, provisioning_id, created_at })
}

fn options_from_legacy(legacy: &LegacyPayload, defaults: &NodeOptions) -> Result<NodeOptions> {
    let launcher_factory = if legacy.slave_type.as_deref() == Some(LEGACY_SSH_SLAVE_TYPE) {
        LauncherFactory::Ssh { credentials_id: legacy.credentials_id.clone() }
    } else {
        LauncherFactory::Jnlp
    };

    let mut builder = defaults.to_builder().launcher_factory(launcher_factory);

    // A blank legacy value keeps the default rather than clearing it.
    if let Some(jvm_options) = legacy.jvm_options.as_ref().filter(|opts| !opts.trim().is_empty()) {
        builder = builder.jvm_options(Some(jvm_options.clone()));
    }

    if let Some(retention_time) = legacy.override_retention_time.filter(|time| *time > 0) {
        builder = builder.retention_time(retention_time);
    }

    builder.build()
}

/// Drops everything up to and including the last `/`.
pub fn strip_region_prefix(server_id: &str) -> &str {
    match server_id.rfind('/') {
        Some(idx) => &server_id[idx + 1..],
        None => server_id,
    }
}
