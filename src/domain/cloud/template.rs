use std::sync::Arc;

use crate::domain::options::node_options::NodeOptions;
use crate::domain::utils::id::{CloudName, TemplateName};

/// A node template as seen by the retention logic.
pub trait Template: std::fmt::Debug + Send + Sync {
    fn name(&self) -> TemplateName;

    fn effective_options(&self) -> NodeOptions;

    /// Number of active nodes provisioned from this template. With `used_only` only nodes that
    /// already accepted at least one task are counted.
    fn active_node_count(&self, used_only: bool) -> usize;
}

pub trait TemplateRegistry: std::fmt::Debug + Send + Sync {
    fn template(&self, cloud: &CloudName, name: &TemplateName) -> Option<Arc<dyn Template>>;
}
