use crate::domain::cloud::template::Template;
use crate::domain::node::cloud_node::CloudNode;
use crate::logger::LIFECYCLE_TARGET;

/// Should `node` outlive its retention window to keep `template` at its minimal instance count?
///
/// With a non-zero retention time every active node counts toward the floor. With zero
/// retention only a node that never ran a task is kept, and only used nodes are counted:
/// a used zero-retention node is expected to go away and be replaced.
pub fn should_retain(node: &CloudNode, template: &dyn Template) -> bool {
    let options = template.effective_options();
    let instances_min = i64::from(options.effective_instances_min());

    if instances_min == 0 {
        return false;
    }

    let Some(channel) = node.channel() else {
        return false;
    };

    let retain = if options.retention_time != 0 {
        // The node under evaluation is one of the active ones.
        (template.active_node_count(false) as i64 - 1) < instances_min
    } else {
        channel.is_new() && (template.active_node_count(true) as i64 - 1) < instances_min
    };

    if retain {
        tracing::debug!(
            target: LIFECYCLE_TARGET,
            Node = %node.name,
            Template = %template.name(),
            InstancesMin = instances_min,
            "Retaining node to keep the template at its minimal instance count"
        );
    }

    retain
}
