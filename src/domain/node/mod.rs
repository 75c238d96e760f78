pub mod cloud_node;
pub mod execution_channel;
pub mod migrator;
pub mod node_record;
