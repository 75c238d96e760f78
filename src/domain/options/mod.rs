pub mod launcher_factory;
pub mod node_options;
