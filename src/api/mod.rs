pub mod controller_config_dto;
pub mod node_options_dto;
pub mod node_record_dto;
