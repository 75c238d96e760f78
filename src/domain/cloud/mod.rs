pub mod cloud_client;
pub mod template;
