pub mod activity_store;
pub mod provisioning_activity;
