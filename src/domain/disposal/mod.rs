pub mod async_disposer;
pub mod destroy_machine;
pub mod disposable;
pub mod record_disposal;
