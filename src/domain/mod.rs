pub mod activity;
pub mod cloud;
pub mod config;
pub mod controller;
pub mod disposal;
pub mod node;
pub mod options;
pub mod retention;
pub mod termination;
pub mod utils;
