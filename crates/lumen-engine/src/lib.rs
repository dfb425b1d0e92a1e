pub mod backend;
pub mod cli;
pub mod command;
pub mod config;
pub mod controller;
pub mod executor;
pub mod formatter;
pub mod inspector;

pub use lumen_common::engine;
pub use lumen_common::error_mapping;
pub use lumen_common::model;
pub use lumen_common::protocol;
