pub mod engine;
pub mod error;
pub mod error_mapping;
pub mod model;
pub mod protocol;
