pub mod backend;
pub mod cdp;
pub mod document;
pub mod engine;
pub mod inject;
