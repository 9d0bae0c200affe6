pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod net;
pub mod reduce;
pub mod render;
pub mod signal;
