pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod log;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod server;
pub mod ux;
pub mod wire;
