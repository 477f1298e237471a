pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod llm;
pub mod store;
