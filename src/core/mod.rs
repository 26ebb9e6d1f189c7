pub mod api_key;
pub mod app;
pub mod batch;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod convert;
pub mod document;
pub mod llm;
pub mod paths;
pub mod rewrite;
