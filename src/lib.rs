pub mod chat;
pub mod config;
pub mod constants;
pub mod forms;
pub mod ollama;
pub mod prompt;
pub mod resources;
pub mod search;
pub mod store;
pub mod templates;
pub mod web_server;
