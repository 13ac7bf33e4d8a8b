// Process-wide defaults, loaded from the environment (or a .env file) once.
// Config::from_env snapshots these into an explicit value; nothing else
// should read them directly.

use std::env;

lazy_static::lazy_static! {
    pub static ref OLLAMA_URL: String =
        env::var("OLLAMA_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
    /// General-purpose chat model.
    pub static ref CHAT_MODEL: String =
        env::var("FORMBOT_CHAT_MODEL").unwrap_or_else(|_| "llama3".to_string());
    /// Markup-specialized model used by the form generator.
    pub static ref FORM_MODEL: String =
        env::var("FORMBOT_FORM_MODEL").unwrap_or_else(|_| "codellama".to_string());
    /// Directory holding memory.json, chat_history.json and form_logs.json.
    pub static ref DATA_DIR: String =
        env::var("FORMBOT_DATA_DIR").unwrap_or_else(|_| ".".to_string());
    /// Base URL embedded in generated form links. Empty means derive from the port.
    pub static ref PUBLIC_URL: String =
        env::var("FORMBOT_PUBLIC_URL").unwrap_or_default();
    /// Minimum available system memory (GB) required before calling a model.
    pub static ref REQUIRED_GB: f64 = env::var("FORMBOT_REQUIRED_GB")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3.2);
}
