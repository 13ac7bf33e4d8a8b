use std::path::PathBuf;

use crate::constants;

/// Everything the chat loop, form generator and web server need to know,
/// carried as a plain value instead of module-level state so tests can point
/// each piece at temporary directories and mock endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama service, e.g. `http://127.0.0.1:11434`.
    pub ollama_url: String,
    /// General-purpose chat model name.
    pub chat_model: String,
    /// Markup-specialized model name used for form generation.
    pub form_model: String,
    /// Directory holding the three JSON stores.
    pub data_dir: PathBuf,
    /// Directory generated form pages are written to.
    pub forms_dir: PathBuf,
    /// Port the HTTP surface binds to.
    pub port: u16,
    /// Base URL embedded in generated form links.
    pub public_url: String,
    /// Minimum available system memory (GB) required before calling a model.
    pub required_gb: f64,
}

impl Config {
    /// Snapshot the environment-derived defaults for the given port.
    pub fn from_env(port: u16) -> Self {
        let data_dir = PathBuf::from(constants::DATA_DIR.as_str());
        let public_url = if constants::PUBLIC_URL.is_empty() {
            format!("http://localhost:{}", port)
        } else {
            constants::PUBLIC_URL.trim_end_matches('/').to_string()
        };
        Self {
            ollama_url: constants::OLLAMA_URL.clone(),
            chat_model: constants::CHAT_MODEL.clone(),
            form_model: constants::FORM_MODEL.clone(),
            forms_dir: data_dir.join("forms"),
            data_dir,
            port,
            public_url,
            required_gb: *constants::REQUIRED_GB,
        }
    }
}
