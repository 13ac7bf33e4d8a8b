use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::ollama::{ChatMessage, OllamaClient};
use crate::resources::ResourceGuard;
use crate::templates;

const FORM_HEADING: &str = "Generated Form";

const SYSTEM_INSTRUCTION: &str = "You are a creative form generator. Return only the <form> \
     element using TailwindCSS with appropriate fields, labels, and submit button.";

const SUBMIT_BUTTON: &str = "\n<button type=\"submit\" class=\"mt-4 bg-blue-600 text-white \
     px-4 py-2 rounded hover:bg-blue-700\">Submit</button>";

/// Outcome of a form-generation request. Model-side failures are fail-soft
/// and render as the fixed strings below; the chat loop shows them verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Ready { url: String },
    OutOfMemory,
    Failed(String),
}

impl fmt::Display for FormOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormOutcome::Ready { url } => write!(f, "{}", url),
            FormOutcome::OutOfMemory => write!(
                f,
                "❌ Your system does not have enough memory to generate the form."
            ),
            FormOutcome::Failed(detail) => {
                write!(f, "❌ Error while generating form: {}", detail)
            }
        }
    }
}

/// Append a styled submit button when the model forgot one.
pub fn ensure_submit_button(fragment: &str) -> String {
    if fragment.to_lowercase().contains("<button") {
        fragment.to_string()
    } else {
        format!("{}{}", fragment, SUBMIT_BUTTON)
    }
}

fn new_form_file_name() -> String {
    let id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("form_{}.html", id)
}

/// Ask the markup model for a form fragment, wrap it in the page skeleton and
/// write it under the forms directory. Returns the serving URL on success.
///
/// Model failures come back as fail-soft `FormOutcome`s; filesystem and
/// template failures propagate as hard errors.
pub async fn generate_form(
    client: &OllamaClient,
    guard: &ResourceGuard,
    config: &Config,
    prompt: &str,
) -> Result<FormOutcome> {
    if !guard.has_enough_memory() {
        return Ok(FormOutcome::OutOfMemory);
    }

    let messages = [
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(prompt),
    ];
    let fragment = match client.chat(&config.form_model, &messages).await {
        Ok(fragment) => fragment,
        Err(e) => return Ok(FormOutcome::Failed(e.to_string())),
    };

    let fragment = ensure_submit_button(&fragment);
    let file_name = new_form_file_name();
    let page = templates::render_form_page(FORM_HEADING, &fragment, &file_name)?;

    fs::create_dir_all(&config.forms_dir).context("Failed to create forms directory")?;
    let path = config.forms_dir.join(&file_name);
    fs::write(&path, page).context(format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Generated form written");

    Ok(FormOutcome::Ready {
        url: format!("{}/forms/{}", config.public_url, file_name),
    })
}
