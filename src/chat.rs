use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::forms::{self, FormOutcome};
use crate::ollama::{ModelReply, OllamaClient};
use crate::prompt::enhance_prompt;
use crate::resources::ResourceGuard;
use crate::store::{ChatTurn, Memory, Store};

const GREETING: &str = "🤖 Hello! I'm your AI Form Generator.\n\
    Type 'exit' to quit. Type 'history' to view past chats.\n";

const HISTORY_HEADER: &str = "\n--- Chat History ---\n";

/// How many past turns `history` shows.
const HISTORY_WINDOW: usize = 10;

/// What a single line of input produced.
#[derive(Debug, PartialEq)]
pub enum TurnOutcome {
    /// The user asked to leave; the loop should stop.
    Quit,
    /// Rendered transcript of recent turns, printed verbatim.
    History(String),
    /// Text to show as the assistant's reply.
    Reply(String),
}

/// One interactive session: loaded memory and history plus the clients
/// needed to answer a turn. State is written back to disk after every turn
/// so a crash loses at most the turn in flight.
pub struct ChatSession {
    config: Config,
    store: Store,
    client: OllamaClient,
    guard: ResourceGuard,
    memory: Memory,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(config: Config) -> Result<Self> {
        let guard = ResourceGuard::new(config.required_gb);
        Self::with_guard(config, guard)
    }

    /// Like [`new`](Self::new) but with a caller-supplied guard, so tests can
    /// pin the memory reading.
    pub fn with_guard(config: Config, guard: ResourceGuard) -> Result<Self> {
        let store = Store::new(&config.data_dir);
        let memory = store.load_memory()?;
        let history = store.load_history()?;
        let client = OllamaClient::new(&config.ollama_url);
        Ok(Self {
            config,
            store,
            client,
            guard,
            memory,
            history,
        })
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Handle one line of user input. Command words are matched whole and
    /// case-insensitively; everything else goes to the model (or the form
    /// pipeline when the line mentions a form).
    pub async fn handle_line(&mut self, input: &str) -> Result<TurnOutcome> {
        if input.eq_ignore_ascii_case("exit") {
            return Ok(TurnOutcome::Quit);
        }
        if input.eq_ignore_ascii_case("history") {
            return Ok(TurnOutcome::History(render_history(&self.history)));
        }

        if remember_name(&mut self.memory, input) {
            debug!("Stored user name from input");
        }
        // Memory is rewritten every turn, name or no name, so the file always
        // reflects the session.
        self.store.save_memory(&self.memory)?;

        let reply = if input.to_lowercase().contains("form") {
            println!("[Info] Generating form based on user request...");
            let prompt = enhance_prompt(input);
            match forms::generate_form(&self.client, &self.guard, &self.config, &prompt).await? {
                FormOutcome::Ready { url } => {
                    format!("✅ Your form is ready! Click the link below:\n{}", url)
                }
                failure => failure.to_string(),
            }
        } else {
            let memory_json = serde_json::to_string(&self.memory)?;
            let prompt = format!(
                "You are a helpful assistant. Here's user memory: {}.\nUser says: {}",
                memory_json, input
            );
            match self
                .client
                .ask(&self.guard, &self.config.chat_model, &prompt)
                .await
            {
                ModelReply::Answer(text) => text,
                failure => failure.to_string(),
            }
        };

        self.history.push(ChatTurn {
            user: input.to_string(),
            ai: reply.clone(),
        });
        self.store.save_history(&self.history)?;

        Ok(TurnOutcome::Reply(reply))
    }
}

/// Pull a name out of "my name is <name>" anywhere in the input and stash it
/// under the `name` key. Trailing punctuation on the token is stripped, so
/// "My name is Ada, nice to meet you" stores "Ada". Returns whether memory
/// changed.
fn remember_name(memory: &mut Memory, input: &str) -> bool {
    // Match over the raw bytes so the offset indexes `input` directly;
    // lowercasing the whole string can shift byte offsets (e.g. 'İ').
    let marker = b"my name is";
    let Some(idx) = input
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker))
    else {
        return false;
    };
    let after = input.get(idx + marker.len()..).unwrap_or("");
    let Some(token) = after.split_whitespace().next() else {
        return false;
    };
    let name = token.trim_matches(|c: char| !c.is_alphanumeric());
    if name.is_empty() {
        return false;
    }
    memory.insert("name".to_string(), name.into());
    true
}

/// Render the last [`HISTORY_WINDOW`] turns, numbered from 1 within the
/// window. An empty history still gets the header.
fn render_history(history: &[ChatTurn]) -> String {
    let mut out = String::from(HISTORY_HEADER);
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for (i, turn) in history[start..].iter().enumerate() {
        out.push_str(&format!(
            "{}. You: {}\n   AI: {}\n\n",
            i + 1,
            turn.user,
            turn.ai
        ));
    }
    out
}

/// Blocking terminal loop: greet, then read lines until `exit` or EOF.
/// Stdin reads are blocking on purpose; the web server runs on its own task.
pub async fn run_chat_loop(mut session: ChatSession) -> Result<()> {
    println!("{}", GREETING);

    let stdin = std::io::stdin();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break, // EOF, e.g. piped input ran out
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
        let input = line.trim();

        match session.handle_line(input).await? {
            TurnOutcome::Quit => break,
            TurnOutcome::History(rendered) => print!("{}", rendered),
            TurnOutcome::Reply(reply) => {
                println!("AI: {}\n", reply);
                // Brief pause keeps rapid-fire turns from hammering the model.
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    info!("Chat loop finished");
    Ok(())
}
