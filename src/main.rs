use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

use formbot::chat::{run_chat_loop, ChatSession};
use formbot::config::Config;
use formbot::web_server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Chat in the terminal, with the form server running alongside.
    Chat {
        #[arg(long, default_value_t = 5000, help = "Port for the web server.")]
        port: u16,
    },
    /// Run only the web server, for serving already-generated forms.
    Serve {
        #[arg(long, default_value_t = 5000, help = "Port for the web server.")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,formbot=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Plain `formbot` drops straight into chat.
    let command = cli.command.unwrap_or(Commands::Chat { port: 5000 });
    info!("Formbot starting with command: {:?}", command);

    match command {
        Commands::Chat { port } => {
            let config = Config::from_env(port);

            let forms_dir = config.forms_dir.clone();
            let web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, forms_dir).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            // Give the listener a moment to come up before the first prompt.
            tokio::time::sleep(Duration::from_secs(1)).await;

            let session = ChatSession::new(config).context("Failed to start chat session")?;
            run_chat_loop(session).await.context("Chat session failed")?;

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Serve { port } => {
            let config = Config::from_env(port);

            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, config.forms_dir).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, initiating shutdown...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
    }

    Ok(())
}
