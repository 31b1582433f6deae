//! edufinder: multi-agent learning assistant
//!
//! Usage:
//!   edufinder chat                               → interactive session on stdin
//!   edufinder classify "teach me rust"           → show the classified intent
//!   edufinder concept ai_engineering neural_networks
//!   edufinder order --domain ai_engineering deep_learning machine_learning
//!   edufinder config                             → print the default config
//!   edufinder version                            → show version

use anyhow::Context;
use clap::{Parser, Subcommand};
use edufinder_agent::{classify, EduFinderConfig, LearningSystem};
use edufinder_core::{Address, ChatMessage};
use edufinder_kg::{suggest_order, ConceptStore, LearningOrder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const DEFAULT_CONFIG: &str = "edufinder.toml";

#[derive(Parser)]
#[command(
    name = "edufinder",
    about = "Learning assistant: curricula, resources, and concept insights",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant in the terminal
    Chat {
        /// User address for this session
        #[arg(long, default_value = "edufinder://cli")]
        user: String,
    },
    /// Classify a message without dispatching it
    Classify {
        /// Message text
        text: Vec<String>,
    },
    /// Show a concept as JSON (unknown concepts are synthesized)
    Concept { domain: String, concept: String },
    /// Suggest a study order for a set of concepts
    Order {
        #[arg(short, long, default_value = "general")]
        domain: String,
        concepts: Vec<String>,
    },
    /// Print the default configuration
    Config,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref(), cli.json_logs)?;

    match cli.command {
        Commands::Chat { user } => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            let config = EduFinderConfig::load(&path);
            run_chat(&config, Address::new(user)).await?;
        }

        Commands::Classify { text } => {
            let intent = classify(&text.join(" "));
            println!("{}", serde_json::to_string_pretty(&intent)?);
        }

        Commands::Concept { domain, concept } => {
            let store = ConceptStore::seeded();
            let view = store.view(&domain, &concept);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        Commands::Order { domain, concepts } => {
            let store = ConceptStore::seeded();
            let result = suggest_order(&store, &domain, &concepts);
            for line in order_lines(&result) {
                println!("{}", line);
            }
        }

        Commands::Config => {
            print!("{}", EduFinderConfig::default().to_toml());
        }

        Commands::Version => {
            println!("edufinder v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Numbered study order; entries placed to break a cycle are marked.
fn order_lines(result: &LearningOrder) -> Vec<String> {
    result
        .order
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let marker = if result.was_forced(key) { " (cycle)" } else { "" };
            format!("{}. {}{}", i + 1, key.display_name(), marker)
        })
        .collect()
}

fn init_tracing(log_file: Option<&Path>, json: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "edufinder=info".into());

    let stderr = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .init();
    Ok(guard)
}

async fn run_chat(config: &EduFinderConfig, user: Address) -> anyhow::Result<()> {
    let handle = LearningSystem::spawn_from_config(config);
    let mut session = handle.connect_user(user.clone());
    session.start_session()?;
    tracing::info!(%user, "chat session started");

    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(text) = session.next_text().await {
            let out = format!("\n{}\n\n> ", text);
            if stdout.write_all(out.as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        handle.send_text(&user, line)?;
    }

    handle.send(&user, ChatMessage::end_session())?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    printer.abort();
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests;
