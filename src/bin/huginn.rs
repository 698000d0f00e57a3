//! huginn — intent classification CLI
//!
//! Classifies utterances against a running embedding/NER stack, or with
//! the built-in keyword fallback when no collaborators are configured.

use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use huginn::providers::{HttpEmbeddingClient, HttpEntityClient};
use huginn::{EngineConfig, Huginn, ParseOptions};

/// Huginn intent classification CLI
#[derive(Parser)]
#[command(name = "huginn")]
#[command(about = "Intent classification engine CLI")]
struct Args {
    /// Engine config file (default: ~/.huginn/config.toml if present)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Embedding service base URL; without it the keyword fallback runs
    #[arg(long, env = "HUGINN_EMBED_URL")]
    embed_url: Option<String>,

    /// Embedding model identifier
    #[arg(long, env = "HUGINN_EMBED_MODEL", default_value = "all-MiniLM-L6-v2")]
    embed_model: String,

    /// NER service base URL (optional enrichment)
    #[arg(long, env = "HUGINN_NER_URL")]
    ner_url: Option<String>,

    /// Bearer token for both services
    #[arg(long, env = "HUGINN_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify an utterance
    Classify {
        /// Text to classify (or omit to read from stdin)
        text: Option<String>,
        /// Pin a specific implementation (accurate|balanced|fast|keyword)
        #[arg(short, long)]
        implementation: Option<String>,
        /// Skip entity extraction
        #[arg(long)]
        no_entities: bool,
    },

    /// List implementations and their status
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = EngineConfig::load(args.config.as_deref())?;
    let mut builder = Huginn::builder().config(config);

    if let Some(ref url) = args.embed_url {
        let mut client = HttpEmbeddingClient::new(url, &args.embed_model);
        if let Some(ref key) = args.api_key {
            client = client.with_api_key(key);
        }
        builder = builder.embedding_provider(Arc::new(client));
    }
    if let Some(ref url) = args.ner_url {
        let mut client = HttpEntityClient::new(url);
        if let Some(ref key) = args.api_key {
            client = client.with_api_key(key);
        }
        builder = builder.entity_provider(Arc::new(client));
    }

    let engine = builder.build()?;

    match args.command {
        Command::Classify {
            text,
            implementation,
            no_entities,
        } => {
            let text = resolve_text(text)?;
            let options = ParseOptions::default().include_entities(!no_entities);

            let classifier = engine.classifier(implementation.as_deref()).await?;
            let result = classifier.parse(&text, &options).await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::List => {
            engine.warmup().await;
            for info in engine.list_implementations() {
                println!(
                    "{:10} {:12?} accuracy={:.2} avg_latency={}ms",
                    info.name, info.status, info.accuracy, info.avg_latency_ms
                );
            }
        }
    }

    Ok(())
}

/// Use the argument if given, otherwise read stdin (when piped).
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if io::stdin().is_terminal() {
        return Err("no text given and stdin is a terminal".into());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim().to_string())
}
