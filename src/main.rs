use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imobrag::config::Config;
use imobrag::embedder::openai::OpenAiEmbedder;
use imobrag::llm::openai::OpenAiChat;
use imobrag::pipeline::{AnswerSynthesizer, HistoryWindow, Policy};
use imobrag::server::{AppContext, Server};
use imobrag::store::qdrant::QdrantStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imobrag", version, about = "Grounded answers over development records")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Address to bind, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Answer a single question and print it
    Ask {
        question: String,
    },
    /// Write a config template to the --config path
    InitConfig,
}

fn build_synthesizer(config: &Config) -> Result<AnswerSynthesizer> {
    let api_key = config.require_openai_key()?;
    let timeout = config.request_timeout();

    let embedder = OpenAiEmbedder::new(
        &config.embedding.base_url,
        api_key,
        &config.embedding.model,
        config.embedding.dimensions,
        timeout,
    )
    .context("failed to build embedding client")?;

    let store = QdrantStore::new(&config.qdrant.url, config.qdrant.api_key.clone(), timeout)
        .context("failed to build Qdrant client")?;

    let chat = OpenAiChat::new(&config.chat.base_url, api_key, timeout)
        .context("failed to build chat client")?;

    let policy = Policy::load_or_default(config.policy_path.as_deref())?;

    Ok(
        AnswerSynthesizer::new(Arc::new(embedder), Arc::new(store), Arc::new(chat), policy)
            .with_retrieval(config.retrieval())
            .with_params(config.generation()),
    )
}

/// Load config, overlay the environment, validate, and build the pipeline.
fn prepare(config_path: &str) -> Result<(Config, AnswerSynthesizer)> {
    let mut config = Config::load(config_path)?;
    config.apply_env();
    config.validate().context("invalid configuration")?;
    let synthesizer = build_synthesizer(&config)?;
    Ok((config, synthesizer))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig => {
            Config::default().save(&cli.config)?;
            tracing::info!("Wrote config template to {}", cli.config);
        }
        Command::Serve { bind } => {
            let (config, synthesizer) = prepare(&cli.config)?;
            let ctx = AppContext {
                synthesizer: Arc::new(synthesizer),
                history_window: HistoryWindow::new(config.history.max_turns),
            };
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            Server::new(ctx).start(&addr).await?;
        }
        Command::Ask { question } => {
            let (_, synthesizer) = prepare(&cli.config)?;
            match synthesizer.answer(&question, &[]).await {
                Ok(answer) => println!("{}", answer.text),
                Err(err) => {
                    tracing::error!(stage = err.stage(), "request failed: {err}");
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
