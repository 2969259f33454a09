//! TubePilot - conversational playlist assistant
//!
//! CLI entry point wiring the pipeline to the real Gemini and YouTube
//! clients.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use tubepilot::audit::JsonlAuditSink;
use tubepilot::cache::NoopCache;
use tubepilot::cli::{Cli, Command};
use tubepilot::config::Config;
use tubepilot::llm::GeminiClient;
use tubepilot::pipeline::ChatPipeline;
use tubepilot::platform::YouTubeClient;
use tubepilot::repl;

fn setup_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(model = %config.llm.model, "TubePilot starting");

    let llm = Arc::new(GeminiClient::from_config(&config.llm).context("Failed to create language-model client")?);
    let platform = Arc::new(YouTubeClient::from_config(&config.platform).context("Failed to create platform client")?);
    let audit = Arc::new(JsonlAuditSink::new(&config.audit.log_file));
    let cache = Arc::new(NoopCache);

    let pipeline = ChatPipeline::new(llm, platform, audit, cache);

    match cli.command {
        Command::Chat { prompt } => {
            let response = pipeline.handle(&cli.user, &prompt).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Repl => {
            repl::run_interactive(&pipeline, &cli.user).await?;
        }
    }

    Ok(())
}
