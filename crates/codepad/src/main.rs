use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use codepad::{logging, Cli, Judge0Client, Playground, PlaygroundFlags};
use codepad_core::Registry;
use codepad_runtime::ProgramOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Cli::parse().resolve()?;
    logging::init(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    let registry = Registry::builtin()?;

    let mut engine = Judge0Client::new(config.endpoint.clone());
    if let Some(key) = &config.api_key {
        engine = engine.with_api_key(key.clone());
    }
    if let Some(host) = &config.api_host {
        engine = engine.with_api_host(host.clone());
    }
    tracing::info!(
        endpoint = engine.base_url(),
        language = %config.language,
        authenticated = config.api_key.is_some(),
        "codepad starting"
    );

    let flags = PlaygroundFlags {
        registry,
        engine: Arc::new(engine),
        language: config.language,
        initial_source: config.initial_source,
    };
    let options = ProgramOptions {
        fps: config.fps,
        title: Some("codepad".into()),
        ..ProgramOptions::default()
    };
    codepad_runtime::run_with::<Playground>(flags, options).await?;

    tracing::info!("codepad exited");
    Ok(())
}
