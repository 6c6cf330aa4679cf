mod action;
mod agent;
mod cli;
mod config;
mod environment;
mod executor;
mod exit_codes;
mod gate;
mod llm;
mod logging;
mod prompt;
mod util;

use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::agent::Agent;
use crate::cli::Cli;
use crate::config::{config_path, load_or_create};
use crate::environment::Environment;
use crate::executor::ShellExecutor;
use crate::gate::ConsoleOperator;
use crate::llm::OllamaClient;
use crate::prompt::build_system_prompt;

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            let code = exit_codes::for_error(&err);
            if code == exit_codes::OK {
                eprintln!("Aborted: {err}");
            } else {
                eprintln!("Error: {err:#}");
            }
            code
        }
    };
    process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    let loaded = load_or_create(&path)?;
    if loaded.created {
        println!(
            "⚠️ Configuration file not found. Creating default config at: {}",
            loaded.path.display()
        );
    }
    let task = cli.task();
    let cfg = loaded.config.with_overrides(cli.url, cli.model);

    let env = Environment::detect();
    let system_prompt = build_system_prompt(&task, &env, &cfg);
    debug!(chars = system_prompt.len(), "built system prompt");

    println!("👋 shai initialized with task: {task}");
    println!("Platform: {} | Shell: {}", env.os, env.shell);
    println!(
        "Using Ollama URL: {} | Model: {}",
        cfg.ollama_url, cfg.ollama_model
    );

    let client = OllamaClient::new(&cfg)?;
    let runner = ShellExecutor::new(env.shell.clone());
    let mut operator = ConsoleOperator::stdio();

    let mut agent = Agent::new(system_prompt, &client, &runner, &mut operator);
    let outcome = agent.run().await?;
    debug!(
        finish = ?outcome.finish,
        steps = outcome.steps,
        last_step = agent.step(),
        messages = agent.history().len(),
        summary = %outcome.summary,
        "agent finished"
    );
    Ok(())
}
