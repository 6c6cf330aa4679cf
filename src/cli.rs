use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shai",
    version,
    about = "Autonomous shell agent driven by a local Ollama model",
    after_help = "Example: shai \"convert all files under this dir from flac to mp3\"\n\
                  Put task words that start with '-' after `--`: shai --model phi3 -- remove -rf build"
)]
pub struct Cli {
    /// Task description; all words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,
    /// Model name for this run (overrides ollama_model)
    #[arg(long)]
    pub model: Option<String>,
    /// Chat endpoint for this run (overrides ollama_url)
    #[arg(long)]
    pub url: Option<String>,
    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn task(&self) -> String {
        self.task.join(" ")
    }
}
