use std::path::PathBuf;

use clap::Parser;
use memchat_config::ChatConfig;

/// memchat: a terminal chat client for OpenAI-compatible endpoints that
/// remembers the conversation.
#[derive(Parser, Debug, Default)]
#[command(name = "memchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Endpoint base URL, e.g. http://localhost:8000/v1.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model identifier to request.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0).
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Maximum tokens per reply.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// System instruction sent ahead of every request.
    #[arg(long)]
    pub system: Option<String>,

    /// Restore a saved transcript before starting.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Skip the startup endpoint probe.
    #[arg(long)]
    pub no_check: bool,

    /// Send a single message, print the reply and exit.
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Apply flag overrides on top of the file/environment config.
    pub fn apply(&self, config: &mut ChatConfig) {
        if let Some(ref url) = self.base_url {
            config.endpoint.base_url = url.clone();
        }
        if let Some(ref model) = self.model {
            config.endpoint.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.endpoint.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.endpoint.max_tokens = max_tokens;
        }
        if let Some(ref system) = self.system {
            config.session.system_prompt = Some(system.clone());
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
