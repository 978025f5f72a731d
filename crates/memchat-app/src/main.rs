mod cli;
mod commands;
mod dotenv;
mod repl;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use memchat_ai::{OpenAiClient, OpenAiConfig, Session};
use memchat_common::MemchatError;
use memchat_config::ChatConfig;
use tracing_subscriber::filter::{Directive, LevelFilter, ParseError};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::repl::Repl;

/// Split a comma-separated filter such as `memchat_ai=debug,info`.
fn parse_directives(spec: &str) -> Result<Vec<Directive>, ParseError> {
    spec.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::parse)
        .collect()
}

/// `RUST_LOG` first, then `spec` on top so it wins for the same target.
fn log_subscriber(spec: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let directives = parse_directives(spec).unwrap_or_else(|e| {
        eprintln!("invalid log filter {spec:?} ({e}), using warn");
        vec![LevelFilter::WARN.into()]
    });
    let filter = directives
        .into_iter()
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish()
}

/// Resolve configuration: file, environment, then CLI flags.
fn resolve_config(args: &cli::Args) -> memchat_common::Result<ChatConfig> {
    let mut config = memchat_config::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    memchat_config::validate(&config)?;
    Ok(config)
}

fn build_session(config: &ChatConfig) -> memchat_common::Result<Session> {
    let endpoint = &config.endpoint;
    let client_config = OpenAiConfig::new(&endpoint.base_url, &endpoint.api_key)
        .with_model(&endpoint.model)
        .with_temperature(endpoint.temperature)
        .with_max_tokens(endpoint.max_tokens)
        .with_connect_timeout(Duration::from_secs(endpoint.connect_timeout_secs))
        .with_read_timeout(Duration::from_secs(endpoint.read_timeout_secs));
    let client = OpenAiClient::new(client_config).map_err(|e| MemchatError::Ai(e.to_string()))?;

    let mut session = Session::new(client).with_save_dir(&config.session.save_dir);
    if let Some(prompt) = config.session.system_prompt() {
        session = session.with_system_prompt(prompt);
    }
    Ok(session)
}

/// Startup diagnostic. Failure is reported but never fatal.
async fn check_endpoint(session: &Session, base_url: &str) {
    let status = session.check_endpoint().await;
    if status.reachable {
        println!("Connected to {base_url} ({} models available)", status.models.len());
        if !status.models.is_empty() && !status.serves(session.model()) {
            println!(
                "Warning: model {} is not in the endpoint's model list",
                session.model()
            );
        }
    } else {
        println!(
            "Warning: could not reach {base_url}: {}",
            status.error.unwrap_or_default()
        );
    }
}

async fn run(args: cli::Args, config: ChatConfig) -> memchat_common::Result<()> {
    let session = build_session(&config)?;

    if let Some(ref path) = args.load {
        let count = session
            .load_from_file(path)
            .await
            .map_err(|e| MemchatError::Ai(e.to_string()))?;
        println!("Restored {count} messages from {}", path.display());
    }

    if let Some(ref prompt) = args.prompt {
        let mut stdout = io::stdout();
        let result = session
            .send(prompt.as_str(), |fragment| {
                let _ = stdout.write_all(fragment.as_bytes());
                let _ = stdout.flush();
            })
            .await;
        writeln!(stdout)?;
        result.map_err(|e| MemchatError::Ai(e.to_string()))?;
        return Ok(());
    }

    if !args.no_check {
        check_endpoint(&session, &config.endpoint.base_url).await;
    }

    Repl::new(&session, config.session.history_preview_len)
        .run()
        .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file before anything reads the environment
    let loaded = dotenv::load(Path::new(".env"));

    let args = cli::parse();

    // Config loading logs under the flag's filter until the final one is known
    let bootstrap = log_subscriber(args.log_level.as_deref().unwrap_or("warn"));
    let config = match tracing::subscriber::with_default(bootstrap, || resolve_config(&args)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("memchat: {e}");
            return ExitCode::FAILURE;
        }
    };

    log_subscriber(&config.logging.level).init();
    tracing::info!("memchat v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, dotenv_vars = loaded, "configuration resolved");

    match run(args, config).await {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("memchat: {e}");
            ExitCode::FAILURE
        }
    }
}
