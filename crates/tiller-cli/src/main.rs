//! Tiller - a terminal coding agent
//!
//! Interactive REPL (or one-shot run) over `tiller_core`'s agent loop:
//! - Tools for shell, workspace files, task planning
//! - Isolated subagents for exploration, planning and coding
//! - Skills loaded on demand from `<workspace>/skills`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use tiller_core::agent::build_system_prompt;
use tiller_core::ai::config::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use tiller_core::paths;
use tiller_core::tools::implementations::bash::MAX_COMMAND_TIMEOUT;
use tiller_core::tools::Workspace;
use tiller_core::{
    register_all_tools, AgenticOrchestrator, AiClientConfig, ModelService, OpenAiClient,
    OrchestratorConfig, OrchestratorServices, SkillCatalog, ToolRegistry,
};

mod render;
mod repl;

/// Tiller - terminal coding agent
#[derive(Parser)]
#[command(name = "tiller", version)]
#[command(about = "Terminal coding agent with subagents, task planning and skills", long_about = None)]
struct Cli {
    /// Run this task once, print the answer and exit
    prompt: Option<String>,

    /// Workspace root (defaults to the current directory)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Skills directory (defaults to <workspace>/skills)
    #[arg(long)]
    skills_dir: Option<PathBuf>,

    /// Model id
    #[arg(long, env = "MODEL_ID", default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "TILLER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API key for the model service
    #[arg(long, env = "TILLER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum output tokens per model response
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Default shell command timeout in seconds (max 300)
    #[arg(long, default_value_t = 60)]
    command_timeout: u64,

    /// Disable the TodoWrite planning reminders
    #[arg(long)]
    no_reminders: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to file so stdout stays clean for the conversation
    let log_dir = paths::logs_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory: {}", e);
    }

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = match std::fs::File::create(log_dir.join("tiller.log")) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Failed to create log file: {}, falling back to null device",
                e
            );
            std::fs::File::create(null_device)
                .with_context(|| format!("Failed to open null device {}", null_device))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let api_key = cli
        .api_key
        .context("No API key: set TILLER_API_KEY or pass --api-key")?;

    let root = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let workspace = Arc::new(
        Workspace::new(&root)
            .with_context(|| format!("Invalid workspace {}", root.display()))?,
    );

    let skills_dir = cli
        .skills_dir
        .unwrap_or_else(|| paths::workspace_skills_dir(workspace.root()));
    let skills = Arc::new(SkillCatalog::load(&skills_dir));

    let mut registry = ToolRegistry::new();
    register_all_tools(&mut registry, &skills);

    let model: Arc<dyn ModelService> = Arc::new(OpenAiClient::new(AiClientConfig {
        model: cli.model,
        max_tokens: cli.max_tokens,
        base_url: cli.base_url,
        api_key,
    }));

    let mut config = OrchestratorConfig::new(
        Arc::clone(&workspace),
        build_system_prompt(workspace.root(), &skills),
    );
    config.command_timeout = Duration::from_secs(cli.command_timeout).min(MAX_COMMAND_TIMEOUT);
    config.planning_reminders = !cli.no_reminders;

    tracing::info!(
        workspace = %workspace.root().display(),
        skills = skills.len(),
        one_shot = cli.prompt.is_some(),
        "Starting tiller"
    );

    let orchestrator = AgenticOrchestrator::new(
        OrchestratorServices {
            model,
            tool_registry: Arc::new(registry),
            skills: Arc::clone(&skills),
        },
        config,
    );
    let mut repl = repl::Repl::new(orchestrator, workspace, skills);

    match cli.prompt {
        Some(prompt) => repl.one_shot(&prompt).await,
        None => repl.run().await,
    }
}
