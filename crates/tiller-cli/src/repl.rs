//! Interactive REPL and one-shot runner
//!
//! The REPL owns the top-level history for the whole session. Ctrl-C while
//! a loop runs cancels that loop; at the prompt it ends the session.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tiller_core::ai::ModelMessage;
use tiller_core::tools::Workspace;
use tiller_core::{AgentRole, AgenticOrchestrator, LoopExit, LoopOutcome, SkillCatalog};

use crate::render::{print_events, EventRenderer};

pub struct Repl {
    orchestrator: AgenticOrchestrator,
    history: Vec<ModelMessage>,
    workspace: Arc<Workspace>,
    skills: Arc<SkillCatalog>,
}

impl Repl {
    pub fn new(
        orchestrator: AgenticOrchestrator,
        workspace: Arc<Workspace>,
        skills: Arc<SkillCatalog>,
    ) -> Self {
        Self {
            orchestrator,
            history: Vec::new(),
            workspace,
            skills,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("You: ");
            io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                println!();
                break;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_exit_command(input) {
                break;
            }

            self.turn(input, true).await;
            println!();
        }

        tracing::info!(messages = self.history.len(), "Session ended");
        Ok(())
    }

    /// Run a single task and print only the final answer
    pub async fn one_shot(&mut self, prompt: &str) -> Result<()> {
        match self.turn(prompt, false).await {
            Some(outcome) if outcome.exit == LoopExit::Completed => {
                println!("{}", outcome.text);
                Ok(())
            }
            Some(_) => anyhow::bail!("Interrupted"),
            None => anyhow::bail!("Model request failed"),
        }
    }

    /// One user turn. On a model error the history is rolled back to before
    /// the user message so the turn can be retried.
    async fn turn(&mut self, input: &str, interactive: bool) -> Option<LoopOutcome> {
        let checkpoint = self.history.len();
        self.history.push(ModelMessage::user_text(input));

        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });

        // One-shot output keeps stdout for the answer alone
        let (tx, rx) = mpsc::unbounded_channel();
        let printer = if interactive {
            tokio::spawn(print_events(rx, EventRenderer::new(io::stdout(), true)))
        } else {
            tokio::spawn(print_events(rx, EventRenderer::new(io::stderr(), false)))
        };

        let result = self
            .orchestrator
            .run(&mut self.history, Some(tx), cancel)
            .await;
        watcher.abort();
        let _ = printer.await;

        match result {
            Ok(outcome) => {
                tracing::info!(
                    turns = outcome.turns,
                    tool_calls = outcome.tool_calls,
                    cancelled = outcome.exit == LoopExit::Cancelled,
                    "Turn finished"
                );
                Some(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Agent loop failed");
                eprintln!("Error: {}", e);
                self.history.truncate(checkpoint);
                None
            }
        }
    }

    fn print_banner(&self) {
        let skills = self.skills.names();
        let roles: Vec<&str> = AgentRole::ALL.iter().map(|r| r.as_str()).collect();
        println!("Tiller - {}", self.workspace.root().display());
        println!(
            "Skills: {}",
            if skills.is_empty() {
                "none".to_string()
            } else {
                skills.join(", ")
            }
        );
        println!("Agent types: {}", roles.join(", "));
        println!("Type 'exit' to quit.\n");
    }
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit" | "q")
}
