//! Subprocess invocation seam
//!
//! The engine never spawns processes directly; it goes through the
//! [`CommandRunner`] trait so tests can drive runs with a scripted
//! runner.

pub mod system;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub use system::SystemCommandRunner;

/// Error types for command invocation
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("timed out after {0} seconds")]
    Timeout(u64),

    #[error("command output error: {0}")]
    Output(String),
}

/// A fully specified command to execute
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// Program to invoke
    pub program: String,

    /// Arguments, in order
    pub args: Vec<String>,

    /// Extra environment variables, layered over the process env
    pub env: HashMap<String, String>,

    /// Working directory
    pub cwd: PathBuf,

    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl CommandRequest {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: HashMap::new(),
            cwd: PathBuf::from("."),
            timeout_secs: 3600,
        }
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The command as a single display line, for logs and assertions
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// A short diagnostic for failure reporting: the exit code plus the
    /// tail of stderr (or stdout when stderr is empty).
    pub fn diagnostic(&self) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };

        let lines: Vec<&str> = source.trim().lines().collect();
        let tail = if lines.len() > 10 {
            lines[lines.len() - 10..].join("\n")
        } else {
            lines.join("\n")
        };

        if tail.is_empty() {
            format!("exit code {}", self.exit_code)
        } else {
            format!("exit code {}: {}", self.exit_code, tail)
        }
    }
}

/// Trait for command execution - the seam between the pipeline and the
/// machine it runs on
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute a command to completion and capture its output
    async fn run(&self, request: &CommandRequest) -> Result<CommandOutput, InvokeError>;
}
