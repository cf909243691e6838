//! Workflow configuration from YAML

use crate::core::trigger::TriggerConfig;
use crate::core::workflow::Workflow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Top-level workflow configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow name
    pub name: String,

    /// Which repository events run this workflow
    #[serde(default, rename = "on")]
    pub triggers: TriggerConfig,

    /// Environment variables, set once at run start and visible
    /// identically to every step. Declaring `env:` replaces the
    /// defaults entirely.
    #[serde(default = "default_env")]
    pub env: HashMap<String, String>,

    /// Toolchain pinning
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Task-runner utility and its recipes
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Source checkout settings
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Per-step timeout. Stands in for the hosting platform default.
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,
}

/// Language toolchain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Release channel, pinned to avoid floating-version drift
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Component profile
    #[serde(default)]
    pub profile: ToolchainProfile,

    /// Disable automatic self-update of the toolchain manager
    #[serde(default = "default_true")]
    pub disable_self_update: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            profile: ToolchainProfile::default(),
            disable_self_update: true,
        }
    }
}

/// rustup component profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainProfile {
    #[default]
    Minimal,
    Default,
    Complete,
}

impl ToolchainProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolchainProfile::Minimal => "minimal",
            ToolchainProfile::Default => "default",
            ToolchainProfile::Complete => "complete",
        }
    }
}

/// Task-runner configuration. Recipe definitions themselves live in the
/// repository being verified and are out of scope here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// The task-runner binary
    #[serde(default = "default_program")]
    pub program: String,

    /// Recipes for the build+test step
    #[serde(default = "default_build_test")]
    pub build_test: Vec<String>,

    /// Recipes for the lint step
    #[serde(default = "default_lint")]
    pub lint: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            build_test: default_build_test(),
            lint: default_lint(),
        }
    }
}

/// Source checkout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Repository URL to clone. When absent, the workdir is expected
    /// to already hold a checkout.
    #[serde(default)]
    pub repository: Option<String>,

    /// Workspace directory the run operates in
    #[serde(default = "default_workdir")]
    pub workdir: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            repository: None,
            workdir: default_workdir(),
        }
    }
}

fn default_env() -> HashMap<String, String> {
    HashMap::from([
        ("CARGO_TERM_COLOR".to_string(), "always".to_string()),
        ("CARGO_INCREMENTAL".to_string(), "0".to_string()),
    ])
}

fn default_channel() -> String {
    "stable".to_string()
}

fn default_program() -> String {
    "just".to_string()
}

fn default_build_test() -> Vec<String> {
    vec!["build".to_string(), "test".to_string()]
}

fn default_lint() -> Vec<String> {
    vec!["lint".to_string()]
}

fn default_workdir() -> String {
    ".".to_string()
}

fn default_step_timeout() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

impl WorkflowConfig {
    /// Load workflow configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse workflow configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: WorkflowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the workflow configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("workflow name must not be empty");
        }

        self.triggers.validate()?;

        if self.toolchain.channel.trim().is_empty() {
            anyhow::bail!("toolchain channel must not be empty");
        }

        if self.runner.program.trim().is_empty() {
            anyhow::bail!("runner program must not be empty");
        }
        if self.runner.build_test.is_empty() {
            anyhow::bail!("runner build_test recipes must not be empty");
        }
        if self.runner.lint.is_empty() {
            anyhow::bail!("runner lint recipes must not be empty");
        }

        for key in self.env.keys() {
            if key.trim().is_empty() {
                anyhow::bail!("environment variable names must not be empty");
            }
        }

        if self.step_timeout_secs == 0 {
            anyhow::bail!("step_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Convert the config to a Workflow domain model
    pub fn to_workflow(&self) -> Workflow {
        Workflow::from_config(self)
    }
}
