//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for flag-panel
#[derive(Parser, Debug)]
#[command(name = "flag-panel")]
#[command(author, version, about = "Control panel for Terraform feature flags")]
#[command(long_about = r#"
flag-panel serves a small JSON API that reads and edits the feature flags in
features.auto.tfvars, and runs commit_gh to commit and push the change so the
Terraform pipeline picks it up.

Endpoints (also available under /api):
  GET  /features    Current flags
  POST /features    Merge a partial update and save
  POST /apply       Commit and push the flags file
  GET  /meta        Current branch and last commit

Configuration files are loaded from (in priority order):
1. FLAG_PANEL_* environment variables (e.g. FLAG_PANEL_SERVER__PORT=8080)
2. --config <path>     Explicit config file
3. ./flag-panel.toml   Project-level config
4. ~/.config/flag-panel/config.toml   Global config

Example:
  flag-panel --repo-root ~/src/infra
  flag-panel --port 8080 --publish-on-update -v
"#)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Repository root (working directory for commit_gh and git)
    #[arg(long, value_name = "PATH")]
    pub repo_root: Option<PathBuf>,

    /// Flags file, relative to the repository root unless absolute
    #[arg(long, value_name = "PATH")]
    pub features_file: Option<PathBuf>,

    /// Publish command name
    #[arg(long, value_name = "COMMAND")]
    pub publish_command: Option<String>,

    /// Publish after every successful flag update
    #[arg(long)]
    pub publish_on_update: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the effective config, then exit
    #[arg(long)]
    pub show_config: bool,
}
