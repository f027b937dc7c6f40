//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for triage-bot
#[derive(Parser, Debug)]
#[command(name = "triage-bot")]
#[command(author, version, about = "Checklist bot that scores answers and files Jira tickets")]
#[command(long_about = r#"
Triage Bot presents a yes/no checklist in Slack, scores the answers and opens
a Jira ticket whose severity follows the number of "yes" answers.

The bot listens for:
  GET  /oauth/callback          Jira OAuth callback (also /jira/oauth/callback)
  POST /slack/events            Slack Events API
  POST /slack/interactivity     Slack shortcuts, modals and buttons

Configuration files are loaded from (in priority order):
1. TRIAGE_* environment variables (e.g. TRIAGE_SLACK__BOT_TOKEN)
2. --config <path>     Explicit config file
3. ./triage.toml       Project-level config
4. ~/.config/triage-bot/config.toml   Global config

Example:
  triage-bot --port 3000 -v
  triage-bot --config deploy/triage.toml --shared-folder /srv/triage/shared
"#)]
pub struct Cli {
    /// Address to bind (overrides `server.bind`)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Folder holding the JSON documents (overrides `storage.shared_folder`)
    #[arg(long, value_name = "PATH")]
    pub shared_folder: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the resolved config, then exit
    #[arg(long)]
    pub show_config: bool,
}
