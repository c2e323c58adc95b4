pub mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;

use crate::domain::entities::baseline_config::{DEFAULT_DIRECTORY, DEFAULT_WORKERS};
use crate::domain::entities::{BaselineConfig, Credentials};
use crate::domain::value_objects::{CloneProtocol, SourceType};
use crate::presentation::cli::commands::{
    CloneCommand, DiscoverCommand, InitCommand, OutputFormat, UpdateCommand,
};
use crate::presentation::ui::DisplayHelper;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BASELINE_GIT_HASH"),
    " ",
    env!("BASELINE_BUILD_DATE"),
    ", ",
    env!("BASELINE_BUILD_TARGET"),
    ")"
);

/// baseline - mirror the repositories of an organization into a read-only tree
#[derive(Parser)]
#[command(name = "baseline")]
#[command(about = "Mirror the repositories of an organization into a read-only baseline")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root directory of the baseline tree
    #[arg(
        short,
        long,
        global = true,
        env = "BASELINE_DIRECTORY",
        default_value = DEFAULT_DIRECTORY
    )]
    pub directory: PathBuf,

    /// Organization, user or workspace to mirror
    #[arg(short, long, global = true, env = "BASELINE_ORGANIZATION")]
    pub organization: Option<String>,

    /// Hosting platform (github, bitbucket)
    #[arg(short, long, global = true, default_value = "github")]
    pub source: SourceType,

    /// GitHub API token
    #[arg(short, long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Bitbucket username
    #[arg(short = 'u', long, global = true, env = "BITBUCKET_USERNAME")]
    pub bitbucket_username: Option<String>,

    /// Bitbucket app password
    #[arg(short = 'b', long, global = true, env = "BITBUCKET_TOKEN", hide_env_values = true)]
    pub bitbucket_token: Option<String>,

    /// Number of repositories processed concurrently
    #[arg(short, long, global = true, default_value_t = DEFAULT_WORKERS)]
    pub threads: usize,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Clone over SSH instead of HTTPS
    #[arg(long, global = true)]
    pub ssh: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the baseline directory
    Init,

    /// List the repositories of the organization
    Discover {
        /// Output format (text, json, yaml)
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Clone every repository that is not mirrored yet
    Clone,

    /// Fetch new history into every mirrored repository
    Update,
}

impl Cli {
    /// Collect the global options into one configuration value
    pub fn to_config(&self) -> anyhow::Result<BaselineConfig> {
        let mut credentials = Credentials::default();
        if let Some(token) = &self.github_token {
            credentials = credentials.with_github_token(token);
        }
        if let (Some(username), Some(token)) = (&self.bitbucket_username, &self.bitbucket_token) {
            credentials = credentials.with_bitbucket(username, token);
        }

        let mut config = BaselineConfig::new(&self.directory)
            .with_source(self.source)
            .with_credentials(credentials)
            .with_workers(self.threads)
            .with_verbose(self.verbose)
            .with_protocol(CloneProtocol::from_ssh_preference(self.ssh));

        if let Some(organization) = &self.organization {
            config = config.with_organization(organization);
        }

        config.validate()?;
        Ok(config)
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        // Set up colored output
        colored::control::set_override(!self.cli.no_color);

        // Handle the command
        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let display = DisplayHelper::new(!self.cli.no_color);
        let config = self.cli.to_config()?;

        match &self.cli.command {
            Commands::Init => InitCommand::new(config.root()).execute(&display).await,
            Commands::Discover { output } => {
                DiscoverCommand::new(config, *output).execute(&display).await
            }
            Commands::Clone => CloneCommand::new(config).execute(&display).await,
            Commands::Update => UpdateCommand::new(config).execute(&display).await,
        }
    }
}
