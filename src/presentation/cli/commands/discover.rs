use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use crate::common::error::BaselineError;
use crate::domain::entities::{BaselineConfig, RepositoryDescriptor};
use crate::infrastructure::sources::SourceFactory;
use crate::presentation::ui::DisplayHelper;

/// Output format options for the discover command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Fetch the complete repository list of the configured organization.
///
/// Any discovery failure aborts the command; there is no partial list.
pub async fn discover_repositories(
    config: &BaselineConfig,
    display: &DisplayHelper,
) -> Result<Vec<RepositoryDescriptor>> {
    let organization = config.require_organization()?;
    let source = SourceFactory::create(config)?;

    let spinner = display.create_spinner(&format!(
        "Discovering repositories of {} on {}...",
        organization,
        source.name()
    ));
    let result = source.list_repositories(organization).await;
    spinner.finish_and_clear();

    let repositories = result.map_err(|e| {
        BaselineError::discovery_error_with_source(
            format!(
                "failed to list repositories of {} on {}",
                organization,
                source.name()
            ),
            Some(organization.to_string()),
            e,
        )
    })?;

    Ok(repositories)
}

/// Handler for the discover command
pub struct DiscoverCommand {
    pub config: BaselineConfig,
    pub output: OutputFormat,
}

impl DiscoverCommand {
    pub fn new(config: BaselineConfig, output: OutputFormat) -> Self {
        Self { config, output }
    }

    pub async fn execute(&self, display: &DisplayHelper) -> Result<()> {
        let repositories = discover_repositories(&self.config, display).await?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&repositories)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&repositories)?),
            OutputFormat::Text => self.print_text(&repositories, display),
        }

        Ok(())
    }

    fn print_text(&self, repositories: &[RepositoryDescriptor], display: &DisplayHelper) {
        for repo in repositories {
            if repo.description.is_empty() {
                println!("{}", display.format_repo(&repo.name));
            } else {
                println!("{} - {}", display.format_repo(&repo.name), repo.description);
            }

            if self.config.verbose {
                println!("    full name:  {}", repo.full_name);
                println!("    clone:      {}", repo.clone_address(self.config.protocol));
                if !repo.language.is_empty() {
                    println!("    language:   {}", repo.language);
                }
                println!(
                    "    visibility: {}",
                    if repo.private { "private" } else { "public" }
                );
                if let Some(updated_at) = repo.updated_at {
                    println!("    updated:    {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
                }
            }
        }

        println!();
        println!(
            "{} {} repositories",
            "Total:".bold(),
            repositories.len()
        );
    }
}
