use anyhow::{Context, Result};
use clap::Parser;
use siterate::cli::{Cli, Commands};
use siterate::collaborators::Collaborators;
use siterate::commands::{self, BatchConfig, DryrunConfig};
use siterate::config::{load_config, load_config_from, SiteRateConfig};
use siterate::observability::{init_logging, install_panic_hook};
use std::path::Path;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.trace);

    match cli.command {
        Commands::Init { force } => commands::init_config(force),
        Commands::Dryrun {
            url,
            format,
            output,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let services = production_services(&config)?;
            commands::dryrun(DryrunConfig { url, format, output }, &config, &services)
        }
        Commands::Spider { job, output } => {
            let config = resolve_config(cli.config.as_deref())?;
            let services = production_services(&config)?;
            commands::spider(&job, output.as_deref(), &config, &services)
        }
        Commands::Batch {
            jobs_file,
            output,
            jobs,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let services = production_services(&config)?;
            let summary = commands::run_batch(
                &BatchConfig {
                    jobs_file,
                    output_dir: output,
                    jobs,
                },
                &config,
                &services,
            )?;
            println!(
                "Wrote {} reports ({} invalid job lines)",
                summary.written.len(),
                summary.invalid_lines.len()
            );
            Ok(())
        }
    }
}

// An explicit --config must load cleanly; discovery falls back to defaults
fn resolve_config(explicit: Option<&Path>) -> Result<SiteRateConfig> {
    match explicit {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(load_config()),
    }
}

fn production_services(config: &SiteRateConfig) -> Result<Collaborators> {
    Collaborators::production(config).context("Failed to set up network clients")
}
