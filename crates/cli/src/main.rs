mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::*;
use maint_seed::{init_logging, LoggingConfig, SeederSettings};

#[derive(Parser)]
#[command(name = "maint-seed")]
#[command(about = "Seed the CMMS maintenance database through the RDS Data API")]
#[command(version)]
struct Cli {
    /// Log filter directives used when RUST_LOG is unset (e.g. maint_seed=debug)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve invocations from the Lambda runtime
    Lambda,

    /// Run the batch once against the Data API and print the response
    Invoke {
        /// Load statements from this directory instead of the embedded batch
        #[arg(long)]
        sql_dir: Option<PathBuf>,

        /// Override the Data API endpoint (local emulators)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// List the statements in execution order
    Plan {
        /// Load statements from this directory instead of the embedded batch
        #[arg(long)]
        sql_dir: Option<PathBuf>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the batch against an in-memory database
    DryRun {
        /// Load statements from this directory instead of the embedded batch
        #[arg(long)]
        sql_dir: Option<PathBuf>,

        /// Run the batch this many times against the same database
        #[arg(long, default_value = "1")]
        repeat: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let mut settings = SeederSettings::from_env()?;

    let logging = match cli.command {
        Commands::Lambda => LoggingConfig::lambda(),
        _ => LoggingConfig::cli(),
    };
    let logging = match settings.log_format {
        Some(format) => logging.with_format(format),
        None => logging,
    };
    let logging = match cli.log_filter.take() {
        Some(filter) => logging.with_env_filter(filter),
        None => logging,
    };
    init_logging(logging).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Lambda => {
            lambda::run(settings).await?;
        }
        Commands::Invoke { sql_dir, endpoint } => {
            if let Some(dir) = sql_dir {
                settings = settings.with_sql_dir(dir);
            }
            if let Some(endpoint) = endpoint {
                settings = settings.with_data_api_endpoint(endpoint);
            }
            invoke::run(settings).await?;
        }
        Commands::Plan { sql_dir, json } => {
            if let Some(dir) = sql_dir {
                settings = settings.with_sql_dir(dir);
            }
            plan::run(settings, json).await?;
        }
        Commands::DryRun { sql_dir, repeat } => {
            if let Some(dir) = sql_dir {
                settings = settings.with_sql_dir(dir);
            }
            dry_run::run(settings, repeat).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dry_run_arguments() {
        let cli = Cli::try_parse_from(["maint-seed", "dry-run", "--repeat", "2", "--sql-dir", "sql"])
            .unwrap();
        match cli.command {
            Commands::DryRun { sql_dir, repeat } => {
                assert_eq!(repeat, 2);
                assert_eq!(sql_dir, Some(PathBuf::from("sql")));
            }
            _ => panic!("expected dry-run"),
        }
    }

    #[test]
    fn test_log_filter_is_global() {
        let cli = Cli::try_parse_from(["maint-seed", "plan", "--log-filter", "maint_seed=debug"])
            .unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("maint_seed=debug"));
        assert!(matches!(cli.command, Commands::Plan { json: false, .. }));
    }
}
