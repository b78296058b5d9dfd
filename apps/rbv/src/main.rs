//! # RBV Binary
//!
//! Entry point: parses the command line, installs the tracing subscriber
//! and dispatches to the CLI commands or the HTTP server.

use clap::Parser;
use rbv::api;
use rbv::cli::{self, Cli, CliError, Commands, ServeArgs};
use rbv::config::{ConfigOverrides, ServerConfig};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Filter directives: the `--log-level` flag, then `RUST_LOG`, then warn.
fn log_directives(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| env.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn init_tracing(log_level: Option<&str>) {
    let directives = log_directives(log_level, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter '{}': {}; using {}", directives, e, DEFAULT_LOG_FILTER);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(args: ServeArgs) -> Result<(), CliError> {
    let config = ServerConfig::from_env()?.with_overrides(ConfigOverrides {
        bind: args.bind,
        api_key: args.api_key,
        rate_limit: args.rate_limit,
        max_sessions: args.max_sessions,
        policy: args.policy,
        session_ttl: args.session_ttl.map(Duration::from_secs),
    });
    if config.max_sessions == 0 {
        return Err(CliError::InvalidArgument(
            "--max-sessions must be positive".to_string(),
        ));
    }
    api::run_server(config).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Factors { json } => cli::cmd_factors(json),
        Commands::Assess { ratings, json } => cli::cmd_assess(&ratings, json),
        Commands::Vrio { ratings, json } => cli::cmd_vrio(&ratings, json),
        Commands::Report { ratings, json } => cli::cmd_report(&ratings, json),
        Commands::Advise { ratings, json } => cli::cmd_advise(&ratings, json),
        Commands::Profile { ratings, json } => cli::cmd_profile(&ratings, json),
        Commands::Serve(args) => serve(args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
