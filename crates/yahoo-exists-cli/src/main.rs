//! yahoo-exists — command-line entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use yahoo_exists::{
    CancellationToken, EmailExistsValidator, ExistenceResult, HttpClientCache,
    RateLimitingFactory, ValidatorConfig, YahooExistsValidator,
};

#[derive(Parser)]
#[command(
    name = "yahoo-exists",
    about = "Check whether Yahoo accounts exist for email addresses",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one or more email addresses.
    Check {
        /// Email addresses to check.
        #[arg(required = true)]
        emails: Vec<String>,

        /// Pacing interval in milliseconds.
        /// Overrides YAHOO_EXISTS_INTERVAL_MS.
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Skip pacing between checks.
        #[arg(long)]
        no_limit: bool,

        /// Print one JSON object per line.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   yahoo-exists completions bash > ~/.local/share/bash-completion/completions/yahoo-exists
    ///   yahoo-exists completions zsh > ~/.zfunc/_yahoo-exists
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Serialize)]
struct CheckLine<'a> {
    email: &'a str,
    result: ExistenceResult,
    exists: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            emails,
            interval_ms,
            no_limit,
            json,
        } => {
            let mut config = ValidatorConfig::from_env()?;
            if let Some(ms) = interval_ms {
                config = config.with_interval_ms(ms);
            }

            let validator = YahooExistsValidator::new(
                Arc::new(HttpClientCache::new(config.timeout_ms)),
                Arc::new(RateLimitingFactory::new()),
                config,
            );

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling in-flight check");
                    on_ctrl_c.cancel();
                }
            });

            for email in &emails {
                let result = if no_limit {
                    validator.email_exists_without_limit(email, &cancel).await?
                } else {
                    validator.email_exists(email, &cancel).await?
                };

                if json {
                    let line = CheckLine {
                        email,
                        result,
                        exists: result.as_option(),
                    };
                    println!("{}", serde_json::to_string(&line)?);
                } else {
                    println!("{email}: {result}");
                }
            }

            validator.dispose_async().await;
        }

        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "yahoo-exists",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
