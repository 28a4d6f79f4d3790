// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credence - pluggable credential authentication engine.
//!
//! Command-line front end: validate configuration, list handlers, and run
//! single authentication attempts against the configured engine.

mod prompt;
mod wiring;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use credence_aup::{AttributeAupRepository, AupFlow, AupState};
use credence_config::{ConfigError, CredenceConfig};
use credence_core::{AuthenticationContext, Credential, HealthStatus, UsernamePasswordCredential};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Credence - pluggable credential authentication engine.
#[derive(Parser, Debug)]
#[command(name = "credence", version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the layered lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and report every problem found.
    CheckConfig,
    /// List registered handlers in invocation order.
    Handlers,
    /// Run one username/password authentication attempt.
    Authenticate {
        #[arg(long)]
        username: String,
        /// Read the password from the first line of stdin.
        #[arg(long)]
        password_stdin: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<CredenceConfig, Vec<ConfigError>> {
    match path {
        Some(path) => credence_config::load_and_validate_path(path),
        None => credence_config::load_and_validate(),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let directives = ["credence", "credence_engine", "credence_handlers", "credence_aup"]
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",");
    let filter = EnvFilter::try_from_env("CREDENCE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            credence_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.engine.log_level);

    let manager = match wiring::build_manager(&config) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            eprintln!("credence: {e}");
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::CheckConfig => {
            println!(
                "config OK: {} handlers, policy {}, evaluation {}",
                config.handlers.len(),
                config.engine.policy,
                config.engine.evaluation
            );
            0
        }
        Commands::Handlers => {
            for ((name, status), entry) in manager.health().await.iter().zip(&config.handlers) {
                let health = match status {
                    HealthStatus::Healthy => "healthy".to_string(),
                    HealthStatus::Degraded(reason) => format!("degraded: {reason}"),
                    HealthStatus::Unhealthy(reason) => format!("unhealthy: {reason}"),
                };
                let timeout = entry
                    .timeout_ms
                    .map(|ms| format!("{ms}ms"))
                    .unwrap_or_else(|| "-".to_string());
                println!("{name}\t{}\t{}\t{timeout}\t{health}", entry.handler_type, entry.comparator);
            }
            0
        }
        Commands::Authenticate {
            username,
            password_stdin,
        } => match prompt::read_password(password_stdin) {
            Ok(password) => {
                let credential: Credential =
                    UsernamePasswordCredential::with_secret(username, password).into();
                authenticate(&manager, &config, &credential).await
            }
            Err(e) => {
                eprintln!("credence: {e}");
                1
            }
        },
    };

    if let Err(e) = manager.shutdown().await {
        warn!(error = %e, "shutdown incomplete");
    }
    std::process::exit(code);
}

/// Runs one attempt, canceling it on Ctrl-C. Returns the exit code.
async fn authenticate(
    manager: &credence_engine::AuthenticationManager,
    config: &CredenceConfig,
    credential: &Credential,
) -> i32 {
    let cancel = CancellationToken::new();
    let context = AuthenticationContext::new().with_cancellation(cancel.clone());

    let signal = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, canceling attempt");
                cancel.cancel();
            }
        })
    };
    let result = manager.authenticate(credential, Some(&context)).await;
    signal.abort();

    let authentication = match result {
        Ok(authentication) => authentication,
        Err(e) => {
            println!("{e}");
            for failure in e.failures() {
                println!("  {}: {}", failure.kind, failure.message);
            }
            return 1;
        }
    };

    let principal = authentication.principal();
    println!("authenticated: {}", principal.id());
    for (name, values) in principal.attributes() {
        println!("  {name} = {}", values.join(", "));
    }

    if config.aup.enabled {
        let repository = Arc::new(AttributeAupRepository::new(config.aup.attribute.clone()));
        let flow = AupFlow::start(repository, &authentication).await;
        println!("acceptable usage policy: {}", flow.state());
        if flow.state() != AupState::Accepted {
            return 2;
        }
    }
    0
}
