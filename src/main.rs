//! workerenv CLI - inspect a worker's emulated environment

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;

use workerenv::binding::{BindingValue, WorkerEnv};
use workerenv::provider::{LocalWebSocketPairProvider, MockProviders};
use workerenv::{EnvError, FixSuggestion, WorkerConfig, WorkerGlobals};

#[derive(Parser)]
#[command(name = "workerenv")]
#[command(about = "Local runtime environment for edge worker scripts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check binding names and shapes in a config file
    Validate {
        /// Path to a .yaml or .json worker config
        file: String,
    },

    /// Resolve bindings against mock providers and print the environment
    Env {
        /// Path to a .yaml or .json worker config
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => validate_config(&file).await,
        Commands::Env { file } => print_env(&file).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn load_config(file: &str) -> Result<WorkerConfig, EnvError> {
    let text = tokio::fs::read_to_string(file).await?;
    WorkerConfig::parse_for(Path::new(file), &text)
}

async fn validate_config(file: &str) -> Result<(), EnvError> {
    let config = load_config(file).await?;
    let bindings = config.validate()?;

    println!("{} Config '{}' is valid", "✓".green(), file);
    if let Some(script) = &config.script {
        println!("  Script: {}", script);
    }
    println!("  Bindings: {}", bindings.len());

    Ok(())
}

async fn print_env(file: &str) -> Result<(), EnvError> {
    let config = load_config(file).await?;
    let bindings = config.bindings()?;

    let mut globals = WorkerGlobals::new();
    globals.install(|| "local-caches", LocalWebSocketPairProvider);

    let providers = MockProviders::new();
    let env = WorkerEnv::resolve(&bindings, &providers)?;

    println!("{}", "Bindings:".cyan().bold());
    for name in env.names() {
        let Some(value) = env.get(name) else { continue };
        let shown = match value {
            BindingValue::Text(text) => format!("{:?}", text),
            BindingValue::Secret(_) => "<redacted>".dimmed().to_string(),
            BindingValue::KvNamespace(handle)
            | BindingValue::DoNamespace(handle)
            | BindingValue::R2Bucket(handle)
            | BindingValue::AnalyticsEngine(handle)
            | BindingValue::D1Database(handle) => handle.to_string(),
        };
        println!("  {} {} {}", name.bold(), format!("[{}]", value.kind()).dimmed(), shown);
    }

    let installed: Vec<&str> = globals.installed().iter().map(|s| s.name()).collect();
    println!("{} {}", "Globals:".cyan().bold(), installed.join(", "));

    Ok(())
}
