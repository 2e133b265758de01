//! pyhover - Python hover intelligence CLI
//!
//! Backend for editor hover features: classifies the construct under the
//! cursor and resolves dotted names to documentation metadata, always
//! answering in JSON.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pyhover::app::App;
use pyhover::cli::{Cli, Commands, OutputContext};

fn main() {
    // Logs go to stderr so stdout stays pure JSON
    // Use RUST_LOG=pyhover=debug for verbose output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pyhover=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({ "error": format!("Failed to create runtime: {e}") })
            );
            std::process::exit(2);
        }
    };
    let result = runtime.block_on(async_main());
    // Abandoned module loads must not hold the process open
    runtime.shutdown_background();

    if let Err(e) = result {
        // Fatal errors share the `{"error": ...}` shape of handled ones
        println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
        std::process::exit(2);
    }
}

async fn async_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app = App::new()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize: {:#}", e))?;
    if cli.compact {
        app.set_output(OutputContext::compact());
    }

    execute_command(cli.command, &app).await
}

async fn execute_command(command: Commands, app: &App) -> anyhow::Result<()> {
    use pyhover::cli::commands;

    match command {
        Commands::Locate(args) => commands::locate::execute(args, app).await,
        Commands::Resolve(args) => commands::resolve::execute(args, app).await,
        Commands::Version(args) => commands::version::execute(args, app),
        Commands::Batch(args) => commands::batch::execute(args, app).await,
        Commands::Config(args) => commands::config::execute(args, app).await,
        Commands::Snapshot(args) => commands::snapshot::execute(args, app).await,
    }
}
