//! Tabletalk CLI and HTTP server entry point.
//!
//! Binary name: `ttalk`
//!
//! Parses CLI arguments, initializes config and database pools, then
//! dispatches to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::{AppState, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG still wins when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,tabletalk=debug",
        _ => "trace",
    };
    tabletalk_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ttalk", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, database pools)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Init { demo } => {
            cli::init::init(&state, demo, cli.json).await?;
        }

        Commands::Refresh => {
            cli::refresh::refresh(&state, cli.json).await?;
        }

        Commands::Ask { question, summary } => {
            cli::ask::ask(&state, &question, summary, cli.json).await?;
        }

        Commands::Schema => {
            cli::schema::schema(&state, cli.json).await?;
        }

        Commands::History { limit } => {
            cli::history::history(&state, limit, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let server = ServerState::from_app(state).await?;

            // Repair index staleness before accepting traffic; fingerprint
            // skips make this cheap when nothing changed.
            if server.indexer.is_stale().await? {
                println!(
                    "  {} Schema changed since last index; refreshing...",
                    console::style("~").cyan()
                );
                let report = server.indexer.refresh().await?;
                println!(
                    "  {} Index refreshed: {} embedded, {} removed",
                    console::style("✓").green(),
                    report.indexed.len(),
                    report.removed.len()
                );
                if !report.is_clean() {
                    println!(
                        "  {} {} table(s) failed to index; retry with `ttalk refresh`",
                        console::style("!").yellow().bold(),
                        report.failed.len()
                    );
                }
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Tabletalk listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(server);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    tabletalk_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
