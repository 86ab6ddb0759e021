use anyhow::Context;
use clap::Parser;
use prism_config::PrismConfig;

mod bootstrap;
mod cli;
mod page;
mod predict;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("prism error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = bootstrap::load_config()?;

    match &cli.command {
        cli::Commands::Serve(args) => {
            args.apply(&mut config);
            serve(config).await
        }
        cli::Commands::Models(args) => {
            args.apply(&mut config);
            let registry = bootstrap::load_registry(&config)?;
            let listing = routes::ModelListing::from_registry(&registry);
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(())
        }
    }
}

async fn serve(config: PrismConfig) -> anyhow::Result<()> {
    bootstrap::warn_unconfigured(&config);
    let state = bootstrap::build_state(&config).await?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, models = state.registry.len(), "prism listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("prism stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PRISM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
