pub mod api;
pub mod clients;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod state;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("daemon" | "-d" | "--daemon") => run_daemon(config).await,

        Some("init" | "--init") => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {}", other);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Trendarr - Engagement-ranked X post search proxy");
    println!();
    println!("USAGE:");
    println!("  trendarr [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  daemon            Run the search proxy (default)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("ENDPOINT:");
    println!("  GET /search?keywords=a,b&hours=6&lang=tr&max=10");
    println!("  with header 'Authorization: Bearer <X API token>'");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the cache store and page size.");
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    info!(
        "Trendarr v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    if !config.cache.enabled || config.cache.rest_url.is_empty() {
        info!("Result cache disabled; every request goes upstream");
    }

    let port = config.server.port;
    let state = api::create_app_state(config)?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Search proxy running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Daemon stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }
}
