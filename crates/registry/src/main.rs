use coinvault_registry::{Registry, RegistryConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Coinvault - cryptocurrency reference registry

USAGE:
    coinvault [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                    Server host (default: 0.0.0.0)
    PORT                    Server port (default: 8000)
    DATABASE_URL            PostgreSQL URL; selects postgres storage
    COINGECKO_BASE_URL      CoinGecko API base URL
    COINGECKO_API_KEY       CoinGecko demo API key
    REFRESH_INTERVAL_SECS   Reconciliation interval (default: 86400)
    RUST_LOG                Log level filter

EXAMPLES:
    # Run with in-memory storage
    coinvault

    # Run with config file
    coinvault --config config.json

    # Run against PostgreSQL with hourly refresh
    DATABASE_URL=postgres://localhost/coinvault REFRESH_INTERVAL_SECS=3600 coinvault
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinvault_registry=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path);
        RegistryConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        RegistryConfig::default()
    };
    config.apply_env_overrides()?;

    tracing::info!("Storage backend: {:?}", config.storage.backend);
    tracing::info!("Price provider: {}", config.provider.base_url);
    if config.reconciliation.enabled {
        tracing::info!(
            "Reconciliation every {}s (run on startup: {})",
            config.reconciliation.interval_secs,
            config.reconciliation.run_on_startup
        );
    }

    let registry = Registry::from_config(config).await?;

    tracing::info!("Available endpoints:");
    tracing::info!("  GET    /health");
    tracing::info!("  POST   /cryptocurrencies");
    tracing::info!("  GET    /cryptocurrencies?skip=0&limit=100");
    tracing::info!("  GET    /cryptocurrencies/{{id}}");
    tracing::info!("  PUT    /cryptocurrencies/{{id}}");
    tracing::info!("  DELETE /cryptocurrencies/{{id}}");
    tracing::info!("  GET    /market/top?limit=10");
    tracing::info!("  POST   /admin/reconcile");
    tracing::info!("  GET    /admin/reconcile");

    registry.run().await
}
