use std::{net::SocketAddr, path::Path, sync::Arc};

use clap::Parser;
use cloudgate::{
    adapters::{
        AppState, FileDocumentSource, GrpcAaaVerifier, GrpcCloudExecutor, GrpcTokenStore,
        RpcChannelFactory, TracingFaultReporter, router,
    },
    config::{GatewayConfig, GatewayConfigValidator, loader::load_config},
    core::{CloudGateway, GatewayPorts},
    metrics,
    ports::DocumentSource,
    tracing_setup,
    utils::graceful_shutdown::GracefulShutdown,
};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Start the gateway server (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Some(Commands::Validate { config }) => validate_config_command(&config).await,
        Some(Commands::Init { config }) => init_config_command(&config).await,
        Some(Commands::Serve { config }) => serve(&config).await,
        None => serve(&args.config).await,
    }
}

async fn serve(config_path: &str) -> Result<()> {
    let config: GatewayConfig = load_config(config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    tracing_setup::init_tracing(&config.logging.level, config.logging.json)
        .map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;
    tracing::info!("Loaded configuration from {config_path}");

    metrics::init_metrics().map_err(|e| eyre!("Failed to initialize metrics: {}", e))?;

    GatewayConfigValidator::validate(&config).wrap_err("Invalid configuration")?;
    let settings = config.gateway_settings()?;
    let connect_timeout = config.connect_timeout()?;
    let call_timeout = config.call_timeout()?;

    let channels = |uri: &str| {
        RpcChannelFactory::new(uri, connect_timeout, call_timeout)
            .with_context(|| format!("Failed to configure RPC endpoint {uri}"))
    };

    let gateway = Arc::new(CloudGateway::new(
        settings,
        GatewayPorts {
            aaa: Arc::new(GrpcAaaVerifier::new(channels(&config.aaa.endpoint)?)),
            token_store: Arc::new(GrpcTokenStore::new(channels(&config.rpc.token_service)?)),
            executor: Arc::new(GrpcCloudExecutor::new(channels(
                &config.rpc.cloud_service,
            )?)),
            action_map: document_source(&config.action_map.path, config.action_map.watch),
            service_catalog: document_source(
                &config.service_catalog.path,
                config.service_catalog.watch,
            ),
            reporter: Arc::new(TracingFaultReporter),
        },
    ));
    let watchers = gateway.spawn_document_watchers();
    tracing::info!(watchers = watchers.len(), "document watchers started");

    let app = router(AppState::new(
        gateway,
        config.max_body_bytes,
        &config.version,
    ));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("cloudgate listening on {}", addr);

    let shutdown = Arc::new(GracefulShutdown::with_timeout(config.shutdown_timeout()?));
    let signal_handler = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown.run_signal_handler().await {
                tracing::error!("Signal handler error: {}", e);
            }
        })
    };

    let stop_accepting = shutdown.child_token();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_accepting.cancelled().await })
            .await
    });

    let server_result = tokio::select! {
        joined = &mut server => {
            joined.context("Server task failed")?.context("Server error")
        },
        shutdown_reason = shutdown.wait_for_shutdown_signal() => {
            tracing::info!("Shutdown signal received: {:?}", shutdown_reason);
            match tokio::time::timeout(shutdown.drain_timeout(), &mut server).await {
                Ok(joined) => joined.context("Server task failed")?.context("Server error"),
                Err(_) => {
                    tracing::warn!(
                        "In-flight requests did not finish within {:?}, aborting",
                        shutdown.drain_timeout()
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    for watcher in watchers {
        watcher.abort();
    }
    signal_handler.abort();
    tracing::info!("Graceful shutdown completed");
    server_result
}

fn document_source(path: &str, watch: bool) -> Arc<dyn DocumentSource> {
    if watch {
        match FileDocumentSource::watched(path) {
            Ok(source) => return Arc::new(source),
            Err(e) => tracing::warn!(
                "Cannot watch {}: {}. Falling back to TTL-only reloads",
                path,
                e
            ),
        }
    }
    Arc::new(FileDocumentSource::new(path))
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    match GatewayConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Listen Address: {}", config.listen_addr);
            println!("   • Version: {}", config.version);
            println!("   • AAA: {} ({})", config.aaa.enabled, config.aaa.endpoint);
            println!("   • Token Service: {}", config.rpc.token_service);
            println!("   • Cloud Service: {}", config.rpc.cloud_service);
            println!("   • Call Timeout: {}", config.rpc.call_timeout);
            println!("   • Raw Calls Enabled: {}", !config.open_token.is_empty());
            println!(
                "   • Service Catalog Enforced: {}",
                config.service_catalog.enforce
            );
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Ensure all endpoints look like http://host:port");
            println!("   • Use humantime durations such as '3s' or '500ms'");
            println!("   • Verify listen address format (e.g., '127.0.0.1:3000')");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# cloudgate configuration
# Every key can be overridden from the environment, e.g. CLOUDGATE__OPEN_TOKEN

listen_addr = "127.0.0.1:8080"
version = "v1"

# Shared token of the raw entry point; leave empty to disable raw calls
open_token = ""
max_body_bytes = 1048576
shutdown_timeout = "30s"

[aaa]
enabled = true
endpoint = "http://127.0.0.1:50051"

[rpc]
token_service = "http://127.0.0.1:50052"
cloud_service = "http://127.0.0.1:50053"
connect_timeout = "3s"
call_timeout = "30s"

[action_map]
path = "ActionMap.json"
cache_ttl = "30s"
watch = true
map_private_calls = false
map_raw_calls = false

[service_catalog]
path = "cloud.json"
cache_ttl = "30s"
watch = true
enforce = false

[logging]
level = "info"
json = true
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'cloudgate serve --config {config_path}' to start the server");
    Ok(())
}
