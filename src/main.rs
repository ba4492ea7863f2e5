//! Hostinger Ecommerce MCP server - main entry point.
//!
//! Speaks MCP over stdio. Usage:
//! ```text
//! hostinger-ecommerce-mcp --jwt <token> --store-id <store>
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;

use hostinger_ecommerce_mcp::catalog::CatalogClient;
use hostinger_ecommerce_mcp::credentials::{resolve_at_startup, StartupArgs};
use hostinger_ecommerce_mcp::tools::ToolSurface;
use hostinger_ecommerce_mcp::{observability, Config, Error};

/// Flags handed to clap; credentials never go through it.
const CLI_FLAGS: &[&str] = &["api-url", "timeout-secs", "log-format"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// MCP server for the Hostinger Ecommerce catalog.
#[derive(Debug, Default, Parser)]
#[command(
    version,
    about,
    after_help = "Credentials: --jwt <TOKEN> --store-id <STORE> \
                  (fallbacks: HOSTINGER_JWT, HOSTINGER_STORE_ID)"
)]
struct Cli {
    /// Catalog API base URL.
    #[arg(long = "api-url", env = "HOSTINGER_ECOMMERCE_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,

    /// Log output format (stderr).
    #[arg(long = "log-format", value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(url) = &self.api_url {
            config.catalog.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.catalog.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if self.log_format == Some(LogFormat::Json) {
            config.observability.json_logs = true;
        }
        config
    }
}

/// Rebuild an argv holding only what clap should see.
fn clap_argv(args: &StartupArgs) -> Vec<String> {
    let mut argv = vec![env!("CARGO_PKG_NAME").to_string()];
    for (key, value) in args.pairs() {
        match (key, value) {
            ("help" | "version", _) => argv.push(format!("--{}", key)),
            ("-h" | "-V", _) => argv.push(key.to_string()),
            (_, Some(value)) if CLI_FLAGS.contains(&key) => {
                argv.push(format!("--{}={}", key, value));
            }
            _ => {}
        }
    }
    argv
}

fn parse_cli(args: &StartupArgs) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(clap_argv(args))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = StartupArgs::from_env();
    let (cli, cli_error) = match parse_cli(&args) {
        Ok(cli) => (cli, None),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => (Cli::default(), Some(e)),
    };
    let config = cli.config();

    observability::init_tracing(&config.observability);
    if let Some(e) = cli_error {
        tracing::warn!(error = %e.kind(), "ignoring unusable options; using defaults");
    }

    match run(&args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("MCP server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &StartupArgs, config: Config) -> hostinger_ecommerce_mcp::Result<()> {
    let credentials = resolve_at_startup(args, |var| std::env::var(var).ok());

    let client = CatalogClient::new(&config.catalog, credentials)?;
    tracing::info!(
        api = %config.catalog.base_url,
        credentials = client.has_credentials(),
        "catalog client ready"
    );
    let surface = ToolSurface::new(Arc::new(client), config.tools.clone())
        .with_server_name(config.mcp.server_name.clone());

    tracing::info!("serving on stdio");
    let service = surface
        .serve(stdio())
        .await
        .map_err(|e| Error::internal(format!("failed to start MCP service: {}", e)))?;

    let shutdown = service.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            shutdown.cancel();
        }
    });

    let reason = service
        .waiting()
        .await
        .map_err(|e| Error::internal(format!("MCP service task failed: {}", e)))?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
