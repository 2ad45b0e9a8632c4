//! waymark command-line inspector.
//!
//! Loads a route manifest, builds a router and reports what a request
//! resolves to.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use waymark::{Manifest, MatchReport, RouteReport};
use waymark_router::{
    create_router, LinearRouter, RadixRouter, RouteEntry, RouterConfig, SharedLogger, Strategy,
    TracingLogger,
};
use waymark_telemetry::{events, LogFormat, Telemetry, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "waymark", about = "Inspect and test route tables", version)]
struct Cli {
    /// Log level or filter directive (overridden by RUST_LOG).
    #[arg(long, global = true, env = "WAYMARK_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (json or pretty).
    #[arg(long, global = true, env = "WAYMARK_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a route manifest by building both router backends.
    Check {
        /// Route manifest (YAML or JSON).
        #[arg(short, long)]
        routes: String,
    },

    /// Print the normalized route table in registration order.
    Routes {
        /// Route manifest (YAML or JSON).
        #[arg(short, long)]
        routes: String,

        /// Output format (text or json).
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Resolve a request against the route table.
    Match {
        /// Route manifest (YAML or JSON).
        #[arg(short, long)]
        routes: String,

        /// Request method.
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request URL or path.
        #[arg(short, long)]
        url: String,

        /// Report every matching route instead of the first.
        #[arg(long)]
        all: bool,

        /// Router backend, overriding the manifest (radix or linear).
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Output format (text or json).
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Output format shared by `routes` and `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown output format '{}' (expected text or json)", other),
        }
    }
}

/// Load a manifest and normalize its routes.
fn load_table(path: &str) -> anyhow::Result<(Manifest, Vec<RouteEntry<String>>)> {
    let manifest = Manifest::load(Path::new(path))?;
    tracing::info!(
        event = events::MANIFEST_LOADED,
        path = %path,
        routes = manifest.routes.len(),
        "manifest loaded"
    );

    let table = manifest.route_table().inspect_err(|e| {
        tracing::warn!(event = events::ROUTE_TABLE_INVALID, path = %path, error = %e, "invalid route table");
    })?;

    Ok((manifest, table))
}

fn run_check(routes: &str) -> anyhow::Result<String> {
    let (_, table) = load_table(routes)?;
    let count = table.len();

    // Both backends accept the same tables; build each so neither can drift.
    RadixRouter::with_logger(table.iter().cloned(), SharedLogger::new(TracingLogger))
        .with_context(|| format!("radix router rejected '{}'", routes))?;
    LinearRouter::with_logger(table, SharedLogger::new(TracingLogger))
        .with_context(|| format!("linear router rejected '{}'", routes))?;

    tracing::info!(event = events::ROUTER_BUILT, routes = count, "route table checked");
    Ok(format!("ok: {} routes", count))
}

fn run_routes(routes: &str, format: &str) -> anyhow::Result<String> {
    let format = OutputFormat::parse(format)?;
    let (_, table) = load_table(routes)?;
    let reports: Vec<RouteReport> = table.iter().map(RouteReport::from_entry).collect();

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
        OutputFormat::Text => reports
            .iter()
            .map(RouteReport::render_text)
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn run_match(
    routes: &str,
    method: &str,
    url: &str,
    all: bool,
    strategy: Option<Strategy>,
    format: &str,
) -> anyhow::Result<String> {
    let format = OutputFormat::parse(format)?;
    let (manifest, table) = load_table(routes)?;
    let strategy = strategy.or(manifest.router.strategy).unwrap_or_default();

    let config = RouterConfig::new()
        .with_strategy(strategy)
        .with_logger(TracingLogger);
    let count = table.len();
    let router = create_router(table, &config)
        .with_context(|| format!("failed to build {} router", strategy))?;
    tracing::info!(event = events::ROUTER_BUILT, strategy = %strategy, routes = count, "router built");

    let report = MatchReport::resolve(router.as_ref(), strategy, method, url, all);
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => report.render_text(),
    })
}

/// Print a command's output, or its error chain, and map to an exit code.
fn finish(result: anyhow::Result<String>) -> ExitCode {
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry_config = TelemetryConfig::new()
        .with_log_level(cli.log_level.as_str())
        .with_log_format(cli.log_format)
        .with_ansi(std::io::stderr().is_terminal());
    if let Err(e) = Telemetry::init(telemetry_config) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    match cli.command {
        Commands::Check { routes } => finish(run_check(&routes)),
        Commands::Routes { routes, format } => finish(run_routes(&routes, &format)),
        Commands::Match {
            routes,
            method,
            url,
            all,
            strategy,
            format,
        } => finish(run_match(&routes, &method, &url, all, strategy, &format)),
    }
}
