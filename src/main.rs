// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use ingress_probe::{
    config::{self, ProbeConfig},
    discovery::{select_backend_source, select_resolver},
    dispatch::{BackendSet, Dispatcher},
    metrics::MetricsRegistry,
    probe::{Endpoint, HttpProbe},
    report::{self, DetailListing, RunReport, SummaryView},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Parser)]
#[command(name = "ingress-probe")]
#[command(about = "Checks how an entry point spreads round-robin traffic over backend replicas")]
struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of requests to send
    #[arg(short = 'n', long)]
    requests: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Entry point host; skips endpoint discovery
    #[arg(long, requires = "port")]
    host: Option<String>,

    /// Entry point port; used with --host
    #[arg(long, requires = "host")]
    port: Option<u16>,

    /// Backend identity to target; repeat to list several and skip pod discovery
    #[arg(short, long = "backend")]
    backends: Vec<String>,

    /// Namespace for kubectl lookups
    #[arg(long)]
    namespace: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print Prometheus metrics for the run after the report
    #[arg(long)]
    metrics: bool,
}

impl Cli {
    fn apply(self, config: &mut ProbeConfig) {
        if let Some(requests) = self.requests {
            config.requests = requests;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.probe.timeout_secs = timeout_secs;
        }
        if let (Some(host), Some(port)) = (self.host, self.port) {
            config.endpoint = Some(Endpoint::new(host, port));
        }
        if !self.backends.is_empty() {
            config.backends = self.backends;
        }
        if let Some(namespace) = self.namespace {
            config.discovery.namespace = namespace;
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs on stderr keep stdout clean for json/yaml reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ingress_probe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    let show_metrics = cli.metrics;

    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let resolver = select_resolver(config.endpoint.as_ref(), &config.discovery);
    let endpoint = resolver
        .resolve()
        .await
        .with_context(|| format!("Failed to resolve entry point via {}", resolver.name()))?;

    let source = select_backend_source(&config.backends, &config.discovery);
    let backends = BackendSet::new(
        source
            .backends()
            .await
            .with_context(|| format!("Failed to list backends via {}", source.name()))?,
    )?;

    info!("Host: {}", endpoint.host);
    info!("Port: {}", endpoint.port);
    info!("Backends ({}): {}", backends.len(), backends.join(", "));

    let metrics_registry = MetricsRegistry::new()?;
    let probe = Arc::new(HttpProbe::new(&config.probe)?);
    let dispatcher = Dispatcher::new(probe, endpoint, config.probe.timeout())
        .with_metrics(metrics_registry.collector());

    let result = dispatcher.run(&backends, config.requests).await;

    let summary = match report::summarize(&result, &backends) {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    match format {
        OutputFormat::Text => {
            println!(
                "Round-robin access test completed in {:.2} seconds.\n",
                result.elapsed.as_secs_f64()
            );
            print!("{}", DetailListing(&result));
            if let Some(summary) = &summary {
                println!();
                print!("{}", SummaryView(summary));
            }
        }
        OutputFormat::Json => {
            let report = RunReport::new(&result, summary.as_ref());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Yaml => {
            let report = RunReport::new(&result, summary.as_ref());
            print!("{}", serde_yaml::to_string(&report)?);
        }
    }

    if show_metrics {
        println!();
        print!("{}", metrics_registry.gather()?);
    }

    Ok(())
}
