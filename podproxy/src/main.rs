mod config;

use clap::Parser;
use discovery::kubernetes::PodFetcher;
use metrics_exporter_statsd::StatsdBuilder;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Discovery-based metrics proxy for cluster workloads")]
struct Cli {
    /// Path to the YAML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match config::Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => config::Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let _sentry_guard = config.logging().map(|logging| {
        sentry::init((
            logging.sentry_dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let Some(metrics_config) = config.metrics() {
        install_statsd(metrics_config);
    }
    proxy::metrics_defs::describe_all();

    // In-cluster config when running as a pod, kubeconfig otherwise
    let client = match kube::Client::try_default().await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "no kubernetes configuration available");
            process::exit(1);
        }
    };
    let fetcher = Arc::new(PodFetcher::new(client, &config.discovery.namespace));

    tokio::select! {
        result = proxy::run(config.proxy, fetcher) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "proxy exited");
                process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }
}

fn install_statsd(config: &config::MetricsConfig) {
    match StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some("podproxy"))
    {
        Ok(recorder) => {
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("a metrics recorder was already installed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not set up statsd metrics"),
    }
}
