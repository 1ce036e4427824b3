use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastClient, SourceId, StatusKind,
    source::{backend::BackendClient, source_from_config, store_from_config},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{configure, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Multi-day forecast client")]
pub struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Backend base URL; overrides the configured one.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Backend route prefix, e.g. "/weather" for `/weather/weather` and `/weather/save`.
    #[arg(long, global = true)]
    pub route_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure the backend, sources and logging.
    Configure,

    /// Fetch and print the forecast for a city.
    Show {
        city: String,

        /// Where to fetch from: "backend" or "openweather". Defaults to the configured source.
        #[arg(long)]
        source: Option<String>,

        /// Save the request under this name once the forecast has loaded.
        #[arg(long)]
        save_as: Option<String>,
    },

    /// Save a named forecast request without printing the forecast.
    Save {
        /// Name to save the request under.
        #[arg(long)]
        name: String,

        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load().context("Failed to load configuration")?;
        init_tracing(self.verbose, config.debug);

        apply_overrides(&mut config, self.base_url, self.route_prefix)?;

        match self.command {
            Command::Configure => {
                configure::run(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, source, save_as } => {
                let id = match source {
                    Some(s) => SourceId::try_from(s.as_str())?,
                    None => config.default_source_id()?,
                };
                tracing::debug!(source = %id, "using forecast source");

                let mut client = ForecastClient::new(source_from_config(id, &config)?);
                if save_as.is_some() {
                    client = client.with_store(store_from_config(&config)?);
                }

                let loaded = client.fetch_forecast(&city).await.is_ok();
                let view = client.view();
                render::print_forecast(&view);
                render::print_status(&view);

                if let Some(name) = save_as.filter(|_| loaded && view.save_enabled) {
                    // The response names the city; save what the user typed.
                    if let Err(e) = client.save_forecast(&name, &city).await {
                        tracing::debug!(error = %e, "save after show failed");
                    }
                    render::print_status(&client.view());
                }

                Ok(exit_code(&client))
            }
            Command::Save { name, city } => {
                let backend = BackendClient::from_config(config.backend()?)?;
                let client =
                    ForecastClient::new(Box::new(backend.clone())).with_store(Box::new(backend));

                if let Err(e) = client.save_forecast(&name, &city).await {
                    tracing::debug!(error = %e, "save failed");
                }
                render::print_status(&client.view());

                Ok(exit_code(&client))
            }
        }
    }
}

fn exit_code(client: &ForecastClient) -> ExitCode {
    match client.view().status {
        Some(status) if status.kind == StatusKind::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

/// Command-line values win over the config file. A route prefix needs a backend to apply to.
fn apply_overrides(
    config: &mut Config,
    base_url: Option<String>,
    route_prefix: Option<String>,
) -> anyhow::Result<()> {
    if let Some(url) = base_url {
        config.set_backend_url(url);
    }

    if let Some(prefix) = route_prefix {
        let backend = config.backend.as_mut().ok_or_else(|| {
            anyhow::anyhow!(
                "`--route-prefix` needs a backend base URL.\n\
                 Hint: pass `--base-url <url>` as well, or run `forecast configure`."
            )
        })?;
        backend.route_prefix = prefix;
    }

    Ok(())
}

/// Filter used when `RUST_LOG` is unset. Request events are debug-level, so
/// they only show with `debug = true` in config or `-v`.
fn log_directives(verbose: u8, debug: bool) -> String {
    let level = match (verbose, debug) {
        (0, false) => "warn",
        (0, true) | (1, _) => "debug",
        _ => "trace",
    };

    format!("warn,forecast_core={level},forecast={level}")
}

fn init_tracing(verbose: u8, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(verbose, debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
