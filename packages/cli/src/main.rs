#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front-end for the land-cover viewer.
//!
//! ```text
//! landcover_viewer periods
//! landcover_viewer render [--year 2020] [--json] [--probe <LAT> <LON>]
//! ```
//!
//! Running with no subcommand enters interactive mode. `--config` and
//! `--catalog` (or `LANDCOVER_VIEWER_CONFIG` / `LANDCOVER_VIEWER_CATALOG`)
//! replace the built-in CDL tomato configuration and catalog.

mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use landcover_viewer::config::ViewerConfig;
use landcover_viewer::controller::{Controller, UiEvent};
use landcover_viewer::resolver::LayerResolver;
use landcover_viewer::store::ParameterStore;
use landcover_viewer_platform::canvas::LayerStack;
use landcover_viewer_platform::catalog::InMemoryCatalog;
use landcover_viewer_platform::dispatch::DispatchCanvas;
use landcover_viewer_platform::expr::Renderable;

#[derive(Parser)]
#[command(
    name = "landcover_viewer",
    about = "Show one land-cover class for a selected year"
)]
struct Cli {
    /// Viewer configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Image and feature catalog file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable years
    Periods,
    /// Resolve one year and draw it
    Render {
        /// Year to show (defaults to the configured default year)
        #[arg(long)]
        year: Option<String>,
        /// Print the resolved layer requests as JSON instead of drawing
        #[arg(long)]
        json: bool,
        /// Sample the classified layer at this point after drawing
        #[arg(
            long,
            num_args = 2,
            value_names = ["LAT", "LON"],
            allow_negative_numbers = true
        )]
        probe: Option<Vec<f64>>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = ViewerConfig::resolve(cli.config.as_deref())?;
    let catalog = Arc::new(InMemoryCatalog::resolve(cli.catalog.as_deref())?);
    log::debug!("Catalog has {} image(s)", catalog.image_count());

    let Some(command) = cli.command else {
        return interactive::run(config, catalog)
            .await
            .map_err(|e| -> Box<dyn std::error::Error> { e });
    };

    match command {
        Commands::Periods => {
            let supported = config.supported_periods()?;
            for period in supported.as_slice() {
                if *period == supported.default_period() {
                    println!("{period} (default)");
                } else {
                    println!("{period}");
                }
            }
        }
        Commands::Render { year, json, probe } => {
            if json {
                print_requests(&config, catalog, year.as_deref())?;
            } else {
                render(&config, catalog, year, probe.as_deref()).await?;
            }
        }
    }

    Ok(())
}

/// Prints the resolved layer requests without drawing anything.
fn print_requests(
    config: &ViewerConfig,
    catalog: Arc<InMemoryCatalog>,
    year: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ParameterStore::new(config.supported_periods()?);
    if let Some(year) = year {
        store.set_from_str(year)?;
    }

    let resolver = LayerResolver::new(catalog, config.resolver_settings()?);
    let resolved = resolver.resolve(store.get())?;
    for warning in &resolved.warnings {
        eprintln!("Note: {warning}");
    }
    let requests = resolved.into_ordered();
    println!("{}", serde_json::to_string_pretty(&requests)?);
    Ok(())
}

/// Runs one render cycle through the fire-and-forget canvas and prints the
/// map once the backend has drained every command.
async fn render(
    config: &ViewerConfig,
    catalog: Arc<InMemoryCatalog>,
    year: Option<String>,
    probe: Option<&[f64]>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (canvas, backend) = DispatchCanvas::spawn_backend(LayerStack::new());
    let mut controller = Controller::from_config(config, catalog.clone(), canvas)?;

    if let Some(year) = year {
        controller.handle(UiEvent::SelectPeriod(year))?;
        controller.handle(UiEvent::ShowResult)?;
    } else {
        controller.start()?;
    }

    let panels: Vec<String> = controller
        .panel()
        .iter()
        .map(ToString::to_string)
        .collect();
    let status = controller.status().map(str::to_string);
    drop(controller);

    let stack = backend.await??;
    print!("{stack}");
    for panel in panels {
        println!();
        print!("{panel}");
    }
    if let Some(status) = status {
        eprintln!("Note: {status}");
    }

    if let Some(&[lat, lon]) = probe {
        println!();
        for layer in stack.layers() {
            let Renderable::Image { expr, .. } = &layer.renderable else {
                continue;
            };
            match catalog.sample(expr, lon, lat)? {
                Some(value) => println!("{} at ({lat}, {lon}): {value}", layer.label),
                None => println!("{} at ({lat}, {lon}): masked", layer.label),
            }
        }
    }

    Ok(())
}
