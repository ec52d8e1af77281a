use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compute::EmissionsStore;
use formats::load_dataset_from_paths;
use layers::{render_page, snapshot_state};
use scene::{ViewConfig, Viewport};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and render the CO₂ emissions map offline")]
struct Args {
    /// Boundary GeoJSON (FeatureCollection)
    #[arg(long, env = "CO2_BOUNDARIES", default_value = "crates/apps/viewer_web/assets/map/world_sample.geojson")]
    boundaries: PathBuf,

    /// Emissions CSV
    #[arg(long, env = "CO2_EMISSIONS", default_value = "crates/apps/viewer_web/assets/data/co2_sample.csv")]
    emissions: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the distinct years of the emissions table
    Years,

    /// Print one country's rows as JSON
    Inspect {
        /// ISO 3166-1 alpha-3 code
        #[arg(long)]
        code: String,
    },

    /// Render a self-contained HTML snapshot of the map
    Render {
        /// Year to show (default: first year)
        #[arg(long)]
        year: Option<i32>,

        /// Country to select and zoom to
        #[arg(long)]
        select: Option<String>,

        #[arg(long, env = "CO2_VIEWPORT_WIDTH", default_value_t = 1280.0)]
        width: f64,

        #[arg(long, env = "CO2_VIEWPORT_HEIGHT", default_value_t = 720.0)]
        height: f64,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct YearsSummary<'a> {
    years: &'a [i32],
    countries_without_boundary: Vec<&'a str>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_dataset_from_paths(&args.boundaries, &args.emissions)?;
    let store = EmissionsStore::new(dataset);

    match args.command {
        Command::Years => {
            let summary = YearsSummary {
                years: store.years(),
                countries_without_boundary: store.unmatched_codes(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Inspect { code } => {
            let report = store.report(&code);
            if report.series.is_empty() && !report.has_boundary {
                return Err(format!("unknown country code: {code}").into());
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Render {
            year,
            select,
            width,
            height,
            out,
        } => {
            let config = ViewConfig {
                viewport_width: width,
                viewport_height: height,
                ..ViewConfig::default()
            };
            let html = render_snapshot(&store, &config, year, select.as_deref())?;
            match out {
                Some(path) => {
                    fs::write(&path, html)?;
                    info!("wrote {}", path.display());
                }
                None => std::io::stdout().write_all(html.as_bytes())?,
            }
        }
    }
    Ok(())
}

fn render_snapshot(
    store: &EmissionsStore,
    config: &ViewConfig,
    year: Option<i32>,
    select: Option<&str>,
) -> Result<String, String> {
    let viewport = Viewport::from_config(config);
    let state = snapshot_state(store, config, viewport, year, select).ok_or_else(|| {
        let years: Vec<String> = store.years().iter().map(|y| y.to_string()).collect();
        format!("no data for year {year:?}; available: {}", years.join(", "))
    })?;
    let index = store.index_for_year(state.active_year);
    Ok(render_page(store, &index, &state, config))
}
