use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use layers::query::DEFAULT_MAX_CITIES;
use serde::Serialize;
use tools::{load_datasets, run_countries, run_filter, run_search};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "atlas-cities", about = "Query the city and country datasets")]
struct Cli {
    /// City dataset (JSON object of ISO3 code to city list).
    #[arg(long, env = "ATLAS_CITIES", global = true)]
    cities: Option<PathBuf>,

    /// Country boundary GeoJSON.
    #[arg(long, env = "ATLAS_COUNTRIES", global = true)]
    countries: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Output::Text, global = true)]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cities of one country inside a bounding box, in dataset order.
    Filter {
        #[arg(long)]
        country: String,
        #[arg(long, requires_all = ["west", "north", "east"], allow_hyphen_values = true)]
        south: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        west: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        north: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        east: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_MAX_CITIES)]
        limit: usize,
    },
    /// Case-insensitive substring search over city and region names.
    Search { query: String },
    /// Country codes with city counts and boundary names.
    Countries,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    if cli.cities.is_none() {
        return Err("no city dataset: pass --cities or set ATLAS_CITIES".to_string());
    }
    let datasets = load_datasets(cli.cities.as_deref(), cli.countries.as_deref());

    match cli.command {
        Command::Filter {
            country,
            south,
            west,
            north,
            east,
            limit,
        } => {
            let edges = match (south, west, north, east) {
                (Some(s), Some(w), Some(n), Some(e)) => Some([s, w, n, e]),
                (None, None, None, None) => None,
                _ => return Err("--south, --west, --north and --east go together".to_string()),
            };
            let rows = run_filter(&datasets, &country, edges, limit);
            print_rows(cli.output, &rows, |r| r.text_line())
        }
        Command::Search { query } => {
            let rows = run_search(&datasets, &query);
            print_rows(cli.output, &rows, |r| r.text_line())
        }
        Command::Countries => {
            let rows = run_countries(&datasets);
            print_rows(cli.output, &rows, |r| r.text_line())
        }
    }
}

fn print_rows<T: Serialize>(
    output: Output,
    rows: &[T],
    line: impl Fn(&T) -> String,
) -> Result<(), String> {
    match output {
        Output::Json => {
            let payload = serde_json::to_string_pretty(rows).map_err(|e| format!("json: {e}"))?;
            println!("{payload}");
        }
        Output::Text => {
            for row in rows {
                println!("{}", line(row));
            }
        }
    }
    Ok(())
}
