mod collect;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use propscan_rightmove::PropertyType;

#[derive(Debug, Parser)]
#[command(name = "propscan")]
#[command(about = "UK property listing and journey-time collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search Rightmove listings for every outcode in the postcode file.
    Properties(PropertiesArgs),
    /// Plan TfL journeys from every postcode to one destination.
    Journeys(JourneysArgs),
}

#[derive(Debug, Args)]
struct PropertiesArgs {
    /// Market to search: "rent" or "sale".
    #[arg(long, default_value = "rent")]
    prop_type: PropertyType,

    /// JSON array of {postcode, latitude, longitude} records.
    #[arg(long)]
    postcodes: PathBuf,

    /// JSON object mapping outcode to Rightmove location code.
    #[arg(long)]
    outcode_codes: PathBuf,

    /// Output path for the location-keyed results JSON.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    min_bedrooms: Option<u32>,

    #[arg(long)]
    max_bedrooms: Option<u32>,

    /// Optional JSON object mapping postcode to journey time (minutes),
    /// joined onto each listing's estimated postcode.
    #[arg(long)]
    journey_times: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct JourneysArgs {
    /// JSON array of {postcode, latitude, longitude} records.
    #[arg(long)]
    postcodes: PathBuf,

    /// TfL location identifier of the shared destination.
    #[arg(long)]
    destination: String,

    #[arg(long)]
    year: i32,
    #[arg(long)]
    month: u32,
    #[arg(long)]
    day: u32,
    /// Departure hour, on the hour, local time.
    #[arg(long)]
    hour: u32,

    /// Output path for the postcode-keyed results JSON.
    #[arg(long)]
    out: PathBuf,

    /// Existing results JSON; only postcodes missing from it are fetched,
    /// and the merged collection is written to --out.
    #[arg(long)]
    update: Option<PathBuf>,

    /// Optional output path for per-postcode summary rows.
    #[arg(long)]
    rows_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = propscan_core::load_app_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Properties(args) => collect::run_properties(&config, &args).await,
        Commands::Journeys(args) => collect::run_journeys(&config, &args).await,
    }
}
