//! Command line front end: find antivenom or blood near a city or a
//! coordinate.

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use medlocate::cities::{preset_cities, require_city};
use medlocate::client::FacilityClient;
use medlocate::config::{parse_radius_km, Config};
use medlocate::{GeoPoint, LocatorError, RankedFacility};

#[derive(Parser, Debug)]
#[command(name = "medlocate", version, about = "Find hospitals and blood banks near you")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hospitals stocking antivenom for an animal.
    Antivenom {
        /// Animal name as listed by `medlocate animals`.
        #[arg(long)]
        animal: String,
        #[command(flatten)]
        origin: Origin,
    },
    /// Hospitals and blood banks holding a blood group.
    Blood {
        /// Blood group, e.g. "O+".
        #[arg(long)]
        group: String,
        #[command(flatten)]
        origin: Origin,
    },
    /// List venomous animals known to the backend.
    Animals,
    /// List preset cities usable with --city.
    Cities,
}

#[derive(Args, Debug)]
struct Origin {
    /// Search around a preset city.
    #[arg(long, required_unless_present = "at", conflicts_with = "at")]
    city: Option<String>,
    /// Search around "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    at: Option<GeoPoint>,
    /// Search radius in kilometers. Defaults to the configured radius.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_radius_km)]
    radius: Option<f64>,
}

impl Origin {
    fn reference(&self) -> Result<GeoPoint, LocatorError> {
        match (&self.city, self.at) {
            (_, Some(point)) => Ok(point),
            (Some(city), None) => require_city(city),
            (None, None) => Err(LocatorError::Parse(
                "one of --city or --at is required".to_string(),
            )),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), LocatorError> {
    let config = Config::from_env()?;

    match cli.command {
        Command::Cities => {
            for city in preset_cities() {
                println!("{:<12} {}", city.name, city.location);
            }
        }
        Command::Animals => {
            let client = FacilityClient::from_config(&config)?;
            for animal in client.venomous_animals().await? {
                println!("{}", animal.name);
            }
        }
        Command::Antivenom { animal, origin } => {
            let reference = origin.reference()?;
            let radius = origin.radius.unwrap_or(config.search_radius_km);
            info!("Looking for {} antivenom around {}", animal, reference);
            let client = FacilityClient::from_config(&config)?;
            let ranked = client.search_antivenom(&animal, &reference, radius).await?;
            print_ranked(&ranked, radius);
        }
        Command::Blood { group, origin } => {
            let reference = origin.reference()?;
            let radius = origin.radius.unwrap_or(config.search_radius_km);
            info!("Looking for {} blood around {}", group, reference);
            let client = FacilityClient::from_config(&config)?;
            let ranked = client.search_blood(&group, &reference, radius).await?;
            print_ranked(&ranked, radius);
        }
    }
    Ok(())
}

fn print_ranked(ranked: &[RankedFacility], radius_km: f64) {
    if ranked.is_empty() {
        println!("No facilities within {} km.", radius_km);
        return;
    }
    for r in ranked {
        println!(
            "{:>8.2} km  {}  ({})  {}",
            r.distance_km(),
            r.item.name,
            r.item.location,
            r.item.contact
        );
    }
}
