#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic)]

mod cli;
mod error;
mod export;
mod fetch;
mod geocode;
mod parse;
mod postal;
mod progress;
mod scrape;

use std::env;

use clap::Parser;
use url::Url;

use crate::cli::{Cli, Command};
use crate::geocode::PlacesClient;
use crate::progress::BarProgress;
use crate::scrape::ScrapeOptions;

pub use error::Result;

/// Environment variable holding the place-lookup API key.
const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

fn places_client(
    cli: &Cli,
    client: &reqwest::Client,
) -> core::result::Result<Option<PlacesClient>, String> {
    if cli.skip_addresses {
        return Ok(None);
    }
    match env::var(API_KEY_VAR) {
        Ok(key) => Ok(Some(PlacesClient::new(client.clone(), key))),
        Err(_) => Err(format!(
            "env var {API_KEY_VAR} is not set; set it (or put it in .env), \
             or pass --skip-addresses to scrape without address enrichment"
        )),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    pretty_env_logger::init();
    let cli = Cli::parse();

    let client = fetch::make_client();
    let opts = ScrapeOptions {
        directory_url: Url::parse(&cli.directory_url)?,
        out_dir: cli.output_dir.clone(),
    };

    match &cli.command {
        Command::All => {
            let places = places_client(&cli, &client)?;
            let mut progress = BarProgress::default();
            scrape::run_all(&client, places.as_ref(), &opts, Some(&mut progress)).await?;
        }
        Command::Region { code } => {
            let places = places_client(&cli, &client)?;
            let mut progress = BarProgress::default();
            scrape::run_region(&client, places.as_ref(), &opts, code, Some(&mut progress)).await?;
        }
        Command::Zip => {
            let input = cli.output_dir.join(export::COMBINED_FILE);
            let output = cli.output_dir.join(export::COMBINED_ZIP_FILE);
            let count = export::append_zip_column(&input, &output)?;
            log::info!("Wrote {count} rows to {}", output.display());
        }
    }
    Ok(())
}
