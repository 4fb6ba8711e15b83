use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default directory page listing every region.
const DIRECTORY_URL: &str = "https://coffeebeaned.com/coffee-roaster-list/";

#[derive(Parser, Debug)]
#[command(name = "roaster_list")]
#[command(about = "Scrapes a coffee roaster directory into CSV files, one per region plus a combined file")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory page to scrape for the region list
    #[arg(long, default_value = DIRECTORY_URL, global = true)]
    pub directory_url: String,

    /// Directory the CSV files are written to
    #[arg(short, long, default_value = "output", global = true)]
    pub output_dir: PathBuf,

    /// Scrape names and URLs only, without place-lookup enrichment
    #[arg(long, global = true)]
    pub skip_addresses: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape every region, writing per-region files and the combined file
    All,
    /// Scrape a single region by its code as listed on the directory page
    Region {
        /// Region code, e.g. "California"
        code: String,
    },
    /// Derive zip codes from the combined file's address column
    Zip,
}
