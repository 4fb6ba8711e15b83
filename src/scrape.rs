use std::fs;
use std::path::PathBuf;

use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::export;
use crate::fetch;
use crate::geocode::PlacesClient;
use crate::parse::{Regions, RoasterTable};
use crate::progress::Progress;

pub struct ScrapeOptions {
    pub directory_url: Url,
    pub out_dir: PathBuf,
}

/// One output row: a roaster tagged with the region it was listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoasterRow {
    pub name: String,
    pub url: String,
    pub address: Option<String>,
    pub region_code: String,
}

pub async fn fetch_regions(client: &Client, directory_url: &Url) -> Result<Regions> {
    let page = fetch::page_text(client, directory_url).await?;
    let regions = {
        let document = scraper::Html::parse_document(&page);
        Regions::from_html_element(document.root_element(), directory_url)?
    };
    if regions.is_empty() {
        log::warn!("No regions found on the directory page.");
    }
    log::info!("Found {} regions.", regions.len());
    Ok(regions)
}

/// Scrapes one region page and resolves an address per roaster, in page
/// order. With no places client the address column stays empty.
pub async fn collect_region(
    client: &Client,
    places: Option<&PlacesClient>,
    code: &str,
    url: &Url,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Vec<RoasterRow>> {
    log::info!("Processing {code}.");
    let page = fetch::page_text(client, url).await?;
    let roasters = {
        let document = scraper::Html::parse_document(&page);
        RoasterTable::from_html_element(document.root_element())?
    };
    if roasters.is_empty() {
        log::warn!("No roasters found in {code}.");
    }
    log::info!("Found {} roasters in {code}.", roasters.len());

    if let Some(p) = progress.as_deref_mut() {
        p.begin(roasters.len());
        if places.is_some() {
            p.log(&format!("Resolving addresses in {code}..."));
        }
    }
    let mut rows = Vec::with_capacity(roasters.len());
    for (name, roaster_url) in roasters.iter() {
        let address = match places {
            Some(places) => {
                places
                    .find_address(&format!("{name}, {code}, USA"))
                    .await?
            }
            None => None,
        };
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(name);
        }
        rows.push(RoasterRow {
            name: name.clone(),
            url: roaster_url.clone(),
            address,
            region_code: code.to_string(),
        });
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(rows)
}

/// Scrapes every region: one CSV per region written as soon as the region
/// finishes, and the combined CSV rewritten after every region so partial
/// progress survives a later failure.
pub async fn run_all(
    client: &Client,
    places: Option<&PlacesClient>,
    opts: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<()> {
    let regions = fetch_regions(client, &opts.directory_url).await?;
    fs::create_dir_all(&opts.out_dir)?;

    // Accumulator for the combined file, owned here and nowhere else.
    let mut combined: Vec<RoasterRow> = Vec::new();
    for (code, url) in regions.iter() {
        let rows = collect_region(client, places, code, url, progress.as_deref_mut()).await?;
        export::write_roaster_csv(&opts.out_dir.join(format!("{code}.csv")), &rows)?;
        combined.extend(rows);
        export::write_roaster_csv(&opts.out_dir.join(export::COMBINED_FILE), &combined)?;
    }
    log::info!(
        "Wrote {} roasters across {} regions to {}",
        combined.len(),
        regions.len(),
        opts.out_dir.display()
    );
    Ok(())
}

/// Scrapes a single region by code. An unknown code is reported together
/// with the known codes and does not error past the command boundary.
pub async fn run_region(
    client: &Client,
    places: Option<&PlacesClient>,
    opts: &ScrapeOptions,
    code: &str,
    progress: Option<&mut dyn Progress>,
) -> Result<()> {
    let regions = fetch_regions(client, &opts.directory_url).await?;
    let Some(url) = regions.get(code) else {
        let known = regions.codes().collect::<Vec<_>>().join(", ");
        log::error!("Region {code:?} not found. Known regions: {known}");
        return Ok(());
    };
    let rows = collect_region(client, places, code, url, progress).await?;
    fs::create_dir_all(&opts.out_dir)?;
    export::write_roaster_csv(&opts.out_dir.join(format!("{code}.csv")), &rows)?;
    Ok(())
}
