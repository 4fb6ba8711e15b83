use std::path::Path;

use crate::error::{Error, Result};
use crate::postal;
use crate::scrape::RoasterRow;

/// Combined output across all regions, in processing order.
pub const COMBINED_FILE: &str = "roasters.csv";
/// Combined output with the derived zip column appended.
pub const COMBINED_ZIP_FILE: &str = "roasters-zip.csv";

/// Column the zip pass reads; located by name, not position.
const ADDRESS_COLUMN: &str = "Roaster Address";
const ZIP_COLUMN: &str = "Roaster Zip Code";

/// Leading row-index column has an empty header name.
const COLUMNS: [&str; 5] = [
    "",
    "Roaster Name",
    "Roaster URL",
    ADDRESS_COLUMN,
    "Region Code",
];

pub fn write_roaster_csv(path: &Path, rows: &[RoasterRow]) -> Result<()> {
    log::debug!("Writing {} rows to {}", rows.len(), path.display());
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for (index, row) in rows.iter().enumerate() {
        writer.write_record([
            index.to_string().as_str(),
            &row.name,
            &row.url,
            row.address.as_deref().unwrap_or(""),
            &row.region_code,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// The standalone zip pass: reads a previously written combined file, derives
/// a zip code per row from the stored address column, and writes the rows
/// back out with a `Roaster Zip Code` column appended. Returns the row count.
pub fn append_zip_column(input: &Path, output: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();
    let address_index = headers
        .iter()
        .position(|header| header == ADDRESS_COLUMN)
        .ok_or_else(|| {
            Error::Schema(format!(
                "{} has no {ADDRESS_COLUMN:?} column",
                input.display()
            ))
        })?;

    let mut writer = csv::Writer::from_path(output)?;
    let mut out_headers = headers.clone();
    out_headers.push_field(ZIP_COLUMN);
    writer.write_record(&out_headers)?;

    let mut count = 0;
    for record in reader.records() {
        let mut record = record?;
        // Empty cells read back as empty strings; treat those as no address.
        let address = record.get(address_index).filter(|cell| !cell.is_empty());
        let zip = postal::zip_code(address);
        record.push_field(zip.as_deref().unwrap_or(""));
        writer.write_record(&record)?;
        count += 1;
    }
    writer.flush()?;
    log::info!("Appended zip codes for {count} rows to {}", output.display());
    Ok(count)
}
