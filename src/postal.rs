use std::sync::LazyLock;

use regex::Regex;

/// A 5-digit US zip code, optionally with the 4-digit extension.
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{5}(?:-[0-9]{4})?").expect("pattern is valid"));

/// Extracts the zip code from a formatted address, if any.
///
/// When several zip-shaped substrings appear, the LAST one in reading order
/// wins: formatted addresses end with the postal code, and street numbers or
/// box numbers earlier in the string can also look like zips.
pub fn zip_code(address: Option<&str>) -> Option<String> {
    let address = address?;
    let zip = ZIP_RE
        .find_iter(address)
        .last()
        .map(|m| m.as_str().to_string());
    log::debug!("Address: {address:?}\tZip extracted: {zip:?}");
    zip
}
