use indexmap::IndexMap;
use scraper::ElementRef;
use url::Url;

use crate::parse::Error;
use crate::static_selector;

/// Regions listed on the directory page, in page order. Codes are the
/// anchors' visible text (state names); uniqueness is whatever the page
/// provides, with later duplicates overwriting earlier values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Regions {
    regions: IndexMap<String, Url>,
}

impl Regions {
    pub fn from_html_element(element: ElementRef, base: &Url) -> Result<Self, Error> {
        static_selector!(STATE_LIST_SELECTOR <- "div.state-list");
        static_selector!(REGION_LINK_SELECTOR <- "a");

        let Some(list) = element.select(&STATE_LIST_SELECTOR).next() else {
            return Err(Error::html_parse_error("state list container not found"));
        };

        let mut regions = IndexMap::new();
        for link in list.select(&REGION_LINK_SELECTOR) {
            // Anchors without a usable href are skipped, not errors.
            let Some(href) = link.attr("href") else {
                continue;
            };
            let Ok(url) = base.join(href) else {
                log::debug!("Skipping region link with unparsable href {href:?}");
                continue;
            };
            let code = link.text().collect::<String>().trim().to_string();
            regions.insert(code, url);
        }

        Ok(Self { regions })
    }

    pub fn get(&self, code: &str) -> Option<&Url> {
        self.regions.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Url> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
