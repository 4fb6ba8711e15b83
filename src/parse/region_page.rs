use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use scraper::ElementRef;

use crate::parse::Error;
use crate::static_selector;

/// Class attribute pattern marking the roaster table on a region page.
static TABLEPRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)tablepress tablepress-").expect("pattern is valid"));

/// Roasters listed in one region's table, in page order, keyed by name.
/// A duplicate name on the same page overwrites the earlier URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoasterTable {
    roasters: IndexMap<String, String>,
}

impl RoasterTable {
    pub fn from_html_element(element: ElementRef) -> Result<Self, Error> {
        static_selector!(CLASSED_SELECTOR <- "[class]");
        static_selector!(ROASTER_LINK_SELECTOR <- "a.crl2");

        // CSS cannot express "class attribute matches this pattern", so scan
        // classed elements in document order for the first match.
        let Some(table) = element.select(&CLASSED_SELECTOR).find(|el| {
            el.attr("class")
                .is_some_and(|class| TABLEPRESS_RE.is_match(class))
        }) else {
            return Err(Error::html_parse_error("roaster table not found"));
        };

        let mut roasters = IndexMap::new();
        for link in table.select(&ROASTER_LINK_SELECTOR) {
            // Same tolerance as the region list: href-less anchors are skipped.
            let Some(href) = link.attr("href") else {
                continue;
            };
            let name = link.text().collect::<String>().trim().to_string();
            roasters.insert(name, href.to_string());
        }

        Ok(Self { roasters })
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.roasters.iter()
    }

    pub fn len(&self) -> usize {
        self.roasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roasters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_html_element() {
        let html = fs::read_to_string("./src/parse/html_examples/region/tablepress.html").unwrap();
        let document = scraper::Html::parse_document(&html);
        let roasters = RoasterTable::from_html_element(document.root_element())
            .expect("the example html should be valid");
        // Two marked anchors carry hrefs; the href-less one and the plain
        // city link are ignored.
        assert_eq!(roasters.len(), 2);
        let entries: Vec<(&str, &str)> = roasters
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
            .collect();
        assert_eq!(
            entries,
            [
                ("Acme Coffee", "http://acme.test"),
                ("Bean Supreme", "https://beansupreme.test/"),
            ]
        );
    }

    #[test]
    fn test_class_pattern_is_case_insensitive() {
        let document = scraper::Html::parse_document(
            r#"<html><body>
                <table class="TABLEPRESS TablePress-id-3">
                    <tr><td><a class="crl2" href="http://ridge.test">Ridge Roast</a></td></tr>
                </table>
            </body></html>"#,
        );
        let roasters = RoasterTable::from_html_element(document.root_element()).unwrap();
        assert_eq!(roasters.len(), 1);
    }

    #[test]
    fn test_first_matching_table_wins() {
        let document = scraper::Html::parse_document(
            r#"<html><body>
                <table class="tablepress tablepress-id-1">
                    <tr><td><a class="crl2" href="http://first.test">First</a></td></tr>
                </table>
                <table class="tablepress tablepress-id-2">
                    <tr><td><a class="crl2" href="http://second.test">Second</a></td></tr>
                </table>
            </body></html>"#,
        );
        let roasters = RoasterTable::from_html_element(document.root_element()).unwrap();
        let entries: Vec<&str> = roasters.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(entries, ["First"]);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let document = scraper::Html::parse_document(
            r#"<html><body><div class="entry-content">nothing here</div></body></html>"#,
        );
        let err = RoasterTable::from_html_element(document.root_element()).unwrap_err();
        assert!(err.to_string().contains("roaster table"));
    }
}
