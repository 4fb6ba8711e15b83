mod error;
pub use error::Error;
mod directory_page;
mod region_page;

pub use directory_page::Regions;
pub use region_page::RoasterTable;

/// Declares a lazily parsed `scraper::Selector` from a literal. The literal
/// is validated once on first use.
#[macro_export]
macro_rules! static_selector {
    ($name:ident <- $sel:literal) => {
        static $name: ::std::sync::LazyLock<::scraper::Selector> =
            ::std::sync::LazyLock::new(|| match ::scraper::Selector::parse($sel) {
                Ok(selector) => selector,
                Err(e) => panic!("error parsing static selector {}: {:?}", $sel, e),
            });
    };
}
