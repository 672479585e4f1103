//! Plain text fallbacks for `org.matrix.custom.html` formatted bodies.

use scraper::Html;

/// Strips markup from `html`, keeping the text with its entities decoded.
pub fn to_plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}
