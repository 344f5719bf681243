//! Element tree navigation helpers

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// The element itself or its nearest ancestor matching `selector`
#[must_use]
pub fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| selector.matches(candidate))
}

/// Position of `node` among all matches of `selector` in document order
#[must_use]
pub fn match_ordinal(document: &Html, selector: &Selector, node: NodeId) -> Option<usize> {
    document.select(selector).position(|el| el.id() == node)
}

/// Outer HTML of the `ordinal`-th match of `selector`
#[must_use]
pub fn nth_match_html(html: &str, selector: &Selector, ordinal: usize) -> Option<String> {
    let document = Html::parse_document(html);
    document.select(selector).nth(ordinal).map(|el| el.html())
}
