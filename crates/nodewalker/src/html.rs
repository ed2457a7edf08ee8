//! HTML parsing support.
//!
//! Parses HTML strings into the CDP-style [`Node`] tree the walker operates
//! on. Element, text and comment nodes are kept; everything else is dropped.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree.
///
/// The returned root is the `html` element wrapping the fragment.
///
/// # Example
///
/// ```rust
/// use nodewalker::{parse_html, NodeWalker};
///
/// let mut root = parse_html("<div class=\"nodewalker-stop\"><p>Hidden</p></div>");
/// let stats = NodeWalker::new().walk(&mut root);
/// assert_eq!(stats.ignored, 1);
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(tag, attrs);

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Comment(comment) => {
                node.add_child(Node::comment(&comment.comment));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
