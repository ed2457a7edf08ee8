//! # nodewalker
//!
//! Walk a DOM tree depth-first and run matching handlers on its elements.
//!
//! A [`Handler`] constrains the nodes it applies to by tag name, by a single
//! class token, or both, combined with [`Mode::And`] (the default) or
//! [`Mode::Or`]. Its initializer receives the matched node and may return
//! [`Flow::Prune`] to keep the walker out of that node's subtree.
//!
//! ## Design
//!
//! - **Explicit defaults**: a [`NodeWalker`] owns its [`WalkerDefaults`];
//!   every walk merges per-walk [`WalkOptions`] over a snapshot of them
//! - **Ignore classes and routers**: whole subtrees are skipped before any
//!   handler runs
//! - **Prefilter**: repeated class attributes are checked against all
//!   handlers once per walk, not once per node
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use nodewalker::{Handler, Node, NodeWalker, WalkOptions};
//!
//! let mut walker = NodeWalker::new();
//! walker.add_handler(
//!     Handler::for_class("make-green").init(|node| node.set_style("background-color", "green")),
//! );
//!
//! let mut div = Node::element_with_class("div", "make-green");
//! div.add_child(Node::element("span"));
//!
//! let stats = walker.walk_with(&mut div, WalkOptions::new());
//! assert_eq!(div.style("background-color"), Some("green"));
//! assert_eq!(stats.visited, 2);
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use nodewalker::{Handler, NodeWalker, WalkOptions};
//!
//! let walker = NodeWalker::new();
//! let options = WalkOptions::new().handler(Handler::for_tag("p").init(|node| node.add_class("seen")));
//! let (root, _) = walker.walk_html("<p>Hello</p>", options);
//! assert!(root.inner_html().contains("<p class=\"seen\">Hello</p>"));
//! ```

mod classes;
mod config;
mod handlers;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod walker;

pub use classes::{has_class, has_classes};
pub use config::{Router, WalkConfig, WalkOptions, WalkerDefaults, DEFAULT_IGNORE_CLASS};
pub use handlers::{run_handlers, Flow, Handler, HandlerCache, InitFn, Mode};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeType};
pub use walker::{should_ignore, walk_config, NodeWalker, WalkStats};
