//! Handler dispatch for a single node.

mod cache;
mod handler;

pub use cache::HandlerCache;
pub use handler::{Flow, Handler, InitFn, Mode};

use crate::config::WalkConfig;
use crate::node::Node;

/// Run every applicable handler on `node`, in order.
///
/// Returns [`Flow::Prune`] as soon as an initializer asks for it; later
/// handlers do not run and the caller must not descend into the node.
/// `runs` is incremented for every initializer invoked.
pub fn run_handlers(
    node: &mut Node,
    config: &WalkConfig,
    cache: Option<&mut HandlerCache>,
    runs: &mut usize,
) -> Flow {
    let handlers = config.handlers();
    if handlers.is_empty() {
        return Flow::Continue;
    }

    let tag = node.tag_name();

    if let Some(cache) = cache {
        if !cache.may_match(&tag, node.class_name()) {
            return Flow::Continue;
        }
    }

    for handler in handlers {
        // Re-read the class list: an earlier initializer may have changed it
        if !handler.matches(&tag, node.class_name()) || !handler.has_init() {
            continue;
        }

        *runs += 1;
        if handler.run(node) == Flow::Prune {
            return Flow::Prune;
        }
    }

    Flow::Continue
}
