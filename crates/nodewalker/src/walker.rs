//! NodeWalker - the main entry point for walking a DOM tree.

use std::sync::Arc;

use crate::classes::has_classes;
use crate::config::{WalkConfig, WalkOptions, WalkerDefaults};
use crate::handlers::{run_handlers, Flow, Handler, HandlerCache};
use crate::node::Node;

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes that went through handler dispatch
    pub visited: usize,
    /// Nodes skipped (with their subtrees) by ignore classes or the router
    pub ignored: usize,
    /// Nodes whose children were skipped because a handler pruned them
    pub pruned: usize,
    /// Handler initializers invoked
    pub handler_runs: usize,
    /// Prefilter lookups answered from the cache
    pub cache_hits: usize,
    /// Prefilter lookups that scanned the handler aggregates
    pub cache_misses: usize,
}

/// Check if a node should be skipped together with its subtree
pub fn should_ignore(node: &Node, config: &WalkConfig) -> bool {
    let class_name = node.class_name();
    if has_classes(class_name, config.ignore_classes()) > 0 {
        return true;
    }
    config
        .router()
        .is_some_and(|router| !router(node, class_name))
}

/// State of one walk in progress
struct Walk<'a> {
    config: &'a WalkConfig,
    cache: Option<HandlerCache>,
    stats: WalkStats,
}

impl Walk<'_> {
    fn visit(&mut self, node: &mut Node) {
        if should_ignore(node, self.config) {
            tracing::trace!(node = %node.node_name, "ignored");
            self.stats.ignored += 1;
            return;
        }

        self.stats.visited += 1;
        let flow = run_handlers(
            node,
            self.config,
            self.cache.as_mut(),
            &mut self.stats.handler_runs,
        );
        if flow == Flow::Prune {
            tracing::trace!(node = %node.node_name, "pruned");
            self.stats.pruned += 1;
            return;
        }

        // Snapshot element children after dispatch, before descending
        let elements: Vec<usize> = node
            .children()
            .enumerate()
            .filter(|(_, child)| child.is_element())
            .map(|(index, _)| index)
            .collect();

        let Some(children) = node.children.as_mut() else {
            return;
        };
        for index in elements {
            if let Some(child) = children.get_mut(index) {
                self.visit(child);
            }
        }
    }

    fn finish(mut self) -> WalkStats {
        if let Some(cache) = &self.cache {
            self.stats.cache_hits = cache.hits();
            self.stats.cache_misses = cache.misses();
        }
        self.stats
    }
}

/// Walks DOM trees and runs matching handlers on their elements.
///
/// The walker owns a [`WalkerDefaults`] registry. Every walk snapshots it,
/// so changing the defaults only affects walks started afterwards.
#[derive(Debug, Clone, Default)]
pub struct NodeWalker {
    defaults: WalkerDefaults,
}

impl NodeWalker {
    /// Create a NodeWalker with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a NodeWalker with custom defaults
    pub fn with_defaults(defaults: WalkerDefaults) -> Self {
        Self { defaults }
    }

    /// Get the current defaults
    pub fn defaults(&self) -> &WalkerDefaults {
        &self.defaults
    }

    /// Get mutable access to defaults
    pub fn defaults_mut(&mut self) -> &mut WalkerDefaults {
        &mut self.defaults
    }

    /// Register a handler that runs in every walk
    pub fn add_handler(&mut self, handler: Handler) -> &mut Self {
        self.defaults.handlers.push(Arc::new(handler));
        self
    }

    /// Add a class token that stops the walker in every walk
    pub fn ignore_class(&mut self, token: &str) -> &mut Self {
        let classes = &mut self.defaults.ignore_classes;
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(token);
        self
    }

    /// Set the default router
    pub fn set_router<F>(&mut self, router: F) -> &mut Self
    where
        F: Fn(&Node, &str) -> bool + Send + Sync + 'static,
    {
        self.defaults.router = Some(Arc::new(router));
        self
    }

    /// Walk `root` with the defaults only
    pub fn walk(&self, root: &mut Node) -> WalkStats {
        self.walk_with(root, WalkOptions::default())
    }

    /// Walk `root` with per-walk overrides
    pub fn walk_with(&self, root: &mut Node, options: WalkOptions) -> WalkStats {
        let config = WalkConfig::build(&self.defaults, options);
        walk_config(root, &config)
    }

    /// Parse an HTML fragment and walk it, returning the resulting tree
    #[cfg(feature = "html")]
    pub fn walk_html(&self, html: &str, options: WalkOptions) -> (Node, WalkStats) {
        let mut root = crate::html::parse_html(html);
        let stats = self.walk_with(&mut root, options);
        (root, stats)
    }
}

/// Walk `root` with an already built configuration
pub fn walk_config(root: &mut Node, config: &WalkConfig) -> WalkStats {
    tracing::debug!(
        root = %root.node_name,
        handlers = config.handlers().len(),
        use_caches = config.use_caches(),
        "walk started"
    );

    let mut walk = Walk {
        config,
        cache: config.use_caches().then(|| config.new_cache()),
        stats: WalkStats::default(),
    };
    walk.visit(root);
    let stats = walk.finish();

    tracing::debug!(?stats, "walk finished");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Handler that records the tag and class of every node it sees
    fn recorder(seen: &Arc<Mutex<Vec<String>>>) -> Handler {
        let seen = seen.clone();
        Handler::new().init(move |node: &mut Node| {
            let label = match node.class_name() {
                "" => node.tag_name(),
                class => format!("{}.{}", node.tag_name(), class),
            };
            seen.lock().unwrap().push(label);
        })
    }

    fn tree() -> Node {
        // <div class="outer">text<p class="skip extra"><a class="x"/></p><!--c--><ul><li/><li/></ul></div>
        let mut p = Node::element_with_class("p", "skip extra");
        p.add_child(Node::element_with_class("a", "x"));
        let mut ul = Node::element("ul");
        ul.add_child(Node::element("li"));
        ul.add_child(Node::element("li"));

        let mut root = Node::element_with_class("div", "outer");
        root.add_child(Node::text("text"));
        root.add_child(p);
        root.add_child(Node::comment("c"));
        root.add_child(ul);
        root
    }

    fn walk_recorded(walker: &NodeWalker, root: &mut Node, options: WalkOptions) -> Vec<String> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        walker.walk_with(root, options.handler(recorder(&seen)));
        let seen = seen.lock().unwrap().clone();
        seen
    }

    #[test]
    fn test_depth_first_document_order() {
        let walker = NodeWalker::new();
        let seen = walk_recorded(&walker, &mut tree(), WalkOptions::new());
        assert_eq!(seen, vec!["div.outer", "p.skip extra", "a.x", "ul", "li", "li"]);
    }

    #[test]
    fn test_ignore_class_skips_subtree() {
        let mut walker = NodeWalker::new();
        walker.ignore_class("skip");

        let mut root = tree();
        let seen = walk_recorded(&walker, &mut root, WalkOptions::new());
        assert_eq!(seen, vec!["div.outer", "ul", "li", "li"]);

        let stats = walker.walk(&mut root);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.visited, 4);
    }

    #[test]
    fn test_ignored_descendant_never_matches() {
        let mut walker = NodeWalker::new();
        walker.ignore_class("skip").add_handler(
            Handler::for_class("x").init(|node: &mut Node| node.set_prop("hit", "1")),
        );

        let mut root = tree();
        walker.walk(&mut root);
        let p = root.element_children().next().unwrap();
        let a = p.element_children().next().unwrap();
        assert_eq!(a.prop("hit"), None);
    }

    #[test]
    fn test_default_ignore_class_on_root() {
        let walker = NodeWalker::new();
        let mut root = Node::element_with_class("div", "nodewalker-stop");
        root.add_child(Node::element("span"));

        let seen = walk_recorded(&walker, &mut root, WalkOptions::new());
        assert!(seen.is_empty());
    }

    #[test]
    fn test_router_false_ignores_subtree() {
        let walker = NodeWalker::new();
        let options = WalkOptions::new().router(|node, _| node.tag_name() != "ul");
        let seen = walk_recorded(&walker, &mut tree(), options);
        assert_eq!(seen, vec!["div.outer", "p.skip extra", "a.x"]);
    }

    #[test]
    fn test_router_receives_class_list() {
        let walker = NodeWalker::new();
        let options = WalkOptions::new().router(|_, class_name| !class_name.contains("extra"));
        let seen = walk_recorded(&walker, &mut tree(), options);
        assert_eq!(seen, vec!["div.outer", "ul", "li", "li"]);
    }

    #[test]
    fn test_prune_skips_children_not_siblings() {
        let mut walker = NodeWalker::new();
        walker.add_handler(Handler::for_tag("p").init(|_: &mut Node| false));

        let mut root = tree();
        let seen = walk_recorded(&walker, &mut root, WalkOptions::new());
        // The recorder runs after the pruning default handler, so `p` itself
        // is not recorded either; the `ul` sibling subtree still is.
        assert_eq!(seen, vec!["div.outer", "ul", "li", "li"]);

        let stats = walker.walk(&mut root);
        assert_eq!(stats.pruned, 1);
        assert_eq!(stats.visited, 5);
    }

    #[test]
    fn test_handler_rewrites_children_before_snapshot() {
        let mut walker = NodeWalker::new();
        walker.add_handler(Handler::for_tag("ul").init(|node: &mut Node| {
            node.add_child(Node::element("li"));
            node.remove_child(0);
        }));

        let mut root = tree();
        let seen = walk_recorded(&walker, &mut root, WalkOptions::new());
        assert_eq!(seen, vec!["div.outer", "p.skip extra", "a.x", "ul", "li", "li"]);

        let ul = root.element_children().nth(1).unwrap();
        assert_eq!(ul.element_children().count(), 2);
    }

    #[test]
    fn test_children_appended_by_handler_are_walked() {
        let mut walker = NodeWalker::new();
        walker.add_handler(Handler::for_tag("li").init(|node: &mut Node| {
            node.add_child(Node::element("em"));
        }));

        let mut root = tree();
        let stats = walker.walk(&mut root);
        // The `em` elements are appended before each `li`'s children are
        // snapshotted, so they are walked as well.
        assert_eq!(stats.visited, 8);
    }

    #[test]
    fn test_multi_token_handlers_are_skipped() {
        let mut walker = NodeWalker::new();
        walker
            .add_handler(Handler::for_tag("di v").init(|node: &mut Node| node.set_prop("bad", "1")))
            .add_handler(Handler::for_tag("div").init(|node: &mut Node| node.set_prop("ran", "1")));

        let mut root = tree();
        let options = WalkOptions::new()
            .handler(Handler::for_class("a b").init(|node: &mut Node| node.set_prop("bad", "1")))
            .handler(Handler::for_tag("li").init(|node: &mut Node| node.set_prop("ran", "1")));
        let stats = walker.walk_with(&mut root, options);

        assert_eq!(root.prop("ran"), Some("1"));
        assert_eq!(root.prop("bad"), None);
        assert_eq!(stats.handler_runs, 3);
    }

    #[test]
    fn test_tab_separated_ignore_classes() {
        let walker = NodeWalker::new();
        let options = WalkOptions::new().ignore_classes("other\tskip");
        let seen = walk_recorded(&walker, &mut tree(), options);
        assert_eq!(seen, vec!["div.outer", "ul", "li", "li"]);
    }

    #[test]
    fn test_defaults_changed_after_walk() {
        let mut walker = NodeWalker::new();
        walker.add_handler(Handler::for_tag("li").init(|node: &mut Node| node.add_class("d")));

        let mut root = tree();
        walker.walk(&mut root);
        walker.add_handler(Handler::for_tag("li").init(|node: &mut Node| node.add_class("late")));

        let ul = root.element_children().nth(1).unwrap();
        for li in ul.element_children() {
            assert_eq!(li.class_name(), "d");
        }
    }

    #[test]
    fn test_cache_stats() {
        let mut walker = NodeWalker::new();
        walker.add_handler(Handler::for_tag("li").init(|_: &mut Node| ()));

        let stats = walker.walk(&mut tree());
        assert_eq!(stats.handler_runs, 2);
        assert!(stats.cache_hits > 0);

        let uncached = walker.walk_with(&mut tree(), WalkOptions::new().use_caches(false));
        assert_eq!(uncached.handler_runs, 2);
        assert_eq!((uncached.cache_hits, uncached.cache_misses), (0, 0));
    }
}
