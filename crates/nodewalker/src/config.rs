//! Walker configuration: the long-lived defaults registry, per-walk
//! overrides, and the merged snapshot a walk actually runs with.

use std::fmt;
use std::sync::Arc;

use crate::handlers::{Handler, HandlerCache};
use crate::node::Node;

/// Class token that stops the walker by default
pub const DEFAULT_IGNORE_CLASS: &str = "nodewalker-stop";

/// Predicate deciding whether a node (and its subtree) is walked.
/// Receives the node and its class list; returning `false` ignores it.
pub type Router = Arc<dyn Fn(&Node, &str) -> bool + Send + Sync>;

/// Defaults shared by every walk of a [`NodeWalker`](crate::NodeWalker).
///
/// Set these up before walking; each walk takes its own snapshot.
#[derive(Clone)]
pub struct WalkerDefaults {
    /// Whitespace-delimited class tokens that stop the walker
    pub ignore_classes: String,

    /// Build a [`HandlerCache`] for each walk
    pub use_caches: bool,

    /// Handlers that run before any per-walk handlers
    pub handlers: Vec<Arc<Handler>>,

    /// Optional node router
    pub router: Option<Router>,
}

impl Default for WalkerDefaults {
    fn default() -> Self {
        Self {
            ignore_classes: DEFAULT_IGNORE_CLASS.to_string(),
            use_caches: true,
            handlers: Vec::new(),
            router: None,
        }
    }
}

impl fmt::Debug for WalkerDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkerDefaults")
            .field("ignore_classes", &self.ignore_classes)
            .field("use_caches", &self.use_caches)
            .field("handlers", &self.handlers)
            .field("router", &self.router.is_some())
            .finish()
    }
}

/// Overrides for a single walk. Unset fields fall back to the defaults;
/// handlers are appended after the default handlers.
#[derive(Clone, Default)]
pub struct WalkOptions {
    pub ignore_classes: Option<String>,
    pub use_caches: Option<bool>,
    pub handlers: Vec<Arc<Handler>>,
    pub router: Option<Router>,
}

impl WalkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ignore classes for this walk
    pub fn ignore_classes(mut self, classes: &str) -> Self {
        self.ignore_classes = Some(classes.to_string());
        self
    }

    pub fn use_caches(mut self, use_caches: bool) -> Self {
        self.use_caches = Some(use_caches);
        self
    }

    /// Append a handler for this walk
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Append an already shared handler for this walk
    pub fn shared_handler(mut self, handler: Arc<Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn router<F>(mut self, router: F) -> Self
    where
        F: Fn(&Node, &str) -> bool + Send + Sync + 'static,
    {
        self.router = Some(Arc::new(router));
        self
    }
}

/// The merged, immutable configuration of one walk
#[derive(Clone)]
pub struct WalkConfig {
    ignore_classes: String,
    use_caches: bool,
    handlers: Vec<Arc<Handler>>,
    router: Option<Router>,
}

impl WalkConfig {
    /// Merge `options` over `defaults`.
    ///
    /// The handler list is a fresh copy: default handlers first, then the
    /// handlers from `options`, each group in insertion order. Handlers whose
    /// tag or class name is not a single token are left out.
    pub fn build(defaults: &WalkerDefaults, options: WalkOptions) -> Self {
        let handlers = defaults
            .handlers
            .iter()
            .cloned()
            .chain(options.handlers)
            .filter(|handler| is_well_formed(handler))
            .collect();

        Self {
            ignore_classes: options
                .ignore_classes
                .unwrap_or_else(|| defaults.ignore_classes.clone()),
            use_caches: options.use_caches.unwrap_or(defaults.use_caches),
            handlers,
            router: options.router.or_else(|| defaults.router.clone()),
        }
    }

    pub fn ignore_classes(&self) -> &str {
        &self.ignore_classes
    }

    pub fn use_caches(&self) -> bool {
        self.use_caches
    }

    pub fn handlers(&self) -> &[Arc<Handler>] {
        &self.handlers
    }

    pub fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    /// Build a fresh prefilter over this config's handlers
    pub fn new_cache(&self) -> HandlerCache {
        HandlerCache::new(self.handlers.iter().map(|h| &**h))
    }
}

impl fmt::Debug for WalkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkConfig")
            .field("ignore_classes", &self.ignore_classes)
            .field("use_caches", &self.use_caches)
            .field("handlers", &self.handlers)
            .field("router", &self.router.is_some())
            .finish()
    }
}

/// Tag and class constraints must be single tokens
fn is_well_formed(handler: &Handler) -> bool {
    let names = [handler.tag_name(), handler.class_name()];
    let well_formed = names
        .into_iter()
        .flatten()
        .all(|name| !name.chars().any(char::is_whitespace));

    if !well_formed {
        tracing::debug!(?handler, "skipping handler with a multi-token name");
    }
    well_formed
}
