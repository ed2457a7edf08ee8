//! Handler, Mode and Flow types.

use std::fmt;
use std::sync::Arc;

use crate::classes::has_class;
use crate::node::Node;

/// Type alias for handler initializers
pub type InitFn = Arc<dyn Fn(&mut Node) -> Flow + Send + Sync>;

/// How a handler combines its tag and class constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Either constraint is enough; an unconstrained handler never matches
    Or,
    /// Every given constraint must hold; an unconstrained handler always matches
    #[default]
    And,
}

/// What the walker does after a handler ran on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep dispatching and descend into the children
    #[default]
    Continue,
    /// Skip the remaining handlers and the node's children
    Prune,
}

impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

impl From<bool> for Flow {
    fn from(descend: bool) -> Self {
        if descend {
            Flow::Continue
        } else {
            Flow::Prune
        }
    }
}

/// A handler runs its initializer on every node it matches.
///
/// ```rust
/// use nodewalker::{Handler, Mode};
///
/// let handler = Handler::new()
///     .tag("form")
///     .class("form")
///     .mode(Mode::Or)
///     .init(|node| node.set_prop("seen", "yes"));
/// assert!(handler.matches("form", ""));
/// assert!(handler.matches("div", "form wide"));
/// ```
#[derive(Clone, Default)]
pub struct Handler {
    tag_name: Option<String>,
    class_name: Option<String>,
    mode: Mode,
    init: Option<InitFn>,
}

impl Handler {
    /// Create an unconstrained handler without an initializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that matches a single tag
    pub fn for_tag(tag: &str) -> Self {
        Self::new().tag(tag)
    }

    /// Create a handler that matches a single class token
    pub fn for_class(class_name: &str) -> Self {
        Self::new().class(class_name)
    }

    /// Constrain by tag name (case-insensitive, "" means unconstrained)
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = (!tag.is_empty()).then(|| tag.to_lowercase());
        self
    }

    /// Constrain by class token ("" means unconstrained)
    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = (!class_name.is_empty()).then(|| class_name.to_string());
        self
    }

    /// Set how the tag and class constraints combine
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the initializer.
    ///
    /// The closure may return `()`, a [`Flow`], or a `bool` where `false`
    /// prunes the node's subtree.
    pub fn init<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&mut Node) -> R + Send + Sync + 'static,
        R: Into<Flow> + 'static,
    {
        self.init = Some(Arc::new(move |node: &mut Node| f(node).into()));
        self
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn match_mode(&self) -> Mode {
        self.mode
    }

    /// True when the handler has neither a tag nor a class constraint
    pub fn is_unconstrained(&self) -> bool {
        self.tag_name.is_none() && self.class_name.is_none()
    }

    /// Check if this handler applies to a node with the given lowercase tag
    /// and class list
    pub fn matches(&self, tag: &str, class_list: &str) -> bool {
        let tag_equals = self.tag_name.as_deref().map(|t| t == tag);
        let class_matches = self.class_name.as_deref().map(|c| has_class(class_list, c));

        match self.mode {
            Mode::Or => class_matches.unwrap_or(false) || tag_equals.unwrap_or(false),
            Mode::And => class_matches.unwrap_or(true) && tag_equals.unwrap_or(true),
        }
    }

    /// Run the initializer on `node`; a handler without one continues
    pub fn run(&self, node: &mut Node) -> Flow {
        match &self.init {
            Some(init) => init(node),
            None => Flow::Continue,
        }
    }

    pub(crate) fn has_init(&self) -> bool {
        self.init.is_some()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("tag_name", &self.tag_name)
            .field("class_name", &self.class_name)
            .field("mode", &self.mode)
            .field("init", &self.init.is_some())
            .finish()
    }
}
