//! Per-walk handler prefilter.
//!
//! Pages tend to repeat the same class attributes over and over. The cache
//! joins every handler's tag and class into two aggregate strings and
//! remembers, per distinct class string and tag, whether anything in the
//! aggregate could match. Nodes that hit nothing skip the handler scan.

use indexmap::IndexMap;

use super::handler::{Handler, Mode};
use crate::classes::{has_class, has_classes};

/// Aggregate tag/class sets plus memoized lookups for one walk
#[derive(Debug, Default)]
pub struct HandlerCache {
    /// Space-joined tag names of all handlers
    tag_names: String,
    /// Space-joined class names of all handlers
    class_names: String,
    /// Class string → any token in `class_names`
    class_searches: IndexMap<String, bool>,
    /// Tag → listed in `tag_names`
    tag_searches: IndexMap<String, bool>,
    /// Set when an AND handler without constraints matches every node
    matches_everything: bool,
    hits: usize,
    misses: usize,
}

impl HandlerCache {
    /// Build the aggregates from the active handlers
    pub fn new<'a>(handlers: impl IntoIterator<Item = &'a Handler>) -> Self {
        let mut cache = Self::default();

        for handler in handlers {
            if let Some(tag) = handler.tag_name() {
                cache.tag_names.push_str(tag);
                cache.tag_names.push(' ');
            }
            if let Some(class_name) = handler.class_name() {
                cache.class_names.push_str(class_name);
                cache.class_names.push(' ');
            }
            if handler.is_unconstrained() && handler.match_mode() == Mode::And {
                cache.matches_everything = true;
            }
        }

        cache
    }

    pub fn tag_names(&self) -> &str {
        &self.tag_names
    }

    pub fn class_names(&self) -> &str {
        &self.class_names
    }

    /// True when the prefilter is disabled because some handler matches
    /// every node
    pub fn matches_everything(&self) -> bool {
        self.matches_everything
    }

    /// Check whether any handler could apply to a node with this tag and
    /// class list. False means no handler can match.
    pub fn may_match(&mut self, tag: &str, class_list: &str) -> bool {
        if self.matches_everything {
            return true;
        }

        let class_match = !class_list.is_empty() && self.search_class(class_list);
        let tag_match = !tag.is_empty() && self.search_tag(tag);
        class_match || tag_match
    }

    /// Number of lookups answered from the memo maps
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups that scanned the aggregates
    pub fn misses(&self) -> usize {
        self.misses
    }

    fn search_class(&mut self, class_list: &str) -> bool {
        if let Some(&found) = self.class_searches.get(class_list) {
            self.hits += 1;
            return found;
        }

        let found = has_classes(&self.class_names, class_list) > 0;
        tracing::trace!(class_list, found, "class prefilter miss");
        self.misses += 1;
        self.class_searches.insert(class_list.to_string(), found);
        found
    }

    fn search_tag(&mut self, tag: &str) -> bool {
        if let Some(&found) = self.tag_searches.get(tag) {
            self.hits += 1;
            return found;
        }

        let found = has_class(&self.tag_names, tag);
        tracing::trace!(tag, found, "tag prefilter miss");
        self.misses += 1;
        self.tag_searches.insert(tag.to_string(), found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handlers() -> Vec<Handler> {
        vec![
            Handler::for_tag("div").class("make-green"),
            Handler::for_tag("form").class("form").mode(Mode::Or),
            Handler::for_tag("div"),
        ]
    }

    #[test]
    fn test_aggregates() {
        let handlers = handlers();
        let cache = HandlerCache::new(&handlers);
        assert_eq!(cache.tag_names(), "div form div ");
        assert_eq!(cache.class_names(), "make-green form ");
        assert!(!cache.matches_everything());
    }

    #[test]
    fn test_prefilter() {
        let handlers = handlers();
        let mut cache = HandlerCache::new(&handlers);
        assert!(cache.may_match("div", ""));
        assert!(cache.may_match("span", "x make-green"));
        assert!(!cache.may_match("span", "x y"));
        assert!(!cache.may_match("span", ""));
    }

    #[test]
    fn test_memoizes_per_distinct_string() {
        let handlers = handlers();
        let mut cache = HandlerCache::new(&handlers);
        for _ in 0..3 {
            cache.may_match("span", "x y");
        }
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 4);
    }

    #[test]
    fn test_unconstrained_and_handler_disables_prefilter() {
        let handlers = vec![Handler::for_class("x"), Handler::new()];
        let mut cache = HandlerCache::new(&handlers);
        assert!(cache.matches_everything());
        assert!(cache.may_match("span", ""));
    }

    #[test]
    fn test_unconstrained_or_handler_keeps_prefilter() {
        let handlers = vec![Handler::new().mode(Mode::Or)];
        let mut cache = HandlerCache::new(&handlers);
        assert!(!cache.matches_everything());
        assert!(!cache.may_match("span", "x"));
    }
}
