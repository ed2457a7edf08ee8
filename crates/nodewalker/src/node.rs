//! CDP-style DOM Node structure walked by [`NodeWalker`](crate::NodeWalker).
//!
//! The layout follows the Chrome DevTools Protocol DOM.Node structure so any
//! parser (html5ever, CDP, etc.) can hand its output to the walker. On top of
//! that, nodes carry a property bag that handlers can use to stash state on
//! the elements they touch.

use indexmap::IndexMap;

use crate::classes::has_class;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    /// Only present for element nodes
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,

    /// Free-form properties set by the host or by handlers
    pub properties: IndexMap<String, String>,
}

impl Node {
    fn new(node_type: NodeType, node_name: String) -> Self {
        Self {
            node_type,
            node_name,
            node_value: None,
            attributes: None,
            children: None,
            properties: IndexMap::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
            ..Self::new(NodeType::Element, tag_name.to_uppercase())
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let flat_attrs: Vec<String> = attrs
            .into_iter()
            .flat_map(|(k, v)| [k.to_string(), v.to_string()])
            .collect();

        Self {
            attributes: Some(flat_attrs),
            ..Self::element(tag_name)
        }
    }

    /// Create a new element node with a class attribute
    pub fn element_with_class(tag_name: &str, class_name: &str) -> Self {
        Self::element_with_attrs(tag_name, vec![("class", class_name)])
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_value: Some(content.to_string()),
            ..Self::new(NodeType::Text, "#text".to_string())
        }
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_value: Some(content.to_string()),
            ..Self::new(NodeType::Comment, "#comment".to_string())
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;

        // CDP stores attributes as flat array: [name, value, name, value, ...]
        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);

        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let attrs = self.attributes.as_mut()?;
        let pos = attrs
            .chunks_exact(2)
            .position(|pair| pair[0].eq_ignore_ascii_case(name))?;
        let mut removed = attrs.drain(pos * 2..pos * 2 + 2);
        removed.nth(1)
    }

    /// The class list as written in the `class` attribute ("" when absent)
    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Replace the class list
    pub fn set_class_name(&mut self, class_name: &str) {
        self.set_attr("class", class_name);
    }

    /// Check whether the class list contains `token`
    pub fn has_class(&self, token: &str) -> bool {
        has_class(self.class_name(), token)
    }

    /// Append `token` to the class list unless it is already present
    pub fn add_class(&mut self, token: &str) {
        if token.is_empty() || self.has_class(token) {
            return;
        }
        let class_name = match self.class_name().trim_end() {
            "" => token.to_string(),
            current => format!("{} {}", current, token),
        };
        self.set_class_name(&class_name);
    }

    /// Remove every occurrence of `token` from the class list
    pub fn remove_class(&mut self, token: &str) {
        if !self.has_class(token) {
            return;
        }
        let class_name = self
            .class_name()
            .split_whitespace()
            .filter(|t| *t != token)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_class_name(&class_name);
    }

    /// Get a property value
    pub fn prop(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Set a property value
    pub fn set_prop(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_string(), value.into());
    }

    /// Get an inline style declaration (e.g. `background-color`)
    pub fn style(&self, property: &str) -> Option<&str> {
        self.attr("style")?
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(property))
            .map(|(_, value)| value.trim())
    }

    /// Set an inline style declaration, replacing an existing one
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut decls: Vec<(String, String)> = self
            .attr("style")
            .unwrap_or("")
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        match decls
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
        {
            Some(decl) => decl.1 = value.to_string(),
            None => decls.push((property.to_string(), value.to_string())),
        }

        let style = decls
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr("style", &style);
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Get mutable access to only element children
    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.children
            .iter_mut()
            .flat_map(|c| c.iter_mut())
            .filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Remove and return the child at `index`
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        let children = self.children.as_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            NodeType::Element => self.children().map(|child| child.text_content()).collect(),
        }
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => {
                format!("<!--{}-->", self.node_value.as_deref().unwrap_or(""))
            }
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if self.is_void_element() {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(|child| child.outer_html()).collect()
    }

    /// Get attributes as a string for HTML output
    fn attributes_string(&self) -> String {
        let Some(ref attrs) = self.attributes else {
            return String::new();
        };

        attrs
            .chunks_exact(2)
            .map(|pair| {
                if pair[1].is_empty() {
                    pair[0].clone()
                } else {
                    format!("{}=\"{}\"", pair[0], escape_html_attr(&pair[1]))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if this is a void element
    fn is_void_element(&self) -> bool {
        const VOID_ELEMENTS: &[&str] = &[
            "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen",
            "link", "meta", "param", "source", "track", "wbr",
        ];
        VOID_ELEMENTS.contains(&self.tag_name().as_str())
    }
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
