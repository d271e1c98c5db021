//! Element construction from a tag name and a flat property set.

use super::{parse_fragment, DomNode};

/// Builds a detached element: generic attributes, a nested style map
/// flattened into the `style` attribute, text children, and raw markup
/// parsed into children.
#[derive(Debug)]
pub struct ElementBuilder {
    node: DomNode,
}

impl ElementBuilder {
    pub fn new(tag: &str) -> Self {
        Self {
            node: DomNode::new_element(tag),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node.set_attr(name, value);
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    /// Apply style properties as individual declarations, preserving any
    /// already-set `style` attribute.
    pub fn style(mut self, properties: &[(&str, &str)]) -> Self {
        let mut style = self
            .node
            .get_attr("style")
            .unwrap_or("")
            .trim()
            .trim_end_matches(';')
            .to_string();
        for (name, value) in properties {
            if !style.is_empty() {
                style.push_str("; ");
            }
            style.push_str(name);
            style.push_str(": ");
            style.push_str(value);
        }
        self.node.set_attr("style", &style);
        self
    }

    /// Append a text child.
    pub fn text(mut self, text: &str) -> Self {
        self.node.children.push(DomNode::new_text(text));
        self
    }

    /// Parse raw markup and append the resulting nodes as children.
    pub fn markup(mut self, html: &str) -> Self {
        let fragment = parse_fragment(html);
        self.node.children.extend(fragment.children);
        self
    }

    /// Append an existing node as a child.
    pub fn child(mut self, child: DomNode) -> Self {
        self.node.children.push(child);
        self
    }

    pub fn build(self) -> DomNode {
        self.node
    }
}
