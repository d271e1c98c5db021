use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;

pub mod build;
pub mod place;

/// A node in our DOM tree. Owned and detached, no live-document references.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Element,
    Text,
    Document,
}

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is serialized verbatim (no entity escaping).
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Elements that introduce a line break in extracted text.
const LINE_BREAK_TAGS: &[&str] = &["br", "div", "li", "p", "pre", "tr"];

impl DomNode {
    pub fn new_element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Element,
        }
    }

    pub fn new_text(text: &str) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: text.to_string(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    pub fn new_document() -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Document,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Whether the `class` attribute contains the given class token.
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    /// Get the visible text content of this node and all children,
    /// whitespace-normalized.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => {
                let trimmed = self.text.trim();
                if !trimmed.is_empty() {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(trimmed);
                }
            }
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Get the text content with whitespace preserved. Block-level children
    /// contribute a line break, so code rendered one line per row comes out
    /// one line per row.
    pub fn raw_text(&self) -> String {
        let mut result = String::new();
        self.collect_raw_text(&mut result);
        result
    }

    fn collect_raw_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(&self.text),
            _ => {
                for child in &self.children {
                    child.collect_raw_text(out);
                }
                if LINE_BREAK_TAGS.contains(&self.tag.as_str()) && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    /// First node (self included, preorder) matching the predicate.
    pub fn find_first(&self, pred: &dyn Fn(&DomNode) -> bool) -> Option<&DomNode> {
        if pred(self) {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find_first(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All nodes (self included, preorder) matching the predicate.
    pub fn find_all(&self, pred: &dyn Fn(&DomNode) -> bool) -> Vec<&DomNode> {
        let mut found = Vec::new();
        self.collect_matches(pred, &mut found);
        found
    }

    fn collect_matches<'a>(&'a self, pred: &dyn Fn(&DomNode) -> bool, out: &mut Vec<&'a DomNode>) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_matches(pred, out);
        }
    }

    pub fn find_first_by_class(&self, class: &str) -> Option<&DomNode> {
        self.find_first(&|n| n.node_type == NodeType::Element && n.has_class(class))
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<&DomNode> {
        self.find_all(&|n| n.node_type == NodeType::Element && n.has_class(class))
    }

    /// Serialize this node to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize_node(self, &mut out);
        out
    }

    /// Serialize the children only (the node's inner markup).
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            serialize_node(child, &mut out);
        }
        out
    }
}

/// Parse an HTML string into a DomNode tree rooted at the document.
pub fn parse_html(html: &str) -> DomNode {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .expect("failed to parse HTML");

    convert_node(&dom.document)
}

/// Parse a markup fragment. The tree builder wraps fragments in a full
/// document; this re-roots the body's children under a detached container.
pub fn parse_fragment(html: &str) -> DomNode {
    let doc = parse_html(html);
    let mut container = DomNode::new_document();
    if let Some(body) = take_first(doc, &|n| n.node_type == NodeType::Element && n.tag == "body") {
        container.children = body.children;
    }
    container
}

fn take_first(node: DomNode, pred: &dyn Fn(&DomNode) -> bool) -> Option<DomNode> {
    if pred(&node) {
        return Some(node);
    }
    for child in node.children {
        if let Some(found) = take_first(child, pred) {
            return Some(found);
        }
    }
    None
}

fn convert_node(handle: &Handle) -> DomNode {
    match &handle.data {
        NodeData::Document => {
            let mut doc = DomNode::new_document();
            for child in handle.children.borrow().iter() {
                doc.children.push(convert_node(child));
            }
            doc
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let mut node = DomNode::new_element(&tag);
            for attr in attrs.borrow().iter() {
                node.attributes
                    .insert(attr.name.local.to_string(), attr.value.to_string());
            }
            // Text is kept verbatim, script/style included: embed markers and
            // code blocks carry their payload as text.
            for child in handle.children.borrow().iter() {
                node.children.push(convert_node(child));
            }
            node
        }
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            DomNode::new_text(&text)
        }
        _ => DomNode::new_document(), // Comments, PIs, doctypes → ignored
    }
}

fn serialize_node(node: &DomNode, out: &mut String) {
    match node.node_type {
        NodeType::Document => {
            for child in &node.children {
                serialize_node(child, out);
            }
        }
        NodeType::Text => escape_text(&node.text, out),
        NodeType::Element => {
            let tag = node.tag.as_str();
            out.push('<');
            out.push_str(tag);
            let mut names: Vec<&String> = node.attributes.keys().collect();
            names.sort(); // stable output for a HashMap-backed attribute set
            for name in names {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                if let Some(value) = node.attributes.get(name) {
                    escape_attr(value, out);
                }
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&tag) {
                return;
            }
            if RAW_TEXT_TAGS.contains(&tag) {
                for child in &node.children {
                    if child.node_type == NodeType::Text {
                        out.push_str(&child.text);
                    }
                }
            } else {
                for child in &node.children {
                    serialize_node(child, out);
                }
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}
