//! Host document and the embed orchestrator: parse the payload's file table,
//! select a display file, render it into a container, resolve nested embeds,
//! and place the result at a placeholder.

use crate::bundle::{self, GistPayload};
use crate::dom::build::ElementBuilder;
use crate::dom::place::{place_node, Placement};
use crate::dom::{self, DomNode, NodeType};
use crate::embed::{self, EmbedFailure, ResolveOptions, ScriptEmbed};
use crate::error::EmbedError;

/// Produces gist payloads for the orchestrator. The HTTP implementation
/// lives behind the `fetch` feature; tests stub this with canned payloads.
pub trait GistSource {
    fn fetch_gist(&self, id_or_url: &str) -> Result<GistPayload, EmbedError>;
}

/// Options for a single embed invocation.
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// Explicit display file. Wins over the default selection, unchecked.
    pub file: Option<String>,
    /// Where the gist container lands relative to the placeholder.
    pub placement: Placement,
    /// Surface script embeds to the caller instead of dropping them.
    pub allow_script_embeds: bool,
}

/// What one embed invocation produced beyond the document mutation.
#[derive(Debug)]
pub struct EmbedOutcome {
    /// The file that was selected for display.
    pub display_file: String,
    /// Script code collected from js-typed embeds, for the host to run.
    pub scripts: Vec<ScriptEmbed>,
    /// Per-marker resolution failures. Non-fatal by design.
    pub failures: Vec<EmbedFailure>,
}

/// Report for one auto-discovered embed target on a page.
#[derive(Debug)]
pub struct PageEmbedReport {
    /// The gist id or URL the target referenced.
    pub gist: String,
    pub result: Result<EmbedOutcome, EmbedError>,
}

/// An owned HTML document the engine can splice gist content into.
#[derive(Debug, Clone)]
pub struct Document {
    root: DomNode,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            root: dom::parse_html(html),
        }
    }

    pub fn root(&self) -> &DomNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut DomNode {
        &mut self.root
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    /// Append a `<style>` element carrying the given CSS to the head, or to
    /// the body when the document has no head.
    pub fn inject_style(&mut self, css: &str) {
        let style = ElementBuilder::new("style").text(css).build();
        self.append_to_head_or_body(style);
    }

    /// Append a `<link rel="stylesheet">` for the given URL.
    pub fn inject_stylesheet_link(&mut self, href: &str) {
        let link = ElementBuilder::new("link")
            .attr("rel", "stylesheet")
            .attr("href", href)
            .build();
        self.append_to_head_or_body(link);
    }

    fn append_to_head_or_body(&mut self, node: DomNode) {
        if let Some(head) = find_tag_mut(&mut self.root, "head") {
            head.children.push(node);
            return;
        }
        if let Some(body) = find_tag_mut(&mut self.root, "body") {
            body.children.push(node);
            return;
        }
        self.root.children.push(node);
    }
}

fn find_tag_mut<'a>(node: &'a mut DomNode, tag: &str) -> Option<&'a mut DomNode> {
    if node.node_type == NodeType::Element && node.tag == tag {
        return Some(node);
    }
    for child in &mut node.children {
        if let Some(found) = find_tag_mut(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Embed a gist payload into the document at the first node matching
/// `is_target`. Drives the whole pipeline for one invocation; structural and
/// selection failures abort this invocation only.
pub fn embed_payload(
    doc: &mut Document,
    payload: &GistPayload,
    is_target: &dyn Fn(&DomNode) -> bool,
    options: &EmbedOptions,
) -> Result<EmbedOutcome, EmbedError> {
    let files = bundle::parse_files(&payload.div)?;
    let display_file = bundle::select_display_file(&payload.files, options.file.as_deref())?;
    let file_node = files
        .get(&display_file)
        .ok_or_else(|| EmbedError::MissingRecord(display_file.clone()))?
        .file_node
        .clone();

    let mut container = ElementBuilder::new("div")
        .class("gist")
        .child(file_node)
        .build();
    let resolve_options = ResolveOptions {
        allow_script_embeds: options.allow_script_embeds,
    };
    let resolved = embed::resolve_embeds(&mut container, &files, &resolve_options);

    if !place_node(doc.root_mut(), is_target, container, options.placement) {
        return Err(EmbedError::TargetNotFound);
    }

    if !payload.stylesheet.is_empty() {
        doc.inject_stylesheet_link(&payload.stylesheet);
    }
    for css in &resolved.styles {
        doc.inject_style(css);
    }

    Ok(EmbedOutcome {
        display_file,
        scripts: resolved.scripts,
        failures: resolved.failures,
    })
}

/// Discover `script[data-gistly]` targets that have not been handled yet,
/// mark them handled, and embed each with placement `replace` and the
/// optional `data-file` override. One failed target never blocks the others,
/// and a second pass over the same document finds nothing left to do.
pub fn embed_page(
    doc: &mut Document,
    source: &dyn GistSource,
    options: &ResolveOptions,
) -> Vec<PageEmbedReport> {
    let mut targets = Vec::new();
    // Failed targets keep their handled marker, so the counter must start
    // past any token already in the tree or a later pass could match a
    // stale node.
    let mut counter = max_handled_token(doc.root());
    discover_targets(doc.root_mut(), &mut counter, &mut targets);

    let mut reports = Vec::new();
    for target in targets {
        let result = source.fetch_gist(&target.gist).and_then(|payload| {
            let embed_options = EmbedOptions {
                file: target.file.clone(),
                placement: Placement::Replace,
                allow_script_embeds: options.allow_script_embeds,
            };
            let is_target = |n: &DomNode| {
                n.get_attr("data-gistly-handled") == Some(target.token.as_str())
            };
            embed_payload(doc, &payload, &is_target, &embed_options)
        });
        reports.push(PageEmbedReport {
            gist: target.gist,
            result,
        });
    }
    reports
}

struct PageTarget {
    /// Unique handled-marker value identifying this exact node.
    token: String,
    gist: String,
    file: Option<String>,
}

fn max_handled_token(node: &DomNode) -> u32 {
    let mut max = node
        .get_attr("data-gistly-handled")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);
    for child in &node.children {
        max = max.max(max_handled_token(child));
    }
    max
}

fn discover_targets(node: &mut DomNode, counter: &mut u32, targets: &mut Vec<PageTarget>) {
    if node.node_type == NodeType::Element && node.tag == "script" {
        let gist = node.get_attr("data-gistly").map(str::to_string);
        if let Some(gist) = gist {
            if node.get_attr("data-gistly-handled").is_none() {
                *counter += 1;
                let token = counter.to_string();
                let file = node.get_attr("data-file").map(str::to_string);
                node.set_attr("data-gistly-handled", &token);
                targets.push(PageTarget { token, gist, file });
            }
        }
    }
    for child in &mut node.children {
        discover_targets(child, counter, targets);
    }
}
