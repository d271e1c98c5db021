//! Nested embed resolution.
//!
//! Markers are elements whose `lang` attribute names an embed content type
//! and whose text names a file in the bundle (or carries inline content as a
//! fallback). Each marker is consumed exactly once, whether or not its
//! resolution succeeds, and a failed marker never stops the scan.
//!
//! The resolver never touches anything outside the subtree it is given:
//! stylesheet and script side effects are collected into the outcome for the
//! caller to apply, and scripts are never evaluated here at all.

use crate::bundle::FileRecord;
use crate::dom::build::ElementBuilder;
use crate::dom::{DomNode, NodeType};
use std::collections::HashMap;

/// The exact literal set of marker content types.
pub const EMBED_LANGS: &[&str] = &[
    "embed-file",
    "embed-raw-file",
    "embed-raw-css",
    "embed-raw-html",
    "embed-raw-js",
    "embed-raw-javascript",
];

/// Class of the visible placeholder inserted for an unresolvable reference.
pub const EMBED_ERROR_CLASS: &str = "gistly-embed-error";

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Collect `embed-raw-js`/`embed-raw-javascript` code for the host.
    /// Off by default: executing fetched code is an opt-in capability, and
    /// even opted in, the engine only surfaces the code and never runs it.
    pub allow_script_embeds: bool,
}

/// Script code surfaced to the host for a js-typed embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEmbed {
    pub name: String,
    pub code: String,
}

/// A per-marker failure. Recorded, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFailure {
    pub name: String,
    pub reason: String,
}

/// Everything a resolution pass produced besides the subtree mutation.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// Stylesheet text to inject into the document head.
    pub styles: Vec<String>,
    /// Script code surfaced for the host (only when scripts are allowed).
    pub scripts: Vec<ScriptEmbed>,
    /// Markers that could not be resolved.
    pub failures: Vec<EmbedFailure>,
}

/// Whether a node is an embed marker.
pub fn is_embed_marker(node: &DomNode) -> bool {
    node.node_type == NodeType::Element
        && node
            .get_attr("lang")
            .map(|lang| EMBED_LANGS.contains(&lang))
            .unwrap_or(false)
}

/// Scan `root` for embed markers and replace each with the referenced file's
/// content per its content type. Mutates the subtree in place; global side
/// effects come back in the outcome.
pub fn resolve_embeds(
    root: &mut DomNode,
    files: &HashMap<String, FileRecord>,
    options: &ResolveOptions,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();
    resolve_in_children(root, files, options, &mut outcome);
    outcome
}

fn resolve_in_children(
    parent: &mut DomNode,
    files: &HashMap<String, FileRecord>,
    options: &ResolveOptions,
    outcome: &mut ResolveOutcome,
) {
    let mut i = 0;
    while i < parent.children.len() {
        if is_embed_marker(&parent.children[i]) {
            let marker = parent.children.remove(i);
            // Replacement content is not rescanned: the marker set is a
            // snapshot of the tree as it was before resolution started.
            if let Some(replacement) = resolve_marker(&marker, files, options, outcome) {
                parent.children.insert(i, replacement);
                i += 1;
            }
            continue;
        }
        resolve_in_children(&mut parent.children[i], files, options, outcome);
        i += 1;
    }
}

/// Resolve one marker. Returns the node to splice into the marker's former
/// position, if the content type calls for one.
fn resolve_marker(
    marker: &DomNode,
    files: &HashMap<String, FileRecord>,
    options: &ResolveOptions,
    outcome: &mut ResolveOutcome,
) -> Option<DomNode> {
    let lang = marker.get_attr("lang").unwrap_or("");
    let inline = marker.raw_text();
    let name = inline.trim().to_string();
    let record = files.get(&name);

    // A reference to nothing with nothing inline gets a visible placeholder
    // instead of silent empty content.
    if record.is_none() && name.is_empty() {
        outcome.failures.push(EmbedFailure {
            name,
            reason: "marker names no file and carries no inline content".to_string(),
        });
        return Some(error_placeholder("empty embed reference"));
    }

    // When the name matches no file, the marker's own text is the content.
    let code = match record {
        Some(record) => record.code.clone(),
        None => inline,
    };

    if lang == "embed-file" {
        return match record {
            Some(record) => {
                let mut data = record.data_node.clone();
                suppress_bottom_border(&mut data);
                Some(data)
            }
            None => {
                outcome.failures.push(EmbedFailure {
                    name: name.clone(),
                    reason: "referenced file not found in bundle".to_string(),
                });
                Some(error_placeholder(&format!("missing embedded file {:?}", name)))
            }
        };
    }

    if lang == "embed-raw-css" || name.ends_with(".css") {
        outcome.styles.push(code);
        return None;
    }

    if lang == "embed-raw-js" || lang == "embed-raw-javascript" || name.ends_with(".js") {
        if options.allow_script_embeds {
            outcome.scripts.push(ScriptEmbed { name, code });
        } else {
            outcome.failures.push(EmbedFailure {
                name,
                reason: "script embeds are disabled".to_string(),
            });
        }
        return None;
    }

    // embed-raw-html, embed-raw-file, and anything else: parsed markup.
    Some(ElementBuilder::new("div").markup(&code).build())
}

fn suppress_bottom_border(node: &mut DomNode) {
    let current = node
        .get_attr("style")
        .unwrap_or("")
        .trim()
        .trim_end_matches(';')
        .to_string();
    let style = if current.is_empty() {
        "border-bottom: none".to_string()
    } else {
        format!("{}; border-bottom: none", current)
    };
    node.set_attr("style", &style);
}

fn error_placeholder(message: &str) -> DomNode {
    ElementBuilder::new("div")
        .class(EMBED_ERROR_CLASS)
        .text(&format!("gistly: {}", message))
        .build()
}
