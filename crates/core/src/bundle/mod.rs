//! The fetched gist bundle: payload model, the per-file table parsed out of
//! the pre-rendered fragment, and display-file selection.

use crate::dom::{self, DomNode};
use crate::error::EmbedError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default display files, tried in order before falling back to the first
/// `.md` file and then the first file in bundle order.
pub const DEFAULT_DISPLAY_FILES: &[&str] = &["~gistly.md", "~index.md", "gistly.md", "index.md"];

/// The upstream JSON payload for one gist. Metadata fields beyond `div`,
/// `files`, and `stylesheet` are accepted but unused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistPayload {
    /// Pre-rendered HTML fragment, one `.gist-file` block per file.
    pub div: String,
    /// File names in declaration order. Order matters for selection fallback.
    pub files: Vec<String>,
    /// URL of the gist stylesheet.
    #[serde(default)]
    pub stylesheet: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub created_at: String,
}

/// One parsed file from the bundle. The three subtrees are detached clones of
/// the parsed fragment, not live document references; rendering them into a
/// document is a separate step.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub name: String,
    /// Plain text for source files, serialized markup when `is_raw_html`.
    pub code: String,
    /// True when the rendered block carries an `.entry-content` wrapper,
    /// i.e. the file is itself an HTML document rather than source code.
    pub is_raw_html: bool,
    /// The whole rendered block for the file.
    pub file_node: DomNode,
    /// The content portion of the block.
    pub data_node: DomNode,
    /// The metadata/header portion of the block.
    pub meta_node: DomNode,
}

/// Partition the bundle's rendered fragment into per-file records keyed by
/// trimmed file name. Duplicate names keep the last occurrence.
pub fn parse_files(div_html: &str) -> Result<HashMap<String, FileRecord>, EmbedError> {
    let fragment = dom::parse_fragment(div_html);
    let mut files = HashMap::new();

    for file_node in fragment.find_all_by_class("gist-file") {
        let meta_node = file_node
            .find_first_by_class("gist-meta")
            .ok_or(EmbedError::StructuralMismatch { region: "gist-meta" })?;
        let name_link = meta_node
            .find_first(&|n| {
                n.tag == "a"
                    && n.get_attr("href")
                        .map(|href| href.contains("#file-"))
                        .unwrap_or(false)
            })
            .ok_or(EmbedError::StructuralMismatch {
                region: "file name link",
            })?;
        let name = name_link.raw_text().trim().to_string();

        let data_node = file_node
            .find_first_by_class("gist-data")
            .ok_or(EmbedError::StructuralMismatch { region: "gist-data" })?;
        let is_raw_html = data_node.find_first_by_class("entry-content").is_some();
        let code = if is_raw_html {
            data_node.inner_html()
        } else {
            data_node.raw_text()
        };

        files.insert(
            name.clone(),
            FileRecord {
                name,
                code,
                is_raw_html,
                file_node: file_node.clone(),
                data_node: data_node.clone(),
                meta_node: meta_node.clone(),
            },
        );
    }

    Ok(files)
}

/// Pick the display file. An explicit choice wins without an existence check;
/// otherwise the default priority list, then the first `.md` file in bundle
/// order, then the first file.
pub fn select_display_file(
    files: &[String],
    explicit: Option<&str>,
) -> Result<String, EmbedError> {
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }
    if files.is_empty() {
        return Err(EmbedError::NoFilesAvailable);
    }
    if let Some(name) = DEFAULT_DISPLAY_FILES
        .iter()
        .find(|default| files.iter().any(|f| f == *default))
    {
        return Ok(name.to_string());
    }
    if let Some(name) = files.iter().find(|f| f.ends_with(".md")) {
        return Ok(name.clone());
    }
    Ok(files[0].clone())
}
