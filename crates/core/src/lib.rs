pub mod bundle;
pub mod document;
pub mod dom;
pub mod embed;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;

use document::{Document, EmbedOptions, EmbedOutcome};

/// Render a gist payload into a standalone host page.
/// This is the primary entry point for gistly-core.
pub fn render_page(
    payload: &bundle::GistPayload,
    options: &EmbedOptions,
) -> Result<(Document, EmbedOutcome), error::EmbedError> {
    let mut doc = Document::parse(
        "<!DOCTYPE html><html><head></head><body><div id=\"gistly-root\"></div></body></html>",
    );
    let outcome = embed_payload_at_id(&mut doc, payload, "gistly-root", options)?;
    Ok((doc, outcome))
}

/// Embed a payload at the element with the given `id` attribute.
pub fn embed_payload_at_id(
    doc: &mut Document,
    payload: &bundle::GistPayload,
    id: &str,
    options: &EmbedOptions,
) -> Result<EmbedOutcome, error::EmbedError> {
    document::embed_payload(doc, payload, &|n| n.get_attr("id") == Some(id), options)
}

/// Fetch a gist by id or URL and embed it at the first node matching
/// `is_target`.
#[cfg(feature = "fetch")]
pub fn embed_gist(
    doc: &mut Document,
    id_or_url: &str,
    is_target: &dyn Fn(&dom::DomNode) -> bool,
    options: &EmbedOptions,
) -> Result<EmbedOutcome, error::EmbedError> {
    let payload = fetch::fetch_payload(id_or_url, &fetch::FetchConfig::default())
        .map_err(|e| error::EmbedError::Source(e.to_string()))?;
    document::embed_payload(doc, &payload, is_target, options)
}
