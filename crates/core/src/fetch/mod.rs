//! Gist payload fetching over HTTPS.
//! Gated behind the "fetch" feature flag.
//!
//! The gist JSON endpoint is requested without a callback parameter, so the
//! response is plain JSON: no JSONP padding, no global callback registry.

use crate::bundle::GistPayload;
use crate::document::GistSource;
use crate::error::EmbedError;
use reqwest::blocking::Client;
use url::Url;

/// Configuration for payload fetching.
pub struct FetchConfig {
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("gistly/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Reduce a bare gist id or a `gist.github.com` URL (with or without the
/// owner segment) to the gist id.
pub fn normalize_gist_id(id_or_url: &str) -> Result<String, FetchError> {
    let input = id_or_url.trim();
    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Ok(input.to_string());
    }

    let url = Url::parse(input).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| FetchError::InvalidUrl(format!("no gist id in {}", input)))?;
    // The id is the leading word-character run; anything after (".json",
    // "#file-...") is noise.
    let id: String = segment
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if id.is_empty() {
        return Err(FetchError::InvalidUrl(format!("no gist id in {}", input)));
    }
    Ok(id)
}

/// Fetch and decode the JSON payload for a gist.
pub fn fetch_payload(id_or_url: &str, config: &FetchConfig) -> Result<GistPayload, FetchError> {
    let id = normalize_gist_id(id_or_url)?;

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let response = client
        .get(format!("https://gist.github.com/{}.json", id))
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpError(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// [`GistSource`] backed by the live gist endpoint.
#[derive(Default)]
pub struct HttpGistSource {
    pub config: FetchConfig,
}

impl GistSource for HttpGistSource {
    fn fetch_gist(&self, id_or_url: &str) -> Result<GistPayload, EmbedError> {
        fetch_payload(id_or_url, &self.config).map_err(|e| EmbedError::Source(e.to_string()))
    }
}

#[derive(Debug)]
pub enum FetchError {
    InvalidUrl(String),
    Network(String),
    HttpError(u16),
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FetchError::Decode(e) => write!(f, "Payload decode error: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}
