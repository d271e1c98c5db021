//! Errors that abort a single embed invocation. Per-marker resolution
//! failures are not errors; they are collected in
//! [`ResolveOutcome::failures`](crate::embed::ResolveOutcome) and never stop
//! the scan.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// The fetched markup lacked an expected structural region.
    StructuralMismatch { region: &'static str },
    /// The bundle declares no files, so no display file can be selected.
    NoFilesAvailable,
    /// The selected display file has no parsed record.
    MissingRecord(String),
    /// No node in the host document matched the placement target.
    TargetNotFound,
    /// The upstream gist source failed to produce a payload.
    Source(String),
}

impl std::fmt::Display for EmbedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedError::StructuralMismatch { region } => {
                write!(f, "Gist markup is missing the expected {} region", region)
            }
            EmbedError::NoFilesAvailable => write!(f, "Gist bundle contains no files"),
            EmbedError::MissingRecord(name) => {
                write!(f, "No parsed record for display file {:?}", name)
            }
            EmbedError::TargetNotFound => write!(f, "No placement target found in the document"),
            EmbedError::Source(e) => write!(f, "Gist source error: {}", e),
        }
    }
}

impl std::error::Error for EmbedError {}
