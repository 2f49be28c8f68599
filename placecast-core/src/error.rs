use thiserror::Error;

/// Failure modes of the lookup pipeline.
///
/// The CLI collapses most of these into a single "Location not found."
/// message; the distinction matters for logging and for tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Empty or whitespace-only query. Rejected locally, no request is sent.
    #[error("empty query")]
    EmptyQuery,

    /// The geocoder returned no candidates, or the match quality was judged
    /// unreliable.
    #[error("location not found")]
    NotFound,

    /// Transport failure, non-success status, or a payload missing required
    /// fields, from either provider.
    #[error("provider error: {message}")]
    Provider { message: String },

    /// A required API key is absent. Raised at provider construction, before
    /// any request goes out.
    #[error("missing configuration: {what}")]
    ConfigMissing { what: String },
}

impl LookupError {
    pub fn provider(message: impl Into<String>) -> Self {
        LookupError::Provider { message: message.into() }
    }

    pub fn config_missing(what: impl Into<String>) -> Self {
        LookupError::ConfigMissing { what: what.into() }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        // Drop the URL from the message so API keys never reach logs.
        LookupError::Provider { message: err.without_url().to_string() }
    }
}

/// Cap a provider error body for inclusion in an error message, backing up
/// to a char boundary so multi-byte content never panics the slice.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
