//! Per-request context carried through the pipeline.

/// Created at pipeline entry, attached as a request extension for the
/// lifetime of one request, and dropped once the response is sent. Never
/// shared across requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Opaque correlation id, echoed on every response.
    pub correlation_id: String,
    /// Matched route template, or the raw path when routing matched none.
    pub route: String,
    /// Validated API key, attached for observability only.
    pub supplied_key: Option<String>,
}
