//! Error types for the rendering pipeline.
//!
//! Every variant names the stage that failed. The pipeline is
//! all-or-nothing per document: the first failing stage aborts the render
//! and [`crate::MarkdownRenderer::render`] turns the error into a visible
//! HTML fragment instead of returning it.

use thiserror::Error;

/// Failure of one pipeline stage for one document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The markdown parser could not build a document tree.
    #[error("parser failed: {detail}")]
    Parse { detail: String },

    /// A rewrite pass met a node shape it cannot handle.
    #[error("{pass} pass failed: {detail}")]
    Transform { pass: &'static str, detail: String },

    /// The document tree could not be converted to HTML.
    #[error("HTML conversion failed: {detail}")]
    Convert { detail: String },

    /// The sanitizer or serializer failed.
    #[error("sanitizer failed: {detail}")]
    Sanitize { detail: String },

    /// Code block highlighting failed.
    #[error("code highlighting failed: {detail}")]
    Highlight { detail: String },
}

impl RenderError {
    /// Builds a transform error for the named pass.
    pub(crate) fn transform(pass: &'static str, detail: impl Into<String>) -> Self {
        Self::Transform {
            pass,
            detail: detail.into(),
        }
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
