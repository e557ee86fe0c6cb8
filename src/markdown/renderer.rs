//! Obsidian markdown rendering pipeline.

use anyhow::{Context, Result};
use comrak::nodes::AstNode;
use comrak::{Arena, Options};
use maud::html;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

use super::embeds::expand_embeds;
use super::line_breaks::preserve_line_breaks;
use super::links::join_paths;
use super::ordered_lists::normalize_ordered_lists;
use super::patch::strip_marker_breaks;
use super::sanitize::sanitizer;
use super::tree::{markdown_options, parse_document};
use super::ImageResolver;
use crate::error::{RenderError, panic_message};
use crate::highlight::Highlighter;

/// Endpoint serving raw file bytes for a percent-encoded `path` parameter.
pub const DEFAULT_ENDPOINT: &str = "/api/file";

/// Folder name for note attachments.
const ASSETS_DIR: &str = "img";

/// Settings for one rendering context (a note folder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory of the note; embed names resolve against it.
    pub base_path: String,
    /// Attachment folder of the note, `<base_path>/img` by default.
    pub assets_path: String,
    /// Byte-serving endpoint wrapped around local image paths.
    pub endpoint: Option<String>,
    /// Highlight fenced code blocks.
    pub highlight: bool,
}

impl RenderOptions {
    /// Creates options for notes in `base_path` with the default endpoint.
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        let assets_path = join_paths(&[&base_path, ASSETS_DIR]);
        Self {
            base_path,
            assets_path,
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            highlight: false,
        }
    }

    /// Overrides the attachment folder.
    pub fn with_assets_path(mut self, assets_path: impl Into<String>) -> Self {
        self.assets_path = assets_path.into();
        self
    }

    /// Sets the byte-serving endpoint; `None` emits plain logical paths.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Enables or disables code block highlighting.
    pub fn with_highlighting(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new("")
    }
}

/// Renders Obsidian flavoured markdown to sanitized HTML.
///
/// Runs a fixed pipeline per document: parse (CommonMark + GFM), preserve
/// line breaks, drop breaks opening ordered list items, expand `![[name]]`
/// embeds into images, convert to HTML, sanitize, serialize, optionally
/// highlight code, and patch breaks after literal list markers. Each call
/// works on its own tree, so one renderer serves any number of documents.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    sanitizer: ammonia::Builder<'static>,
    resolver: ImageResolver,
    highlighter: Option<Highlighter>,
    render_options: RenderOptions,
    #[cfg(test)]
    tree_hook: Option<TreeHook>,
}

/// Runs on the parsed tree before the rewrite passes.
#[cfg(test)]
pub(crate) type TreeHook = for<'t> fn(&'t Arena<AstNode<'t>>, &'t AstNode<'t>);

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer for the given note context.
    ///
    /// Configures GFM extensions (tables, strikethrough, autolinks, task
    /// lists, footnotes), raw HTML passthrough into the sanitizer, and the
    /// image resolver for `render_options.base_path`.
    pub fn new(render_options: RenderOptions) -> Self {
        let resolver = ImageResolver::new(
            render_options.base_path.clone(),
            render_options.endpoint.clone(),
        );
        let highlighter = render_options.highlight.then(Highlighter::new);

        Self {
            options: markdown_options(),
            sanitizer: sanitizer(),
            resolver,
            highlighter,
            render_options,
            #[cfg(test)]
            tree_hook: None,
        }
    }

    /// Options this renderer was built with.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Renders markdown content to HTML, never failing.
    ///
    /// Any stage failure is logged and turned into the error fragment from
    /// [`error_fragment`], so the result is always displayable HTML. Empty
    /// input renders to an empty string.
    ///
    /// # Arguments
    ///
    /// * `content`: Markdown content to render
    ///
    /// # Returns
    ///
    /// Sanitized HTML, or an HTML error block describing the failure
    pub fn render(&self, content: &str) -> String {
        match self.try_render(content) {
            Ok(html) => html,
            Err(err) => {
                warn!(error = %err, "Markdown rendering failed");
                error_fragment(&err)
            }
        }
    }

    /// Renders markdown content to HTML, reporting the failing stage.
    ///
    /// # Errors
    ///
    /// Returns the first stage error; panics inside a stage are caught and
    /// reported as that stage's error.
    pub fn try_render(&self, content: &str) -> Result<String, RenderError> {
        let arena = Arena::new();

        let root = guard(|| parse_document(&arena, content, &self.options))
            .map_err(|detail| RenderError::Parse { detail })?;
        debug!(bytes = content.len(), "Parsed markdown");

        #[cfg(test)]
        if let Some(hook) = self.tree_hook {
            hook(&arena, root);
        }

        guard(|| preserve_line_breaks(&arena, root))
            .map_err(|detail| RenderError::transform("line break", detail))?;
        guard(|| normalize_ordered_lists(root))
            .map_err(|detail| RenderError::transform("ordered list", detail))??;
        guard(|| expand_embeds(&arena, root, &self.resolver))
            .map_err(|detail| RenderError::transform("embed", detail))?;
        debug!("Applied rewrite passes");

        let converted = self.convert(root)?;

        let sanitized = guard(|| self.sanitizer.clean(&converted).to_string())
            .map_err(|detail| RenderError::Sanitize { detail })?;

        let decorated = match &self.highlighter {
            Some(highlighter) => highlighter
                .highlight_code_blocks(&sanitized)
                .map_err(|err| RenderError::Highlight {
                    detail: format!("{:#}", err),
                })?,
            None => sanitized,
        };

        Ok(strip_marker_breaks(&decorated))
    }

    /// Converts the rewritten tree to an HTML string.
    fn convert<'t>(&self, root: &'t AstNode<'t>) -> Result<String, RenderError> {
        let mut buffer: Vec<u8> = Vec::new();

        guard(|| comrak::format_html(root, &self.options, &mut buffer))
            .map_err(|detail| RenderError::Convert { detail })?
            .map_err(|err| RenderError::Convert {
                detail: err.to_string(),
            })?;

        String::from_utf8(buffer).map_err(|err| RenderError::Convert {
            detail: err.to_string(),
        })
    }

    /// Renders markdown file at given path.
    ///
    /// Invalid UTF-8 sequences are replaced before rendering.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read
    pub fn render_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;
        Ok(self.render(&String::from_utf8_lossy(&bytes)))
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Renders `content` for the note context in `options`.
///
/// One-shot form of [`MarkdownRenderer::render`].
pub fn render(content: &str, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(content)
}

/// HTML block shown in place of a document that failed to render.
pub fn error_fragment(err: &RenderError) -> String {
    html! {
        div class="error" {
            h3 { "Error" }
            p { "Error parsing markdown: " (err) }
        }
    }
    .into_string()
}

/// Runs one stage, turning a panic into its message.
///
/// The process panic hook is not replaced: it belongs to the embedding
/// application, so a caught panic is still reported by that hook (on stderr
/// with the default one) next to the `warn!` from [`MarkdownRenderer::render`].
fn guard<T>(stage: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(stage)).map_err(|payload| panic_message(payload.as_ref()))
}
