//! Obsidian flavoured markdown rendering.
//!
//! This module renders CommonMark with GFM extensions (tables,
//! strikethrough, autolinks, task lists, footnotes) plus the Obsidian
//! additions: `![[name]]` image embeds, single newlines as line breaks and
//! clean ordered list items. Output is sanitized HTML.

mod embeds;
mod line_breaks;
mod links;
mod ordered_lists;
mod patch;
mod renderer;
mod sanitize;
mod tree;

pub use links::{ImageResolver, asset_href, logical_path_from_src, resolve_image_path};
pub use renderer::{DEFAULT_ENDPOINT, MarkdownRenderer, RenderOptions, error_fragment, render};
