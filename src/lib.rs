//! Obsidian flavoured markdown to sanitized HTML.
//!
//! The core entry point is [`MarkdownRenderer`], configured per note folder
//! with [`RenderOptions`]. Asset helpers ([`content_type`], [`locate_asset`],
//! [`inline_images`]) follow the lookup rules of the byte-serving endpoint
//! that rendered image links point at.

mod assets;
mod config;
mod error;
mod filetype;
mod highlight;
mod markdown;
mod page;

pub use assets::{data_url, inline_images, locate_asset};
pub use config::Config;
pub use error::RenderError;
pub use filetype::{FileType, ImageFormat, content_type, detect_file_type};
pub use highlight::Highlighter;
pub use markdown::{
    DEFAULT_ENDPOINT, ImageResolver, MarkdownRenderer, RenderOptions, asset_href, error_fragment,
    logical_path_from_src, render, resolve_image_path,
};
pub use page::{STYLESHEET, page_wrapper};
