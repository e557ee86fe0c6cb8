//! Image path resolution for Obsidian embeds.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;

/// Prefix Obsidian gives to images pasted from the clipboard.
const PASTED_IMAGE_PREFIX: &str = "Pasted image";

/// Directory below the note folder where pasted images are stored.
const PASTED_IMAGE_DIR: &str = "img";

/// Characters `encodeURIComponent` leaves alone: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Resolves an embed name to the logical path of the image.
///
/// - `Pasted image ...` names live in the `img` folder next to the note
/// - other relative names are joined to `base_path`
/// - absolute paths and network references are returned unchanged
///
/// # Arguments
///
/// * `embed_name`: Raw name captured from `![[...]]`
/// * `base_path`: Directory of the note being rendered
///
/// # Returns
///
/// Unescaped logical path (or the name itself when already absolute)
///
/// # Examples
///
/// ```
/// use vaultmark::resolve_image_path;
///
/// assert_eq!(resolve_image_path("a.png", "/kb/notes"), "/kb/notes/a.png");
/// assert_eq!(
///     resolve_image_path("Pasted image 1.png", "/kb/notes"),
///     "/kb/notes/img/Pasted image 1.png"
/// );
/// assert_eq!(resolve_image_path("https://x.io/a.png", "/kb"), "https://x.io/a.png");
/// ```
pub fn resolve_image_path(embed_name: &str, base_path: &str) -> String {
    if embed_name.starts_with(PASTED_IMAGE_PREFIX) {
        return join_paths(&[base_path, PASTED_IMAGE_DIR, embed_name]);
    }

    if is_local_relative(embed_name) {
        return join_paths(&[base_path, embed_name]);
    }

    embed_name.to_string()
}

/// Relative names are neither absolute nor network references.
fn is_local_relative(name: &str) -> bool {
    !name.starts_with('/') && !name.starts_with("http")
}

/// Joins path segments with POSIX semantics and normalizes the result.
///
/// Empty segments are skipped, `.` is dropped and `..` removes the segment
/// before it. At the root of an absolute path `..` is discarded; at the
/// front of a relative path it is kept. An empty result becomes `.`.
pub(crate) fn join_paths(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        return ".".to_string();
    }

    let absolute = joined.starts_with('/');
    let trailing_slash = joined.ends_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let mut normalized = parts.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if trailing_slash && !parts.is_empty() {
        normalized.push('/');
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    normalized
}

/// Turns resolved embed names into image URLs.
///
/// Local paths are wrapped into an href for the byte-serving endpoint
/// (`{endpoint}?path={encoded path}`) when one is configured, otherwise the
/// logical path is used directly. Absolute and network names pass through.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_path: String,
    endpoint: Option<String>,
}

impl ImageResolver {
    /// Creates resolver for notes in `base_path`.
    ///
    /// # Arguments
    ///
    /// * `base_path`: Directory of the note being rendered
    /// * `endpoint`: Byte-serving endpoint, `None` for plain paths
    pub fn new(base_path: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            base_path: base_path.into(),
            endpoint,
        }
    }

    /// Returns the image URL for an embed name.
    pub fn url(&self, embed_name: &str) -> String {
        let resolved = resolve_image_path(embed_name, &self.base_path);

        let local = embed_name.starts_with(PASTED_IMAGE_PREFIX) || is_local_relative(embed_name);
        match (&self.endpoint, local) {
            (Some(endpoint), true) => asset_href(endpoint, &resolved),
            _ => resolved,
        }
    }
}

/// Builds the byte-serving href for a logical path.
pub fn asset_href(endpoint: &str, logical_path: &str) -> String {
    format!(
        "{}?path={}",
        endpoint,
        utf8_percent_encode(logical_path, URI_COMPONENT)
    )
}

/// Recovers the logical path from an image `src` attribute.
///
/// Accepts both the endpoint form produced by [`asset_href`] and a plain
/// (possibly percent-encoded) path. Returns `None` for network references
/// and for endpoint URLs without a `path` parameter.
pub fn logical_path_from_src<'s>(src: &'s str, endpoint: Option<&str>) -> Option<Cow<'s, str>> {
    if src.starts_with("http") || src.starts_with("data:") {
        return None;
    }

    if let Some(endpoint) = endpoint
        && let Some(query) = src.strip_prefix(endpoint).and_then(|rest| rest.strip_prefix('?'))
    {
        let value = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("path="))?;
        return Some(percent_decode_str(value).decode_utf8_lossy());
    }

    Some(percent_decode_str(src).decode_utf8_lossy())
}
