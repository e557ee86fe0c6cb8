//! String level fix for ordered list items opened by a break.
//!
//! When a list item's text starts with a literal `N.` marker followed by a
//! line ending, the line-break pass leaves a `<br>` right after the marker.
//! The tree pass cannot see this case because the marker is plain text, so
//! it is removed from the serialized HTML instead. Loose items are written
//! as `<li>` and `<p>` separated by a newline; that whitespace is kept.

use regex::Regex;
use std::sync::LazyLock;

static MARKER_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<li>(\s*)<p>(\d+\.\s*)<br>").unwrap());

/// Removes the `<br>` directly after a numeric marker opening a list item.
pub(crate) fn strip_marker_breaks(html: &str) -> String {
    MARKER_BREAK.replace_all(html, "<li>$1<p>$2").into_owned()
}
