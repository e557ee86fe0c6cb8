//! Allow-list HTML sanitizing.

use ammonia::Builder;
use std::borrow::Cow;

/// Class prefix comrak puts on fenced code blocks.
const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Builds the sanitizer used on converted markdown.
///
/// Starts from ammonia's defaults (no scripts, no event handlers, no
/// `javascript:` URLs) and additionally allows what GFM output needs:
/// task list checkboxes and the `language-*` class on code blocks.
pub(crate) fn sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("code", &["class"])
        .attribute_filter(filter_attribute);
    builder
}

/// Keeps only checkbox inputs and language classes.
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match (element, attribute) {
        ("code", "class") => value
            .split_whitespace()
            .find(|class| class.starts_with(LANGUAGE_CLASS_PREFIX))
            .map(Cow::Borrowed),
        ("input", "type") if value != "checkbox" => None,
        _ => Some(Cow::Borrowed(value)),
    }
}
