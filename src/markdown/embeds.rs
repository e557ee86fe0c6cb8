//! Obsidian image embeds (`![[name]]`).

use comrak::Arena;
use comrak::nodes::{AstNode, NodeLink, NodeValue};
use regex::Regex;
use std::sync::LazyLock;

use super::ImageResolver;
use super::tree::{new_node, new_text, rebuild_children};

/// Embed syntax; the name stops at the first `]]`.
static EMBED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[(.*?)\]\]").unwrap());

/// Piece of a text fragment split around embeds.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'t> {
    Literal(&'t str),
    Embed(&'t str),
}

/// Splits `text` into literal runs and embed names, in reading order.
///
/// Whitespace-only literal runs are dropped.
fn split_embeds(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for captures in EMBED_PATTERN.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        push_literal(&mut segments, &text[last_end..whole.start()]);
        segments.push(Segment::Embed(name.as_str()));
        last_end = whole.end();
    }
    push_literal(&mut segments, &text[last_end..]);

    segments
}

fn push_literal<'t>(segments: &mut Vec<Segment<'t>>, literal: &'t str) {
    if !literal.trim().is_empty() {
        segments.push(Segment::Literal(literal));
    }
}

/// Replaces embed syntax in text nodes with image nodes.
///
/// Each text node holding at least one `![[name]]` is replaced in place by
/// its literal runs (as text nodes) and one image per embed, with the raw
/// name as alt text and the URL from `resolver`. Other text nodes are not
/// touched. The candidates are fixed before any replacement, so generated
/// nodes are never visited.
pub(crate) fn expand_embeds<'a>(
    arena: &'a Arena<AstNode<'a>>,
    root: &'a AstNode<'a>,
    resolver: &ImageResolver,
) {
    let parents: Vec<_> = root
        .descendants()
        .filter(|node| node.children().any(has_embed))
        .collect();

    for parent in parents {
        rebuild_children(parent, |child, _| {
            let text = match child.data.borrow().value {
                NodeValue::Text(ref text) if EMBED_PATTERN.is_match(text) => text.clone(),
                _ => return None,
            };

            let nodes = split_embeds(&text)
                .into_iter()
                .map(|segment| match segment {
                    Segment::Literal(literal) => new_text(arena, literal),
                    Segment::Embed(name) => image_node(arena, resolver, name),
                })
                .collect();
            Some(nodes)
        });
    }
}

fn has_embed<'a>(node: &'a AstNode<'a>) -> bool {
    matches!(node.data.borrow().value, NodeValue::Text(ref text) if EMBED_PATTERN.is_match(text))
}

/// Builds an image node; the alt text lives in a text child.
fn image_node<'a>(
    arena: &'a Arena<AstNode<'a>>,
    resolver: &ImageResolver,
    name: &str,
) -> &'a AstNode<'a> {
    let image = new_node(
        arena,
        NodeValue::Image(NodeLink {
            url: resolver.url(name),
            title: String::new(),
        }),
    );
    image.append(new_text(arena, name));
    image
}
