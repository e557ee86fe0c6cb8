//! Document tree plumbing shared by the rewrite passes.
//!
//! The tree is comrak's arena tree. Parsing goes through [`parse_document`],
//! which reshapes comrak's inline layout so that a line ending inside a
//! paragraph is carried as a trailing `\n` on the text fragment before it.
//! That is the shape the line-break pass works on.

use comrak::arena_tree::Node;
use comrak::nodes::{Ast, AstNode, LineColumn, NodeValue};
use comrak::{Arena, Options};
use std::cell::RefCell;

/// Parser and converter options: CommonMark plus GFM, raw HTML passthrough.
///
/// Raw HTML is let through the converter on purpose; the sanitizer stage
/// strips whatever is not allowed afterwards.
pub(crate) fn markdown_options<'c>() -> Options<'c> {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.render.unsafe_ = true;

    options
}

/// Parses markdown into a tree allocated in `arena`.
pub(crate) fn parse_document<'a>(
    arena: &'a Arena<AstNode<'a>>,
    content: &str,
    options: &Options,
) -> &'a AstNode<'a> {
    let root = comrak::parse_document(arena, content, options);

    let containers: Vec<_> = root.descendants().collect();
    for container in containers {
        fold_line_endings(container);
    }

    root
}

/// Merges adjacent text children and folds a soft break into the text before it.
///
/// `a`, soft break, `b` becomes `a\n`, `b`. The fragment after a folded
/// break is never merged, so each source line stays its own text node.
fn fold_line_endings<'a>(parent: &'a AstNode<'a>) {
    let mut cursor = parent.first_child();

    while let Some(node) = cursor {
        if let NodeValue::Text(ref mut text) = node.data.borrow_mut().value {
            while let Some(next) = node.next_sibling() {
                let folded_break = match next.data.borrow().value {
                    NodeValue::Text(ref more) => {
                        text.push_str(more);
                        false
                    }
                    NodeValue::SoftBreak => {
                        text.push('\n');
                        true
                    }
                    _ => break,
                };
                next.detach();
                if folded_break {
                    break;
                }
            }
        }
        cursor = node.next_sibling();
    }
}

/// Allocates a detached node holding `value`.
pub(crate) fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    let start = LineColumn { line: 0, column: 0 };
    arena.alloc(Node::new(RefCell::new(Ast::new(value, start))))
}

/// Allocates a detached text node.
pub(crate) fn new_text<'a>(arena: &'a Arena<AstNode<'a>>, value: impl Into<String>) -> &'a AstNode<'a> {
    new_node(arena, NodeValue::Text(value.into()))
}

/// Replaces the children of `parent` with a freshly built sequence.
///
/// `rewrite` sees every original child once, in order, together with a flag
/// telling whether it is the last child. Returning `None` keeps the child as
/// it is; `Some(nodes)` puts `nodes` in its place (an empty vector removes
/// it). Nodes produced by `rewrite` are never passed back into it. The
/// parent is left untouched when nothing was rewritten.
pub(crate) fn rebuild_children<'a, F>(parent: &'a AstNode<'a>, mut rewrite: F)
where
    F: FnMut(&'a AstNode<'a>, bool) -> Option<Vec<&'a AstNode<'a>>>,
{
    let original: Vec<_> = parent.children().collect();
    let count = original.len();

    let mut rebuilt = Vec::with_capacity(count);
    let mut changed = false;

    for (index, &child) in original.iter().enumerate() {
        match rewrite(child, index + 1 == count) {
            Some(nodes) => {
                changed = true;
                rebuilt.extend(nodes);
            }
            None => rebuilt.push(child),
        }
    }

    if !changed {
        return;
    }

    for child in original {
        child.detach();
    }
    for node in rebuilt {
        parent.append(node);
    }
}
