//! Ordered list cleanup.
//!
//! A break directly after an ordered list marker renders as an empty first
//! line inside the item. This pass drops that leading break.

use comrak::nodes::{AstNode, ListType, NodeValue};

use crate::error::RenderError;

const PASS: &str = "ordered list";

/// Removes a break node opening the first paragraph of an ordered list item.
///
/// Only the break at position 0 is removed; unordered lists and any later
/// breaks are left alone. Items without children are skipped.
///
/// # Errors
///
/// Returns [`RenderError::Transform`] when a list item is not a child of a
/// list node.
pub(crate) fn normalize_ordered_lists<'a>(root: &'a AstNode<'a>) -> Result<(), RenderError> {
    let items: Vec<_> = root
        .descendants()
        .filter(|node| {
            matches!(
                node.data.borrow().value,
                NodeValue::Item(_) | NodeValue::TaskItem(_)
            )
        })
        .collect();

    for item in items {
        if !in_ordered_list(item)? {
            continue;
        }

        let Some(paragraph) = item.first_child() else {
            continue;
        };
        if !matches!(paragraph.data.borrow().value, NodeValue::Paragraph) {
            continue;
        }

        if let Some(first) = paragraph.first_child()
            && matches!(first.data.borrow().value, NodeValue::LineBreak)
        {
            first.detach();
        }
    }

    Ok(())
}

/// Tells whether the list enclosing `item` is ordered.
fn in_ordered_list<'a>(item: &'a AstNode<'a>) -> Result<bool, RenderError> {
    let parent = item
        .parent()
        .ok_or_else(|| RenderError::transform(PASS, "list item has no parent"))?;

    match parent.data.borrow().value {
        NodeValue::List(ref list) => Ok(list.list_type == ListType::Ordered),
        _ => Err(RenderError::transform(
            PASS,
            "list item is not inside a list",
        )),
    }
}
