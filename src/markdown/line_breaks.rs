//! Obsidian style line breaks.
//!
//! Obsidian renders a single newline inside a paragraph as a visible line
//! break, where CommonMark folds it into a space. This pass turns every line
//! ending inside a paragraph into an explicit break node.

use comrak::Arena;
use comrak::nodes::{AstNode, NodeValue};

use super::tree::{new_node, rebuild_children};

/// Inserts a break node after every paragraph text fragment ending in `\n`.
///
/// The trailing newline is stripped from the fragment. The last child of a
/// paragraph is never rewritten, and nodes outside paragraphs are ignored.
pub(crate) fn preserve_line_breaks<'a>(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>) {
    let paragraphs: Vec<_> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Paragraph))
        .collect();

    for paragraph in paragraphs {
        rebuild_children(paragraph, |child, is_last| {
            if is_last {
                return None;
            }

            if let NodeValue::Text(ref mut text) = child.data.borrow_mut().value
                && text.ends_with('\n')
            {
                text.pop();
            } else {
                return None;
            }

            Some(vec![child, new_node(arena, NodeValue::LineBreak)])
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tree::test_support::{child_kinds, find};
    use crate::markdown::tree::{markdown_options, parse_document};

    fn paragraphs<'a>(root: &'a AstNode<'a>) -> Vec<&'a AstNode<'a>> {
        root.descendants()
            .filter(|node| matches!(node.data.borrow().value, NodeValue::Paragraph))
            .collect()
    }

    #[test]
    fn test_single_newline_becomes_break() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "first line\nsecond line", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        assert_eq!(
            child_kinds(paragraphs(root)[0]),
            vec!["text:first line", "break", "text:second line"]
        );
    }

    #[test]
    fn test_consecutive_lines_each_get_a_break() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "a\nb\nc\nd", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        assert_eq!(
            child_kinds(paragraphs(root)[0]),
            vec!["text:a", "break", "text:b", "break", "text:c", "break", "text:d"]
        );
    }

    #[test]
    fn test_single_line_paragraph_unchanged() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "just one line", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        assert_eq!(child_kinds(paragraphs(root)[0]), vec!["text:just one line"]);
    }

    #[test]
    fn test_separate_paragraphs_stay_separate() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "first\n\nsecond", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        let found = paragraphs(root);
        assert_eq!(found.len(), 2, "Blank line should still split paragraphs");
        assert_eq!(child_kinds(found[0]), vec!["text:first"]);
        assert_eq!(child_kinds(found[1]), vec!["text:second"]);
    }

    #[test]
    fn test_existing_hard_break_not_duplicated() {
        // Arrange: two trailing spaces already produce a hard break
        let arena = Arena::new();
        let root = parse_document(&arena, "first  \nsecond", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        assert_eq!(
            child_kinds(paragraphs(root)[0]),
            vec!["text:first", "break", "text:second"]
        );
    }

    #[test]
    fn test_text_inside_emphasis_untouched() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "*one\ntwo*", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        let emph = find(root, |value| matches!(value, NodeValue::Emph)).expect("Should have emph");
        assert_eq!(child_kinds(emph), vec!["text:one\n", "text:two"]);
    }

    #[test]
    fn test_lines_inside_list_item_paragraph() {
        // Arrange
        let arena = Arena::new();
        let root = parse_document(&arena, "- item\n  continued", &markdown_options());

        // Act
        preserve_line_breaks(&arena, root);

        // Assert
        assert_eq!(
            child_kinds(paragraphs(root)[0]),
            vec!["text:item", "break", "text:continued"]
        );
    }
}
