// Block-level container serialization.
//
// Serializes block children separated by blank lines. List items put a
// nested list on the line directly after the preceding block.

use super::State;
use crate::doc::Node;

/// Serialize block children with a blank line between them.
/// Used for doc, blockquote, callout and unknown containers.
pub(crate) fn container_flow(state: &mut State, children: &[Node]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(children.len());

    for child in children {
        let content = super::handlers::handle(state, child);
        if content.is_empty() {
            continue;
        }
        reset_list_tracking(state, child);
        parts.push(content);
    }

    parts.join("\n\n")
}

/// Serialize the blocks of one list item. Nested lists follow the previous
/// block on the next line; other blocks are separated by a blank line.
pub(crate) fn container_list_item(state: &mut State, children: &[Node]) -> String {
    let mut result = String::new();

    for child in children {
        let content = super::handlers::handle(state, child);
        if content.is_empty() {
            continue;
        }
        reset_list_tracking(state, child);
        if !result.is_empty() {
            if is_list(child) {
                result.push('\n');
            } else {
                result.push_str("\n\n");
            }
        }
        result.push_str(&content);
    }

    result
}

/// Forget the last list marker once a sibling of another kind was emitted.
fn reset_list_tracking(state: &mut State, child: &Node) {
    if !matches!(child, Node::BulletList(_)) {
        state.bullet_last_used = None;
    }
    if !matches!(child, Node::OrderedList(_)) {
        state.ordered_last_used = None;
    }
}

fn is_list(node: &Node) -> bool {
    matches!(node, Node::BulletList(_) | Node::OrderedList(_))
}
