// Node type handlers for document tree → Markdown serialization.
//
// One handler per block node type. Each takes a State and node, returns a String.

use super::State;
use crate::doc::{self, Node};
use crate::registry::AttrSource;

/// Dispatch to the appropriate handler for a node.
pub(crate) fn handle(state: &mut State, node: &Node) -> String {
    match node {
        Node::Doc(n) => super::flow::container_flow(state, &n.children),
        Node::Paragraph(n) => handle_paragraph(state, n),
        Node::Heading(n) => handle_heading(state, n),
        Node::CodeBlock(n) => handle_code_block(state, n),
        Node::Blockquote(n) => handle_blockquote(state, n),
        Node::BulletList(n) => handle_list(state, &n.children, false),
        Node::OrderedList(n) => handle_list(state, &n.children, true),
        Node::ListItem(n) => super::flow::container_list_item(state, &n.children),
        Node::HorizontalRule(_) => handle_horizontal_rule(state),
        Node::Image(n) => handle_image(n),
        Node::Custom(n) => handle_custom(state, n),
        // Inline content out of place: serialize it as a line of text.
        Node::Text(_) | Node::HardBreak(_) => {
            state.at_line_start = true;
            super::phrasing::container_phrasing(state, std::slice::from_ref(node))
        }
        Node::Unknown(n) => handle_unknown(state, n),
    }
}

// ---------------------------------------------------------------------------
// Block handlers
// ---------------------------------------------------------------------------

fn handle_paragraph(state: &mut State, node: &doc::Paragraph) -> String {
    state.at_line_start = true;
    super::phrasing::container_phrasing(state, &node.children)
}

fn handle_heading(state: &mut State, node: &doc::Heading) -> String {
    state.at_line_start = false;
    let content = super::phrasing::container_phrasing(state, &node.children);
    // ATX headings cannot span lines.
    let content = super::escape::escape_closing_hashes(&content.replace('\n', " "));
    let hashes = "#".repeat(usize::from(node.level.clamp(1, 6)));
    if content.is_empty() {
        hashes
    } else {
        format!("{} {}", hashes, content)
    }
}

fn handle_horizontal_rule(state: &mut State) -> String {
    let count = usize::from(state.options.rule_repetition.max(3));
    std::iter::repeat(state.options.rule).take(count).collect()
}

fn handle_blockquote(state: &mut State, node: &doc::Blockquote) -> String {
    let content = super::flow::container_flow(state, &node.children);
    if content.is_empty() {
        return ">".to_string();
    }
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn handle_list(state: &mut State, items: &[Node], ordered: bool) -> String {
    // A list directly after a sibling list of the same kind switches marker,
    // otherwise the two merge into one list when parsed again.
    let marker = if ordered {
        let preferred = state.options.bullet_ordered;
        if state.ordered_last_used == Some(preferred) {
            if preferred == '.' { ')' } else { '.' }
        } else {
            preferred
        }
    } else {
        let preferred = state.options.bullet;
        if state.bullet_last_used == Some(preferred) {
            if preferred == '*' { '-' } else { '*' }
        } else {
            preferred
        }
    };

    let mut result = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let prefix = if ordered {
            format!("{}{}", i + 1, marker)
        } else {
            marker.to_string()
        };

        // Nested lists in one item must not affect the next item's lists.
        state.bullet_last_used = None;
        state.ordered_last_used = None;
        let content = handle(state, item);
        result.push(indent_item(&prefix, &content));
    }

    state.bullet_last_used = None;
    state.ordered_last_used = None;
    if ordered {
        state.ordered_last_used = Some(marker);
    } else {
        state.bullet_last_used = Some(marker);
    }

    result.join("\n")
}

/// Put the marker before the first line and indent continuation lines to
/// the item's content column.
fn indent_item(prefix: &str, content: &str) -> String {
    let indent = " ".repeat(prefix.len() + 1);
    let mut lines = content.lines();

    let mut item = match lines.next() {
        Some(first) if !first.is_empty() => format!("{} {}", prefix, first),
        _ => prefix.to_string(),
    };
    for line in lines {
        item.push('\n');
        if !line.is_empty() {
            item.push_str(&indent);
            item.push_str(line);
        }
    }
    item
}

fn handle_code_block(state: &mut State, node: &doc::CodeBlock) -> String {
    let fence = fence_for(&node.code, state.options.fence);
    let language = &node.language;

    if node.code.is_empty() {
        format!("{}{}\n{}", fence, language, fence)
    } else {
        format!("{}{}\n{}\n{}", fence, language, node.code, fence)
    }
}

/// Shortest fence (minimum 3) longer than any fence-like line in `code`.
fn fence_for(code: &str, fence_char: char) -> String {
    let content_max = code
        .lines()
        .filter_map(|line| {
            let run = line.trim_start().chars().take_while(|&c| c == fence_char).count();
            (run >= 3).then_some(run)
        })
        .max()
        .unwrap_or(0);
    let fence_len = (content_max + 1).max(3);
    std::iter::repeat(fence_char).take(fence_len).collect()
}

fn handle_image(node: &doc::Image) -> String {
    let alt = super::escape::escape_inline(&node.alt);
    let src = super::escape::escape_destination(&node.src);
    match &node.title {
        Some(title) => format!("![{}]({} \"{}\")", alt, src, title.replace('"', "\\\"")),
        None => format!("![{}]({})", alt, src),
    }
}

// ---------------------------------------------------------------------------
// Component tags
// ---------------------------------------------------------------------------

fn handle_custom(state: &mut State, node: &doc::Custom) -> String {
    let extension = node.kind.extension();
    let tag = extension.tag;

    let mut open = format!("<{}", tag);
    for spec in extension
        .attrs
        .iter()
        .filter(|spec| spec.source == AttrSource::Attribute)
    {
        open.push(' ');
        open.push_str(&attribute(spec.name, node.attr(spec.name)));
    }

    if let Some(body) = node.body() {
        let body = super::escape::escape_verbatim(body);
        return format!("{}>\n{}\n</{}>", open, body, tag);
    }
    if extension.is_atomic() {
        return format!("{} />", open);
    }

    let content = super::flow::container_flow(state, &node.children);
    if content.trim().is_empty() {
        format!("{}>\n</{}>", open, tag)
    } else {
        format!("{}>\n\n{}\n\n</{}>", open, content, tag)
    }
}

/// `name="value"`, or single quotes when the value holds a double quote.
/// Values holding both quote kinds encode `"` as `&quot;`. A `&` that would
/// read as a character reference is encoded too.
fn attribute(name: &str, value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        if c == '&' && next.is_some_and(|n| n.is_ascii_alphanumeric() || n == '#') {
            encoded.push_str("&amp;");
        } else {
            encoded.push(c);
        }
    }

    match (encoded.contains('"'), encoded.contains('\'')) {
        (false, _) => format!("{}=\"{}\"", name, encoded),
        (true, false) => format!("{}='{}'", name, encoded),
        (true, true) => format!("{}=\"{}\"", name, encoded.replace('"', "&quot;")),
    }
}

fn handle_unknown(state: &mut State, node: &doc::Unknown) -> String {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_type = %node.node_type, "serializing children of unknown node");

    if node.children.is_empty() {
        return String::new();
    }
    super::flow::container_flow(state, &node.children)
}
