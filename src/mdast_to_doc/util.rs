// Shared utilities for the mdast_to_doc module.

use markdown::mdast;

use crate::doc::{self, Mark};

/// Read a literal attribute from a component tag. Absent attributes, bare
/// boolean attributes and `{expression}` values all read as `None`. When an
/// attribute is repeated the last one wins, as in JSX.
pub(crate) fn attribute<'a>(
    attributes: &'a [mdast::AttributeContent],
    name: &str,
) -> Option<&'a str> {
    let property = attributes.iter().rev().find_map(|attribute| match attribute {
        mdast::AttributeContent::Property(property) if property.name == name => Some(property),
        _ => None,
    })?;
    match &property.value {
        Some(mdast::AttributeValue::Literal(value)) => Some(value.as_str()),
        _ => None,
    }
}

/// Visible stand-in for a component tag that cannot be represented.
pub(crate) fn placeholder(tag: &str) -> String {
    format!("<{tag} />")
}

/// Text nested inside a component tag. Phrasing is concatenated as-is;
/// sibling blocks are separated by as many line endings as in the source.
pub(crate) fn body_text(children: &[mdast::Node]) -> String {
    if children.iter().any(is_phrasing) {
        return children.iter().map(text_content).collect();
    }
    let mut body = String::new();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            body.push_str(&"\n".repeat(line_gap(&children[i - 1], child)));
        }
        body.push_str(&text_content(child));
    }
    body
}

/// Line endings between the end of one block and the start of the next.
/// Without positions, blocks are one blank line apart.
fn line_gap(previous: &mdast::Node, next: &mdast::Node) -> usize {
    match (previous.position(), next.position()) {
        (Some(previous), Some(next)) if next.start.line > previous.end.line => {
            next.start.line - previous.end.line
        }
        _ => 2,
    }
}

/// Concatenated text of an MDAST node and its descendants.
pub(crate) fn text_content(node: &mdast::Node) -> String {
    match node {
        mdast::Node::Text(n) => n.value.clone(),
        mdast::Node::InlineCode(n) => n.value.clone(),
        mdast::Node::Code(n) => n.value.clone(),
        mdast::Node::Html(n) => n.value.clone(),
        mdast::Node::InlineMath(n) => n.value.clone(),
        mdast::Node::MdxTextExpression(n) => n.value.clone(),
        mdast::Node::Break(_) => "\n".to_string(),
        _ => node
            .children()
            .map(|children| children.iter().map(text_content).collect())
            .unwrap_or_default(),
    }
}

/// Whether an MDAST node is phrasing (inline) content.
pub(crate) fn is_phrasing(node: &mdast::Node) -> bool {
    matches!(
        node,
        mdast::Node::Text(_)
            | mdast::Node::Strong(_)
            | mdast::Node::Emphasis(_)
            | mdast::Node::Delete(_)
            | mdast::Node::InlineCode(_)
            | mdast::Node::Link(_)
            | mdast::Node::LinkReference(_)
            | mdast::Node::Break(_)
            | mdast::Node::Image(_)
            | mdast::Node::ImageReference(_)
            | mdast::Node::MdxJsxTextElement(_)
            | mdast::Node::InlineMath(_)
            | mdast::Node::MdxTextExpression(_)
            | mdast::Node::FootnoteReference(_)
    )
}

/// Normalize a reference identifier: collapse whitespace, ignore case.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Merge adjacent text runs with identical marks, trim whitespace at the
/// block edges and drop empty runs.
pub(crate) fn normalize_inline(nodes: Vec<doc::Node>) -> Vec<doc::Node> {
    let mut result: Vec<doc::Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Some(doc::Node::Text(last)), doc::Node::Text(next)) = (result.last_mut(), &node) {
            if last.marks == next.marks {
                last.value.push_str(&next.value);
                continue;
            }
        }
        result.push(node);
    }

    trim_edges(&mut result);
    result.retain(|node| !matches!(node, doc::Node::Text(t) if t.value.is_empty()));
    result
}

/// Trim leading whitespace from the first run and trailing whitespace from
/// the last. Code spans keep their whitespace.
fn trim_edges(nodes: &mut [doc::Node]) {
    if let Some(doc::Node::Text(first)) = nodes.first_mut() {
        if !first.marks.contains(&Mark::Code) {
            first.value = first.value.trim_start().to_string();
        }
    }
    if let Some(doc::Node::Text(last)) = nodes.last_mut() {
        if !last.marks.contains(&Mark::Code) {
            last.value = last.value.trim_end().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Marks, Node, Text};

    fn run(value: &str, marks: Marks) -> Node {
        Node::Text(Text {
            value: value.into(),
            marks,
        })
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder("UnknownWidget"), "<UnknownWidget />");
    }

    #[test]
    fn test_body_text_keeps_blank_lines() {
        let root = super::super::parse_mdast(
            "<CodePlayground>\na\nb\n\n\n\\# c\n</CodePlayground>",
        )
        .unwrap();
        let Some(mdast::Node::MdxJsxFlowElement(element)) =
            root.children().and_then(|children| children.first())
        else {
            panic!("expected component, got {root:?}");
        };
        assert_eq!(body_text(&element.children), "a\nb\n\n\n# c");
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  Foo \n  BAR "), "foo bar");
    }

    #[test]
    fn test_normalize_inline_merges_equal_marks() {
        let bold = Marks::new().with(Mark::Bold);
        let nodes = vec![
            run("a", bold.clone()),
            run("b", bold.clone()),
            run("c", Marks::new()),
        ];
        assert_eq!(
            normalize_inline(nodes),
            vec![run("ab", bold), run("c", Marks::new())]
        );
    }

    #[test]
    fn test_normalize_inline_trims_edges() {
        let nodes = vec![run("  a ", Marks::new()), run(" b  ", Marks::new().with(Mark::Bold))];
        assert_eq!(
            normalize_inline(nodes),
            vec![
                run("a ", Marks::new()),
                run(" b", Marks::new().with(Mark::Bold))
            ]
        );
    }

    #[test]
    fn test_normalize_inline_keeps_code_whitespace() {
        let code = Marks::new().with(Mark::Code);
        let nodes = vec![run(" x ", code.clone())];
        assert_eq!(normalize_inline(nodes), vec![run(" x ", code)]);
    }

    #[test]
    fn test_normalize_inline_drops_blank() {
        assert!(normalize_inline(vec![run("   ", Marks::new())]).is_empty());
    }
}
