// Inline converter: MDAST phrasing → flat list of marked text runs.
//
// Marks are threaded down the recursion as an immutable set: each wrapper
// (`strong`, `emphasis`, `delete`, `link`) extends the set it passes to its
// children, so nested wrappers accumulate and repeated ones collapse.

use markdown::mdast;

use super::{util, State};
use crate::doc::{self, Mark, Marks};

/// Convert the phrasing children of a block into normalized inline content.
pub(crate) fn phrasing<'a>(
    state: &State,
    children: impl IntoIterator<Item = &'a mdast::Node>,
) -> Vec<doc::Node> {
    let nodes = all(state, children, &Marks::new());
    util::normalize_inline(nodes)
}

/// Convert phrasing nodes under the given marks.
pub(crate) fn all<'a>(
    state: &State,
    children: impl IntoIterator<Item = &'a mdast::Node>,
    marks: &Marks,
) -> Vec<doc::Node> {
    children
        .into_iter()
        .flat_map(|child| one(state, child, marks))
        .collect()
}

/// Convert a single phrasing node under the given marks.
pub(crate) fn one(state: &State, node: &mdast::Node, marks: &Marks) -> Vec<doc::Node> {
    match node {
        mdast::Node::Text(n) => text(&n.value, marks),
        mdast::Node::Strong(n) => all(state, &n.children, &marks.with(Mark::Bold)),
        mdast::Node::Emphasis(n) => all(state, &n.children, &marks.with(Mark::Italic)),
        mdast::Node::Delete(n) => all(state, &n.children, &marks.with(Mark::Strike)),
        mdast::Node::InlineCode(n) => text(&n.value, &code_marks(marks)),
        mdast::Node::Link(n) => all(
            state,
            &n.children,
            &marks.with(Mark::Link { href: n.url.clone() }),
        ),
        mdast::Node::LinkReference(n) => match state.definition(&n.identifier) {
            Some(definition) => all(
                state,
                &n.children,
                &marks.with(Mark::Link {
                    href: definition.url.clone(),
                }),
            ),
            None => all(state, &n.children, marks),
        },
        mdast::Node::Break(_) => vec![doc::Node::HardBreak(doc::HardBreak)],
        mdast::Node::MdxJsxTextElement(n) => match n.name.as_deref() {
            Some(tag) => text(&util::placeholder(tag), marks),
            None => all(state, &n.children, marks),
        },
        // Images have no inline form; their alt text stays.
        mdast::Node::Image(n) => text(&n.alt, marks),
        mdast::Node::ImageReference(n) => text(&n.alt, marks),
        // Raw-value fallbacks: keep the source visible rather than dropping it.
        mdast::Node::Html(n) => text(&n.value, marks),
        mdast::Node::InlineMath(n) => text(&n.value, marks),
        mdast::Node::MdxTextExpression(n) => text(&n.value, marks),
        _ => vec![],
    }
}

/// A text run, or nothing for empty text.
pub(crate) fn text(value: &str, marks: &Marks) -> Vec<doc::Node> {
    if value.is_empty() {
        return vec![];
    }
    vec![doc::Node::Text(doc::Text {
        value: value.to_string(),
        marks: marks.clone(),
    })]
}

/// Inline code carries only the `code` mark. An enclosing link is kept so
/// the target is not lost.
fn code_marks(marks: &Marks) -> Marks {
    let link = marks.iter().find(|mark| matches!(mark, Mark::Link { .. }));
    match link {
        Some(link) => Marks::new().with(link.clone()).with(Mark::Code),
        None => Marks::new().with(Mark::Code),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse_mdast, transform};
    use crate::doc::{Doc, Mark, Marks, Node, Paragraph, Text};

    fn runs(markdown: &str) -> Vec<Node> {
        match transform(&parse_mdast(markdown).unwrap()) {
            Node::Doc(Doc { children }) => match children.into_iter().next() {
                Some(Node::Paragraph(Paragraph { children })) => children,
                other => panic!("expected paragraph, got {other:?}"),
            },
            other => panic!("expected doc, got {other:?}"),
        }
    }

    fn run(value: &str, marks: &[Mark]) -> Node {
        Node::Text(Text {
            value: value.into(),
            marks: marks.iter().cloned().collect(),
        })
    }

    #[test]
    fn test_plain_text_has_no_marks() {
        assert_eq!(runs("hello"), vec![run("hello", &[])]);
    }

    #[test]
    fn test_nested_marks_accumulate_outer_first() {
        assert_eq!(
            runs("***both***"),
            vec![Node::Text(Text {
                value: "both".into(),
                marks: Marks::new().with(Mark::Italic).with(Mark::Bold),
            })]
        );
        assert_eq!(
            runs("**a *b* c**"),
            vec![
                run("a ", &[Mark::Bold]),
                run("b", &[Mark::Bold, Mark::Italic]),
                run(" c", &[Mark::Bold]),
            ]
        );
    }

    #[test]
    fn test_repeated_mark_collapses() {
        assert_eq!(runs("**a __b__**"), vec![run("a b", &[Mark::Bold])]);
    }

    #[test]
    fn test_inline_code_only_code_mark() {
        assert_eq!(
            runs("**`x`**"),
            vec![run("x", &[Mark::Code])]
        );
    }

    #[test]
    fn test_inline_code_keeps_link() {
        let href = Mark::Link { href: "https://x.test".into() };
        assert_eq!(
            runs("[`x`](https://x.test)"),
            vec![run("x", &[href, Mark::Code])]
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(runs("~~gone~~"), vec![run("gone", &[Mark::Strike])]);
    }

    #[test]
    fn test_link_reference_resolves() {
        let href = Mark::Link { href: "https://x.test".into() };
        assert_eq!(
            runs("see [docs][d]\n\n[d]: https://x.test"),
            vec![run("see ", &[]), run("docs", &[href])]
        );
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(
            runs("a\\\nb"),
            vec![run("a", &[]), Node::HardBreak(crate::doc::HardBreak), run("b", &[])]
        );
    }

    #[test]
    fn test_image_in_link_keeps_alt() {
        let href = Mark::Link { href: "https://x.test".into() };
        assert_eq!(
            runs("[![badge](b.svg)](https://x.test) passing"),
            vec![run("badge", &[href]), run(" passing", &[])]
        );
    }

    #[test]
    fn test_image_in_heading_keeps_alt() {
        let blocks = match transform(&parse_mdast("## Logo ![mark](m.png)").unwrap()) {
            Node::Doc(Doc { children }) => children,
            other => panic!("expected doc, got {other:?}"),
        };
        assert_eq!(
            blocks,
            vec![Node::Heading(crate::doc::Heading {
                level: 2,
                children: vec![run("Logo mark", &[])],
            })]
        );
    }

    #[test]
    fn test_nested_component_is_placeholder() {
        assert_eq!(
            runs("**see <Widget /> here**"),
            vec![run("see <Widget /> here", &[Mark::Bold])]
        );
    }
}
