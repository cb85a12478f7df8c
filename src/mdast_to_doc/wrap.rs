// Paragraph splitting.
//
// Images and component tags are blocks in the document tree but phrasing in
// MDAST. When a paragraph contains them at its top level, the phrasing runs
// between them become paragraphs and each image/component becomes a block,
// in source order.

use markdown::mdast;

use super::{handlers, inline, State};
use crate::doc;

/// Convert a paragraph's children into one or more blocks.
pub(crate) fn paragraph(state: &State, children: &[mdast::Node]) -> Vec<doc::Node> {
    let mut result = Vec::new();
    let mut phrasing_run: Vec<&mdast::Node> = Vec::new();

    for child in children {
        if is_block_like(state, child) {
            flush(state, &mut phrasing_run, &mut result);
            result.extend(handlers::one(state, child));
        } else {
            phrasing_run.push(child);
        }
    }

    // Flush trailing phrasing run.
    flush(state, &mut phrasing_run, &mut result);

    result
}

/// Emit the pending phrasing run as a paragraph, unless it is blank.
fn flush(state: &State, phrasing_run: &mut Vec<&mdast::Node>, result: &mut Vec<doc::Node>) {
    if phrasing_run.is_empty() {
        return;
    }
    let children = inline::phrasing(state, phrasing_run.drain(..));
    if !children.is_empty() {
        result.push(doc::Node::Paragraph(doc::Paragraph { children }));
    }
}

/// Phrasing nodes that become blocks of their own.
fn is_block_like(state: &State, node: &mdast::Node) -> bool {
    match node {
        mdast::Node::Image(_) => true,
        mdast::Node::ImageReference(n) => state.definition(&n.identifier).is_some(),
        mdast::Node::MdxJsxTextElement(n) => n.name.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse_mdast, transform};
    use crate::doc::{Custom, Doc, Image, Node};
    use crate::registry::ExtensionKind;

    fn blocks(markdown: &str) -> Vec<Node> {
        match transform(&parse_mdast(markdown).unwrap()) {
            Node::Doc(Doc { children }) => children,
            other => panic!("expected doc, got {other:?}"),
        }
    }

    #[test]
    fn test_split_around_component() {
        assert_eq!(
            blocks("Watch <YouTube id=\"x\" /> now"),
            vec![
                Node::paragraph("Watch"),
                Node::Custom(Custom::new(ExtensionKind::YouTube).with_attr("id", "x")),
                Node::paragraph("now"),
            ]
        );
    }

    #[test]
    fn test_split_around_image() {
        assert_eq!(
            blocks("Before ![cat](cat.png) after"),
            vec![
                Node::paragraph("Before"),
                Node::Image(Image {
                    src: "cat.png".into(),
                    alt: "cat".into(),
                    title: None,
                }),
                Node::paragraph("after"),
            ]
        );
    }

    #[test]
    fn test_unknown_inline_tag_becomes_placeholder_block() {
        assert_eq!(
            blocks("Look: <Gadget size=\"2\" />"),
            vec![Node::paragraph("Look:"), Node::paragraph("<Gadget />")]
        );
    }

    #[test]
    fn test_whitespace_only_runs_dropped() {
        assert_eq!(
            blocks("![a](a.png) ![b](b.png)").len(),
            2
        );
    }
}
