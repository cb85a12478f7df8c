// Block handlers: one case per MDAST node type.
//
// Each handler takes an MDAST node and returns zero or more document nodes.
// Unsupported nodes return nothing and are dropped from their parent.

use markdown::mdast;

use super::{inline, util, wrap, State};
use crate::doc;
use crate::registry::{self, AttrSource, Extension};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Convert all children of an MDAST node to document nodes.
pub(crate) fn all(state: &State, children: &[mdast::Node]) -> Vec<doc::Node> {
    children.iter().flat_map(|child| one(state, child)).collect()
}

/// Convert a single MDAST node to document node(s).
pub(crate) fn one(state: &State, node: &mdast::Node) -> Vec<doc::Node> {
    match node {
        mdast::Node::Root(n) => all(state, &n.children),
        mdast::Node::Paragraph(n) => wrap::paragraph(state, &n.children),
        mdast::Node::Heading(n) => vec![doc::Node::Heading(doc::Heading {
            level: n.depth,
            children: inline::phrasing(state, &n.children),
        })],
        mdast::Node::Code(n) => vec![doc::Node::CodeBlock(doc::CodeBlock {
            language: n.lang.clone().unwrap_or_default(),
            code: n.value.clone(),
        })],
        mdast::Node::Blockquote(n) => vec![doc::Node::Blockquote(doc::Blockquote {
            children: blocks(state, &n.children),
        })],
        mdast::Node::List(n) => {
            let children = all(state, &n.children);
            if n.ordered {
                vec![doc::Node::OrderedList(doc::OrderedList { children })]
            } else {
                vec![doc::Node::BulletList(doc::BulletList { children })]
            }
        }
        mdast::Node::ListItem(n) => vec![doc::Node::ListItem(doc::ListItem {
            children: blocks(state, &n.children),
        })],
        mdast::Node::ThematicBreak(_) => vec![doc::Node::HorizontalRule(doc::HorizontalRule)],
        mdast::Node::Image(n) => vec![doc::Node::Image(doc::Image {
            src: n.url.clone(),
            alt: n.alt.clone(),
            title: n.title.clone(),
        })],
        mdast::Node::ImageReference(n) => match state.definition(&n.identifier) {
            Some(definition) => vec![doc::Node::Image(doc::Image {
                src: definition.url.clone(),
                alt: n.alt.clone(),
                title: definition.title.clone(),
            })],
            None => vec![doc::Node::paragraph(n.alt.as_str())],
        },
        mdast::Node::MdxJsxFlowElement(n) => {
            element(state, n.name.as_deref(), &n.attributes, &n.children)
        }
        mdast::Node::MdxJsxTextElement(n) => {
            element(state, n.name.as_deref(), &n.attributes, &n.children)
        }
        _ => vec![],
    }
}

/// Convert block children, guaranteeing at least one block.
fn blocks(state: &State, children: &[mdast::Node]) -> Vec<doc::Node> {
    let blocks = container(state, children);
    if blocks.is_empty() {
        vec![doc::Node::Paragraph(doc::Paragraph::default())]
    } else {
        blocks
    }
}

/// Convert the children of a container. Phrasing children (from a text-level
/// component tag) are wrapped in a paragraph.
fn container(state: &State, children: &[mdast::Node]) -> Vec<doc::Node> {
    if children.iter().any(util::is_phrasing) {
        wrap::paragraph(state, children)
    } else {
        all(state, children)
    }
}

// ---------------------------------------------------------------------------
// Component tags
// ---------------------------------------------------------------------------

/// Convert a component tag. Fragments (`<>...</>`) are transparent; tags
/// missing from the registry degrade to a visible placeholder paragraph.
fn element(
    state: &State,
    name: Option<&str>,
    attributes: &[mdast::AttributeContent],
    children: &[mdast::Node],
) -> Vec<doc::Node> {
    let Some(tag) = name else {
        return container(state, children);
    };
    match registry::by_tag(tag) {
        Some(ext) => vec![custom(state, ext, attributes, children)],
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!(tag, "unknown component tag; keeping a placeholder");
            vec![doc::Node::paragraph(util::placeholder(tag))]
        }
    }
}

/// Build a registered custom node from its tag.
fn custom(
    state: &State,
    ext: &Extension,
    attributes: &[mdast::AttributeContent],
    children: &[mdast::Node],
) -> doc::Node {
    let mut node = doc::Custom::new(ext.kind);
    for spec in ext.attrs {
        let value = match spec.source {
            AttrSource::Attribute => spec.coerce(util::attribute(attributes, spec.name)),
            AttrSource::Body => util::body_text(children),
        };
        node.attrs.insert(spec.name.to_string(), value);
    }
    if ext.is_atomic() {
        doc::Node::Custom(node)
    } else {
        doc::Node::Custom(node.with_children(container(state, children)))
    }
}
