// MDAST → document tree transform
//
// Parses Markdown (with MDX JSX component tags) via markdown-rs and walks the
// resulting tree, dispatching each node to a handler that produces document
// nodes. Inline content is flattened into marked text runs.

pub(crate) mod handlers;
pub(crate) mod inline;
pub(crate) mod util;
pub(crate) mod wrap;

use std::collections::HashMap;

use markdown::mdast;
use markdown::{Constructs, ParseOptions};

use crate::doc;
use crate::error::ConvertError;

/// A link reference definition (`[label]: url "title"`).
#[derive(Debug, Clone)]
pub(crate) struct Definition {
    pub url: String,
    pub title: Option<String>,
}

/// Transformation state shared by all handlers.
pub(crate) struct State {
    /// Definitions indexed by normalized identifier.
    pub definitions: HashMap<String, Definition>,
}

impl State {
    fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Resolve a reference identifier to its definition.
    pub fn definition(&self, identifier: &str) -> Option<&Definition> {
        self.definitions.get(&util::normalize_identifier(identifier))
    }
}

/// Constructs understood by the converter. Everything the document model
/// cannot represent is switched off so its source stays visible as text.
pub(crate) fn parse_options() -> ParseOptions {
    ParseOptions {
        constructs: Constructs {
            gfm_strikethrough: true,
            mdx_jsx_flow: true,
            mdx_jsx_text: true,
            // MDX replaces these: `<` always starts a component tag.
            autolink: false,
            html_flow: false,
            html_text: false,
            code_indented: false,
            // Bare URLs would turn serialized text into links on re-parse.
            gfm_autolink_literal: false,
            ..Constructs::default()
        },
        ..ParseOptions::default()
    }
}

/// Parse Markdown into an MDAST tree.
pub(crate) fn parse_mdast(markdown: &str) -> Result<mdast::Node, ConvertError> {
    markdown::to_mdast(markdown, &parse_options())
        .map_err(|message| ConvertError::Parse(message.to_string()))
}

/// Transform an MDAST tree into a document tree rooted at `doc`.
pub(crate) fn transform(root: &mdast::Node) -> doc::Node {
    let mut state = State::new();

    // Pre-pass: index definitions so references resolve in any order.
    index_definitions(root, &mut state.definitions);

    let children = handlers::one(&state, root);
    if children.is_empty() {
        return doc::Node::empty_doc();
    }
    doc::Node::Doc(doc::Doc { children })
}

/// Recursively index all definitions by normalized identifier. The first
/// definition of an identifier wins.
fn index_definitions(node: &mdast::Node, map: &mut HashMap<String, Definition>) {
    if let mdast::Node::Definition(definition) = node {
        map.entry(util::normalize_identifier(&definition.identifier))
            .or_insert_with(|| Definition {
                url: definition.url.clone(),
                title: definition.title.clone(),
            });
    }
    if let Some(children) = node.children() {
        for child in children {
            index_definitions(child, map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(markdown: &str) -> doc::Node {
        transform(&parse_mdast(markdown).unwrap())
    }

    #[test]
    fn test_blank_document_is_one_empty_paragraph() {
        assert_eq!(convert("[a]: https://x.test"), doc::Node::empty_doc());
    }

    #[test]
    fn test_definitions_indexed_case_insensitively() {
        let root = parse_mdast("[Foo Bar]: https://x.test \"T\"\n\n[foo bar]").unwrap();
        let mut map = HashMap::new();
        index_definitions(&root, &mut map);
        let definition = map.get("foo bar").unwrap();
        assert_eq!(definition.url, "https://x.test");
        assert_eq!(definition.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_html_is_not_parsed() {
        // With HTML constructs off, lowercase tags are JSX; an unknown tag degrades.
        let doc = convert("<div />");
        assert_eq!(
            doc,
            doc::Node::Doc(doc::Doc {
                children: vec![doc::Node::paragraph("<div />")],
            })
        );
    }

    #[test]
    fn test_unclosed_tag_is_parse_error() {
        assert!(matches!(
            parse_mdast("<Callout>\n\ntext"),
            Err(ConvertError::Parse(_))
        ));
    }
}
