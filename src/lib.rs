// mdxdoc: bidirectional converter between MDX-flavored Markdown and an
// editor document tree, using AST-to-AST transformation.
//
// Architecture:
//   Markdown string → markdown-rs parse → MDAST → mdast_to_doc → document tree
//   document tree → stringify → Markdown string
//
// Custom component tags (`<Callout>`, `<YouTube>`, …) are declared once in
// the extension registry and read by both directions.

pub mod doc;
mod error;
mod mdast_to_doc;
pub mod registry;
mod stringify;

pub use doc::{Mark, Marks, Node};
pub use error::ConvertError;
pub use markdown::mdast;
pub use stringify::StringifyOptions;

/// Conversion options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Serializer formatting options.
    pub stringify: StringifyOptions,
}

impl Options {
    /// Create a new Options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unordered list bullet character.
    pub fn with_bullet(mut self, bullet: char) -> Self {
        self.stringify.bullet = bullet;
        self
    }

    /// Set the ordered list delimiter character.
    pub fn with_bullet_ordered(mut self, bullet: char) -> Self {
        self.stringify.bullet_ordered = bullet;
        self
    }

    /// Set the emphasis marker character.
    pub fn with_emphasis(mut self, marker: char) -> Self {
        self.stringify.emphasis = marker;
        self
    }

    /// Set the strong marker character.
    pub fn with_strong(mut self, marker: char) -> Self {
        self.stringify.strong = marker;
        self
    }

    /// Set the fenced code block marker character.
    pub fn with_fence(mut self, fence: char) -> Self {
        self.stringify.fence = fence;
        self
    }

    /// Set the thematic break rule character.
    pub fn with_rule(mut self, rule: char) -> Self {
        self.stringify.rule = rule;
        self
    }

    /// Set the number of thematic break markers.
    pub fn with_rule_repetition(mut self, count: u8) -> Self {
        self.stringify.rule_repetition = count;
        self
    }
}

/// Parse Markdown into a document tree.
///
/// Never fails: blank input yields a document with one empty paragraph, and
/// input the Markdown parser rejects yields a document with one paragraph
/// holding the input verbatim.
///
/// # Examples
///
/// ```
/// let doc = mdxdoc::parse("<YouTube id=\"abc123\" />");
/// assert_eq!(mdxdoc::serialize(&doc), "<YouTube id=\"abc123\" />");
/// ```
pub fn parse(markdown: &str) -> Node {
    match try_parse(markdown) {
        Ok(doc) => doc,
        Err(_error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_error, "markdown parse failed, keeping raw text");
            Node::Doc(doc::Doc {
                children: vec![Node::paragraph(markdown)],
            })
        }
    }
}

/// Parse Markdown into a document tree, reporting parser failures.
///
/// # Examples
///
/// ```
/// assert!(mdxdoc::try_parse("<Callout>\n\nunclosed").is_err());
/// ```
pub fn try_parse(markdown: &str) -> Result<Node, ConvertError> {
    if markdown.trim().is_empty() {
        return Ok(Node::empty_doc());
    }
    let mdast = parse_mdast(markdown)?;
    Ok(mdast_to_doc(&mdast))
}

/// Parse Markdown (with component tags) into an MDAST tree.
pub fn parse_mdast(markdown: &str) -> Result<mdast::Node, ConvertError> {
    mdast_to_doc::parse_mdast(markdown)
}

/// Transform an MDAST tree into a document tree.
pub fn mdast_to_doc(node: &mdast::Node) -> Node {
    mdast_to_doc::transform(node)
}

/// Serialize a document tree to Markdown using default options.
///
/// Only a `doc` root produces output; any other node yields `""`.
///
/// # Examples
///
/// ```
/// let doc = mdxdoc::parse("# Hello\n\nWorld");
/// assert_eq!(mdxdoc::serialize(&doc), "# Hello\n\nWorld");
/// ```
pub fn serialize(doc: &Node) -> String {
    serialize_with(doc, &Options::default())
}

/// Serialize a document tree to Markdown with custom options.
///
/// # Examples
///
/// ```
/// use mdxdoc::{serialize_with, Options};
///
/// let doc = mdxdoc::parse("- a\n- b");
/// let options = Options::new().with_bullet('*');
/// assert_eq!(serialize_with(&doc, &options), "* a\n* b");
/// ```
pub fn serialize_with(doc: &Node, options: &Options) -> String {
    stringify::stringify(doc, &options.stringify)
}
