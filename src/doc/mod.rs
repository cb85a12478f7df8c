// Document tree: the editor's block/inline node model.
//
// A single `Doc` root owns block children. Inline content is a flat list of
// `Text` runs (each carrying an ordered set of marks) and `HardBreak`s.
// Custom component nodes are one variant parameterized by their registry kind.

pub mod json;

use std::collections::BTreeMap;

use crate::registry::ExtensionKind;

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

/// An inline text decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Strike,
    Link { href: String },
}

impl Mark {
    /// Marks of the same type exclude each other within one set.
    pub fn same_type(&self, other: &Mark) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Name used in the JSON interchange format.
    pub fn type_name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Code => "code",
            Mark::Strike => "strike",
            Mark::Link { .. } => "link",
        }
    }
}

/// Ordered set of marks on a text run. At most one mark of each type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Marks(Vec<Mark>);

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this set with `mark` added. Adding a mark whose type is
    /// already present replaces it in place, so re-applying is a no-op.
    pub fn with(&self, mark: Mark) -> Marks {
        let mut marks = self.0.clone();
        match marks.iter().position(|m| m.same_type(&mark)) {
            Some(i) => marks[i] = mark,
            None => marks.push(mark),
        }
        Marks(marks)
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.contains(mark)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Mark> for Marks {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter().fold(Marks::new(), |marks, mark| marks.with(mark))
    }
}

impl<'a> IntoIterator for &'a Marks {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Node structs
// ---------------------------------------------------------------------------

/// Document root. Children are block nodes only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Doc {
    pub children: Vec<Node>,
}

/// Paragraph of inline content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

/// Heading with a level taken from the source (`#` count).
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub children: Vec<Node>,
}

/// Fenced code. The code is held as a single raw string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock {
    /// Fence info string; empty when none was declared.
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blockquote {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulletList {
    pub children: Vec<Node>, // ListItem
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedList {
    pub children: Vec<Node>, // ListItem
}

/// List item holding block children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizontalRule;

/// Block image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

/// A registered custom component (`callout`, `youtube`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Custom {
    pub kind: ExtensionKind,
    /// Values for the registry's attributes. Missing keys read as the default.
    pub attrs: BTreeMap<String, String>,
    /// Block children; always empty for atomic kinds.
    pub children: Vec<Node>,
}

impl Custom {
    /// A fresh node with default attributes. Containers start with a single
    /// empty paragraph.
    pub fn new(kind: ExtensionKind) -> Self {
        let ext = kind.extension();
        let attrs = ext
            .attrs
            .iter()
            .map(|spec| (spec.name.to_string(), spec.default.to_string()))
            .collect();
        let children = if ext.is_atomic() {
            vec![]
        } else {
            vec![Node::Paragraph(Paragraph::default())]
        };
        Self { kind, attrs, children }
    }

    /// Set an attribute, coercing it through the registry schema.
    /// Names the registry does not declare are ignored.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        if let Some(spec) = self.kind.extension().attr(name) {
            self.attrs.insert(spec.name.to_string(), spec.coerce(Some(value)));
        }
        self
    }

    /// Replace the children. Ignored for atomic kinds; an empty list becomes
    /// a single empty paragraph for containers.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        if self.kind.extension().is_atomic() {
            return self;
        }
        self.children = if children.is_empty() {
            vec![Node::Paragraph(Paragraph::default())]
        } else {
            children
        };
        self
    }

    /// Read an attribute, falling back to the registry default.
    pub fn attr(&self, name: &str) -> &str {
        match self.attrs.get(name) {
            Some(value) => value,
            None => self
                .kind
                .extension()
                .attr(name)
                .map_or("", |spec| spec.default),
        }
    }

    /// The tag-body attribute value, for kinds that carry one.
    pub fn body(&self) -> Option<&str> {
        self.kind
            .extension()
            .body_attr()
            .map(|spec| self.attr(spec.name))
    }
}

/// A run of text with marks.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardBreak;

/// A node type this crate does not know (e.g. from a newer editor schema).
/// Only its children are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Unknown {
    pub node_type: String,
    pub children: Vec<Node>,
}

// ---------------------------------------------------------------------------
// Node enum
// ---------------------------------------------------------------------------

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Root
    Doc(Doc),

    // Blocks
    Paragraph(Paragraph),
    Heading(Heading),
    CodeBlock(CodeBlock),
    Blockquote(Blockquote),
    BulletList(BulletList),
    OrderedList(OrderedList),
    ListItem(ListItem),
    HorizontalRule(HorizontalRule),
    Image(Image),
    Custom(Custom),

    // Inline
    Text(Text),
    HardBreak(HardBreak),

    Unknown(Unknown),
}

impl Node {
    /// Plain text run without marks.
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Text {
            value: value.into(),
            marks: Marks::new(),
        })
    }

    /// Paragraph holding a single unmarked text run (or nothing, if empty).
    pub fn paragraph(value: impl Into<String>) -> Node {
        let value = value.into();
        let children = if value.is_empty() {
            vec![]
        } else {
            vec![Node::text(value)]
        };
        Node::Paragraph(Paragraph { children })
    }

    /// The minimal valid document: one empty paragraph.
    pub fn empty_doc() -> Node {
        Node::Doc(Doc {
            children: vec![Node::Paragraph(Paragraph::default())],
        })
    }

    /// The `type` name used by the editor for this node.
    pub fn type_name(&self) -> &str {
        match self {
            Node::Doc(_) => "doc",
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::CodeBlock(_) => "codeBlock",
            Node::Blockquote(_) => "blockquote",
            Node::BulletList(_) => "bulletList",
            Node::OrderedList(_) => "orderedList",
            Node::ListItem(_) => "listItem",
            Node::HorizontalRule(_) => "horizontalRule",
            Node::Image(_) => "image",
            Node::Custom(n) => n.kind.extension().node_type,
            Node::Text(_) => "text",
            Node::HardBreak(_) => "hardBreak",
            Node::Unknown(n) => &n.node_type,
        }
    }

    /// Returns a reference to this node's children, if it can have any.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Doc(n) => Some(&n.children),
            Node::Paragraph(n) => Some(&n.children),
            Node::Heading(n) => Some(&n.children),
            Node::Blockquote(n) => Some(&n.children),
            Node::BulletList(n) => Some(&n.children),
            Node::OrderedList(n) => Some(&n.children),
            Node::ListItem(n) => Some(&n.children),
            Node::Custom(n) => Some(&n.children),
            Node::Unknown(n) => Some(&n.children),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.value.clone(),
            Node::CodeBlock(c) => c.code.clone(),
            _ => self
                .children()
                .map(|children| children.iter().map(Node::text_content).collect())
                .unwrap_or_default(),
        }
    }
}
