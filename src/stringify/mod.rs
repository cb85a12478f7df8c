// Document tree → Markdown string serializer.
//
// Walks a document tree and emits Markdown with component tags. All
// formatting choices (list markers, emphasis characters, fences) live here.

pub(crate) mod escape;
pub(crate) mod flow;
pub(crate) mod handlers;
pub(crate) mod phrasing;

use crate::doc::Node;

/// Serializer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Unordered list marker: `-`, `*` or `+`.
    pub bullet: char,
    /// Ordered list delimiter: `.` or `)`.
    pub bullet_ordered: char,
    /// Emphasis marker: `*` or `_`.
    pub emphasis: char,
    /// Strong marker: `*` or `_`.
    pub strong: char,
    /// Code fence character: `` ` `` or `~`.
    pub fence: char,
    /// Thematic break character: `-`, `*` or `_`.
    pub rule: char,
    /// Number of thematic break markers (minimum 3).
    pub rule_repetition: u8,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            bullet: '-',
            bullet_ordered: '.',
            emphasis: '*',
            strong: '*',
            fence: '`',
            rule: '-',
            rule_repetition: 3,
        }
    }
}

/// Serializer state threaded through all handlers.
pub(crate) struct State<'a> {
    pub options: &'a StringifyOptions,
    /// Whether the next text emitted starts a line (line-start escaping).
    pub at_line_start: bool,
    /// Marker of the bullet list just emitted at this level, if the previous
    /// sibling was one. An adjacent list switches markers so the two do not
    /// merge on re-parse.
    pub bullet_last_used: Option<char>,
    /// Same as `bullet_last_used` for ordered lists.
    pub ordered_last_used: Option<char>,
}

impl<'a> State<'a> {
    pub fn new(options: &'a StringifyOptions) -> Self {
        Self {
            options,
            at_line_start: false,
            bullet_last_used: None,
            ordered_last_used: None,
        }
    }
}

/// Serialize a document tree to Markdown. Anything but a `doc` root yields
/// an empty string.
pub(crate) fn stringify(node: &Node, options: &StringifyOptions) -> String {
    let Node::Doc(doc) = node else {
        return String::new();
    };
    let mut state = State::new(options);
    let output = flow::container_flow(&mut state, &doc.children);
    output.trim().to_string()
}
