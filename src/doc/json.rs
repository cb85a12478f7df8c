// JSON interchange with the editing shell.
//
// The editor speaks a loose JSON shape: `{"type", "attrs", "content", "text",
// "marks"}`. Nodes go through `RawNode` on the way in and out so that missing
// or mistyped attributes coalesce to defaults and unknown types survive as
// `Unknown` nodes instead of failing the whole document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{
    Blockquote, BulletList, CodeBlock, Custom, Doc, HardBreak, Heading, HorizontalRule, Image,
    ListItem, Mark, Node, OrderedList, Paragraph, Text, Unknown,
};
use crate::error::ConvertError;
use crate::registry;

#[derive(Debug, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<RawMark>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
}

impl RawNode {
    fn bare(node_type: &str) -> Self {
        Self {
            node_type: node_type.to_string(),
            attrs: None,
            content: None,
            text: None,
            marks: None,
        }
    }

    fn with_content(mut self, children: &[Node]) -> Self {
        self.content = Some(children.iter().map(RawNode::from).collect());
        self
    }

    fn with_attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs = Some(attrs);
        self
    }

    fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(name))
    }

    fn attr_string(&self, name: &str) -> Option<String> {
        self.attr(name).and_then(value_to_string)
    }

    fn children(self) -> Vec<Node> {
        self.content
            .unwrap_or_default()
            .into_iter()
            .map(Node::from)
            .collect()
    }
}

/// Scalars are accepted as strings; `null`, arrays and objects are not values.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn heading_level(value: Option<&Value>) -> u8 {
    let level = match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(1),
        Some(Value::String(s)) => s.parse().unwrap_or(1),
        _ => 1,
    };
    level.clamp(1, 6) as u8
}

// ---------------------------------------------------------------------------
// Node → JSON
// ---------------------------------------------------------------------------

impl From<&Node> for RawNode {
    fn from(node: &Node) -> Self {
        let raw = RawNode::bare(node.type_name());
        match node {
            Node::Doc(n) => raw.with_content(&n.children),
            Node::Paragraph(n) => raw.with_content(&n.children),
            Node::Heading(n) => {
                let mut attrs = Map::new();
                attrs.insert("level".into(), Value::from(n.level));
                raw.with_attrs(attrs).with_content(&n.children)
            }
            Node::CodeBlock(n) => {
                let mut attrs = Map::new();
                attrs.insert("language".into(), Value::from(n.language.as_str()));
                let content = if n.code.is_empty() {
                    vec![]
                } else {
                    vec![Node::text(n.code.as_str())]
                };
                raw.with_attrs(attrs).with_content(&content)
            }
            Node::Blockquote(n) => raw.with_content(&n.children),
            Node::BulletList(n) => raw.with_content(&n.children),
            Node::OrderedList(n) => raw.with_content(&n.children),
            Node::ListItem(n) => raw.with_content(&n.children),
            Node::HorizontalRule(_) | Node::HardBreak(_) => raw,
            Node::Image(n) => {
                let mut attrs = Map::new();
                attrs.insert("src".into(), Value::from(n.src.as_str()));
                attrs.insert("alt".into(), Value::from(n.alt.as_str()));
                attrs.insert(
                    "title".into(),
                    n.title.as_deref().map_or(Value::Null, Value::from),
                );
                raw.with_attrs(attrs)
            }
            Node::Custom(n) => {
                let ext = n.kind.extension();
                let attrs = ext
                    .attrs
                    .iter()
                    .map(|spec| (spec.name.to_string(), Value::from(n.attr(spec.name))))
                    .collect();
                let raw = raw.with_attrs(attrs);
                if ext.is_atomic() {
                    raw
                } else {
                    raw.with_content(&n.children)
                }
            }
            Node::Text(n) => {
                let mut raw = raw;
                raw.text = Some(n.value.clone());
                if !n.marks.is_empty() {
                    raw.marks = Some(n.marks.iter().map(RawMark::from).collect());
                }
                raw
            }
            Node::Unknown(n) => raw.with_content(&n.children),
        }
    }
}

impl From<&Mark> for RawMark {
    fn from(mark: &Mark) -> Self {
        let attrs = match mark {
            Mark::Link { href } => {
                let mut attrs = Map::new();
                attrs.insert("href".into(), Value::from(href.as_str()));
                Some(attrs)
            }
            _ => None,
        };
        Self {
            mark_type: mark.type_name().to_string(),
            attrs,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON → Node
// ---------------------------------------------------------------------------

impl From<RawNode> for Node {
    fn from(mut raw: RawNode) -> Self {
        let node_type = std::mem::take(&mut raw.node_type);
        match node_type.as_str() {
            "doc" => Node::Doc(Doc {
                children: raw.children(),
            }),
            "paragraph" => Node::Paragraph(Paragraph {
                children: raw.children(),
            }),
            "heading" => Node::Heading(Heading {
                level: heading_level(raw.attr("level")),
                children: raw.children(),
            }),
            "codeBlock" => {
                let language = raw.attr_string("language").unwrap_or_default();
                let code = raw.children().iter().map(Node::text_content).collect();
                Node::CodeBlock(CodeBlock { language, code })
            }
            "blockquote" => Node::Blockquote(Blockquote {
                children: raw.children(),
            }),
            "bulletList" => Node::BulletList(BulletList {
                children: raw.children(),
            }),
            "orderedList" => Node::OrderedList(OrderedList {
                children: raw.children(),
            }),
            "listItem" => Node::ListItem(ListItem {
                children: raw.children(),
            }),
            "horizontalRule" => Node::HorizontalRule(HorizontalRule),
            "hardBreak" => Node::HardBreak(HardBreak),
            "image" => Node::Image(Image {
                src: raw.attr_string("src").unwrap_or_default(),
                alt: raw.attr_string("alt").unwrap_or_default(),
                title: raw.attr_string("title"),
            }),
            "text" => Node::Text(Text {
                value: raw.text.unwrap_or_default(),
                marks: raw
                    .marks
                    .unwrap_or_default()
                    .iter()
                    .filter_map(RawMark::to_mark)
                    .collect(),
            }),
            other => match registry::by_node_type(other) {
                Some(ext) => {
                    let mut custom = Custom::new(ext.kind);
                    for spec in ext.attrs {
                        let value = raw.attr_string(spec.name);
                        custom.attrs.insert(spec.name.to_string(), spec.coerce(value.as_deref()));
                    }
                    Node::Custom(custom.with_children(raw.children()))
                }
                None => Node::Unknown(Unknown {
                    node_type: other.to_string(),
                    children: raw.children(),
                }),
            },
        }
    }
}

impl RawMark {
    /// Unknown mark types are dropped; their text is kept.
    fn to_mark(&self) -> Option<Mark> {
        match self.mark_type.as_str() {
            "bold" => Some(Mark::Bold),
            "italic" => Some(Mark::Italic),
            "code" => Some(Mark::Code),
            "strike" => Some(Mark::Strike),
            "link" => {
                let href = self
                    .attrs
                    .as_ref()
                    .and_then(|attrs| attrs.get("href"))
                    .and_then(value_to_string)
                    .unwrap_or_default();
                Some(Mark::Link { href })
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// serde glue
// ---------------------------------------------------------------------------

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawNode::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(Node::from)
    }
}

impl Node {
    /// Read a document tree from the editor's JSON.
    pub fn from_json(json: &str) -> Result<Node, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write this tree as the editor's JSON.
    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string(self)?)
    }
}
