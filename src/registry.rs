// Extension registry: the closed set of custom component tags.
//
// Each entry ties a component tag name (`<YouTube>`) to the document node
// type it instantiates (`youtube`), its attribute schema and whether it is an
// atomic leaf or a container of blocks. Both conversion directions read this
// table; neither hard-codes tag strings.

/// Identifies a registered custom node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    BlogPostPreview,
    YouTube,
    CodePlayground,
    Callout,
}

impl ExtensionKind {
    /// The registry entry for this kind.
    pub fn extension(self) -> &'static Extension {
        match self {
            ExtensionKind::BlogPostPreview => &BLOG_POST_PREVIEW,
            ExtensionKind::YouTube => &YOUTUBE,
            ExtensionKind::CodePlayground => &CODE_PLAYGROUND,
            ExtensionKind::Callout => &CALLOUT,
        }
    }
}

/// What a custom node may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// No children; all state lives in attributes.
    Atomic,
    /// One or more block children.
    Blocks,
}

/// Where an attribute's value lives in the Markdown source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrSource {
    /// A literal tag attribute: `<Tag name="value" />`.
    Attribute,
    /// The text nested between the opening and closing tag.
    Body,
}

/// Schema for one attribute of a custom node.
#[derive(Debug)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub source: AttrSource,
    /// Closed set of accepted values, if restricted.
    pub allowed: Option<&'static [&'static str]>,
}

impl AttrSpec {
    /// Resolve a raw value against this schema: absent or disallowed values
    /// fall back to the default.
    pub fn coerce(&self, value: Option<&str>) -> String {
        match (value, self.allowed) {
            (Some(value), Some(allowed)) if allowed.contains(&value) => value.to_string(),
            (Some(value), None) => value.to_string(),
            _ => self.default.to_string(),
        }
    }
}

/// A registered custom component.
#[derive(Debug)]
pub struct Extension {
    pub kind: ExtensionKind,
    /// Component tag name in Markdown (case-sensitive).
    pub tag: &'static str,
    /// Node `type` in the document tree.
    pub node_type: &'static str,
    pub attrs: &'static [AttrSpec],
    pub content: Content,
}

impl Extension {
    /// Look up an attribute schema by name.
    pub fn attr(&self, name: &str) -> Option<&'static AttrSpec> {
        self.attrs.iter().find(|spec| spec.name == name)
    }

    /// The attribute carried as the tag body, if any.
    pub fn body_attr(&self) -> Option<&'static AttrSpec> {
        self.attrs.iter().find(|spec| spec.source == AttrSource::Body)
    }

    pub fn is_atomic(&self) -> bool {
        self.content == Content::Atomic
    }
}

pub const CALLOUT_TYPES: &[&str] = &["info", "warning", "tip"];

static BLOG_POST_PREVIEW: Extension = Extension {
    kind: ExtensionKind::BlogPostPreview,
    tag: "BlogPostPreview",
    node_type: "blogPostPreview",
    attrs: &[AttrSpec {
        name: "id",
        default: "",
        source: AttrSource::Attribute,
        allowed: None,
    }],
    content: Content::Atomic,
};

static YOUTUBE: Extension = Extension {
    kind: ExtensionKind::YouTube,
    tag: "YouTube",
    node_type: "youtube",
    attrs: &[AttrSpec {
        name: "id",
        default: "",
        source: AttrSource::Attribute,
        allowed: None,
    }],
    content: Content::Atomic,
};

static CODE_PLAYGROUND: Extension = Extension {
    kind: ExtensionKind::CodePlayground,
    tag: "CodePlayground",
    node_type: "codePlayground",
    attrs: &[
        AttrSpec {
            name: "language",
            default: "javascript",
            source: AttrSource::Attribute,
            allowed: None,
        },
        AttrSpec {
            name: "code",
            default: "",
            source: AttrSource::Body,
            allowed: None,
        },
    ],
    content: Content::Atomic,
};

static CALLOUT: Extension = Extension {
    kind: ExtensionKind::Callout,
    tag: "Callout",
    node_type: "callout",
    attrs: &[AttrSpec {
        name: "type",
        default: "info",
        source: AttrSource::Attribute,
        allowed: Some(CALLOUT_TYPES),
    }],
    content: Content::Blocks,
};

/// Every registered extension.
pub static EXTENSIONS: [&Extension; 4] = [&BLOG_POST_PREVIEW, &YOUTUBE, &CODE_PLAYGROUND, &CALLOUT];

/// Find the extension for a component tag name.
pub fn by_tag(tag: &str) -> Option<&'static Extension> {
    EXTENSIONS.iter().copied().find(|ext| ext.tag == tag)
}

/// Find the extension for a document node type.
pub fn by_node_type(node_type: &str) -> Option<&'static Extension> {
    EXTENSIONS.iter().copied().find(|ext| ext.node_type == node_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_agree_with_kind() {
        for ext in EXTENSIONS {
            assert!(std::ptr::eq(ext.kind.extension(), ext));
            assert!(std::ptr::eq(by_tag(ext.tag).unwrap(), ext));
            assert!(std::ptr::eq(by_node_type(ext.node_type).unwrap(), ext));
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(by_tag("YouTube").is_some());
        assert!(by_tag("youtube").is_none());
        assert!(by_tag("Youtube").is_none());
    }

    #[test]
    fn test_atomic_flags() {
        assert!(ExtensionKind::YouTube.extension().is_atomic());
        assert!(ExtensionKind::BlogPostPreview.extension().is_atomic());
        assert!(ExtensionKind::CodePlayground.extension().is_atomic());
        assert!(!ExtensionKind::Callout.extension().is_atomic());
    }

    #[test]
    fn test_callout_type_is_closed() {
        let spec = ExtensionKind::Callout.extension().attr("type").unwrap();
        assert_eq!(spec.coerce(Some("warning")), "warning");
        assert_eq!(spec.coerce(Some("danger")), "info");
        assert_eq!(spec.coerce(None), "info");
    }

    #[test]
    fn test_code_playground_body_attr() {
        let ext = ExtensionKind::CodePlayground.extension();
        assert_eq!(ext.body_attr().map(|spec| spec.name), Some("code"));
        assert!(ExtensionKind::YouTube.extension().body_attr().is_none());
    }
}
