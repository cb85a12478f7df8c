// Shared test helpers for mdxdoc.

use std::fs;
use std::path::Path;

/// One fixture: Markdown input, the document it parses to, and the Markdown
/// it serializes back to.
pub struct Fixture {
    pub markdown: String,
    pub expected_json: serde_json::Value,
    pub expected_md: String,
}

/// Load a test fixture.
///
/// Fixture directories contain `index.md` and `index.json`, and optionally
/// `output.md` when serialization does not reproduce `index.md` exactly.
pub fn load_fixture(name: &str) -> Fixture {
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-fixtures").join(name);
    let markdown = fs::read_to_string(base.join("index.md"))
        .unwrap_or_else(|_| panic!("Missing fixture: {}/index.md", name));
    let json = fs::read_to_string(base.join("index.json"))
        .unwrap_or_else(|_| panic!("Missing fixture: {}/index.json", name));
    let expected_json = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Invalid fixture JSON {}/index.json: {}", name, e));
    let expected_md = fs::read_to_string(base.join("output.md")).unwrap_or_else(|_| markdown.clone());

    Fixture {
        markdown,
        expected_json,
        expected_md: expected_md.trim_end_matches('\n').to_string(),
    }
}

/// Parse, serialize, parse again; both documents must be equal.
pub fn assert_idempotent(markdown: &str) {
    let first = mdxdoc::parse(markdown);
    let serialized = mdxdoc::serialize(&first);
    let second = mdxdoc::parse(&serialized);
    pretty_assertions::assert_eq!(second, first, "serialized as:\n{}", serialized);
}
