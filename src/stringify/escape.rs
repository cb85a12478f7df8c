// Escaping for Markdown serialization.
//
// Text runs are escaped so that characters the parser would read as syntax
// come back as the same text. Inline syntax is escaped everywhere; block
// markers only where they would start a construct, at the start of a line.
// Code spans and code blocks are emitted raw. Component bodies are parsed as
// Markdown, so they go through `escape_verbatim`.

use std::sync::LazyLock;

use regex::Regex;

/// `#`, `>`, `+`, `-` and `=` open (or underline) a block at line start.
static BLOCK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([#>+=-])").expect("valid regex"));

/// `1.` or `1)` opens an ordered list item at line start.
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*\d{1,9})([.)])").expect("valid regex"));

/// Escape a text run. `at_line_start` says whether its first line begins a
/// line in the output; later lines always do.
pub(crate) fn escape_text(value: &str, at_line_start: bool) -> String {
    let escaped = escape_inline(value);
    escaped
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i > 0 || at_line_start {
                escape_line_start(line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape characters that start inline constructs anywhere in a line.
pub(crate) fn escape_inline(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut result = String::with_capacity(value.len());

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        match c {
            '\\' | '*' | '`' | '[' | ']' | '<' | '~' => {
                result.push('\\');
                result.push(c);
            }
            // Intraword underscores cannot open or close emphasis.
            '_' if prev.is_some_and(char::is_alphanumeric)
                && next.is_some_and(char::is_alphanumeric) =>
            {
                result.push('_');
            }
            '_' => result.push_str("\\_"),
            // Only `&` that could begin a character reference.
            '&' if next.is_some_and(|n| n.is_ascii_alphanumeric() || n == '#') => {
                result.push_str("\\&");
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape a block marker at the start of one line.
fn escape_line_start(line: &str) -> String {
    if let Some(caps) = ORDERED_MARKER.captures(line) {
        return format!("{}\\{}{}", &caps[1], &caps[2], &line[caps[0].len()..]);
    }
    BLOCK_MARKER.replace(line, "${1}\\${2}").into_owned()
}

/// Escape a link or image destination so it parses back to the same string.
/// Destinations with whitespace use the `<…>` form, which allows spaces.
pub(crate) fn escape_destination(url: &str) -> String {
    let bracketed = url.contains([' ', '\t']);
    let mut result = String::with_capacity(url.len() + 2);
    if bracketed {
        result.push('<');
    }
    for c in url.chars() {
        match c {
            '<' | '>' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            '(' | ')' if !bracketed => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    if bracketed {
        result.push('>');
    }
    result
}

/// Escape verbatim text so every line parses back as literal paragraph text.
/// Spaces and tabs the parser strips at line edges become character
/// references; blank lines stay blank and separate paragraphs.
pub(crate) fn escape_verbatim(value: &str) -> String {
    value
        .split('\n')
        .map(|line| {
            if line.chars().all(is_blank) {
                return line.chars().map(char_reference).collect();
            }
            let escaped = escape_text(line, true);
            let content = escaped.trim_matches(is_blank);
            let start = escaped.len() - escaped.trim_start_matches(is_blank).len();
            let leading: String = escaped[..start].chars().map(char_reference).collect();
            let trailing: String = escaped[start + content.len()..]
                .chars()
                .map(char_reference)
                .collect();
            format!("{leading}{content}{trailing}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape a trailing `#` run the parser would read as a closing sequence of
/// an ATX heading.
pub(crate) fn escape_closing_hashes(content: &str) -> String {
    let body = content.trim_end_matches(is_blank);
    let run_start = body.trim_end_matches('#').len();
    if run_start == body.len() {
        return content.to_string();
    }
    let before = &body[..run_start];
    if before.is_empty() || before.ends_with(is_blank) {
        format!("{}\\{}", before, &content[run_start..])
    } else {
        content.to_string()
    }
}

/// Numeric character reference for `c`.
pub(crate) fn char_reference(c: char) -> String {
    format!("&#{};", u32::from(c))
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_syntax() {
        assert_eq!(escape_inline("a*b"), "a\\*b");
        assert_eq!(escape_inline("[x]"), "\\[x\\]");
        assert_eq!(escape_inline("`code`"), "\\`code\\`");
        assert_eq!(escape_inline("<Tag />"), "\\<Tag />");
        assert_eq!(escape_inline("~~x~~"), "\\~\\~x\\~\\~");
        assert_eq!(escape_inline("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(escape_inline("snake_case"), "snake_case");
        assert_eq!(escape_inline("_x_"), "\\_x\\_");
    }

    #[test]
    fn test_ampersand() {
        assert_eq!(escape_inline("a & b"), "a & b");
        assert_eq!(escape_inline("&amp;"), "\\&amp;");
        assert_eq!(escape_inline("&#42;"), "\\&#42;");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_text("Hello, world! 3 > 2", true), "Hello, world! 3 > 2");
    }

    #[test]
    fn test_line_start_markers() {
        assert_eq!(escape_text("# not a heading", true), "\\# not a heading");
        assert_eq!(escape_text("> not a quote", true), "\\> not a quote");
        assert_eq!(escape_text("- not a list", true), "\\- not a list");
        assert_eq!(escape_text("+ x", true), "\\+ x");
        assert_eq!(escape_text("===", true), "\\===");
        assert_eq!(escape_text("1. not a list", true), "1\\. not a list");
        assert_eq!(escape_text("2) x", true), "2\\) x");
    }

    #[test]
    fn test_line_start_only_when_at_line_start() {
        assert_eq!(escape_text("# x", false), "# x");
        assert_eq!(escape_text("a\n# x", false), "a\n\\# x");
    }

    #[test]
    fn test_destination() {
        assert_eq!(escape_destination("/wiki/A_(b)"), "/wiki/A_\\(b\\)");
        assert_eq!(escape_destination("my file (1).pdf"), "<my file (1).pdf>");
        assert_eq!(escape_destination("a b<c>"), "<a b\\<c\\>>");
    }

    #[test]
    fn test_verbatim_markdown_syntax() {
        assert_eq!(escape_verbatim("x = a*b*c"), "x = a\\*b\\*c");
        assert_eq!(escape_verbatim("- item\n# hi"), "\\- item\n\\# hi");
        assert_eq!(escape_verbatim("[1](2)"), "\\[1\\](2)");
    }

    #[test]
    fn test_verbatim_edge_whitespace() {
        assert_eq!(
            escape_verbatim("def f():\n  return 1"),
            "def f():\n&#32;&#32;return 1"
        );
        assert_eq!(escape_verbatim("a \n\tb"), "a&#32;\n&#9;b");
        assert_eq!(escape_verbatim("a\n\n \nb"), "a\n\n&#32;\nb");
    }

    #[test]
    fn test_closing_hashes() {
        assert_eq!(escape_closing_hashes("Issue #"), "Issue \\#");
        assert_eq!(escape_closing_hashes("##"), "\\##");
        assert_eq!(escape_closing_hashes("C#"), "C#");
        assert_eq!(escape_closing_hashes("no hashes"), "no hashes");
    }
}
