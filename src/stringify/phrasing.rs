// Inline container serialization.
//
// Inline content is a flat list of text runs, each with an ordered mark set.
// Markdown needs nested delimiters, so adjacent runs sharing a mark are
// grouped under one delimiter pair. At each position the outermost mark is
// the one that spans the most consecutive runs (ties go to the mark listed
// first on the run). `code` never wraps other marks.

use super::escape;
use super::State;
use crate::doc::{Mark, Node};

/// An inline node with the marks still to be emitted around it.
#[derive(Clone)]
struct Run<'a> {
    node: &'a Node,
    marks: Vec<&'a Mark>,
}

impl<'a> Run<'a> {
    fn new(node: &'a Node) -> Option<Self> {
        match node {
            Node::Text(text) if text.value.is_empty() => None,
            Node::Text(text) => Some(Run {
                node,
                marks: text.marks.iter().collect(),
            }),
            Node::HardBreak(_) => Some(Run {
                node,
                marks: Vec::new(),
            }),
            // Block nodes have no inline form.
            _ => None,
        }
    }

    fn without(&self, mark: &Mark) -> Run<'a> {
        Run {
            node: self.node,
            marks: self.marks.iter().copied().filter(|m| *m != mark).collect(),
        }
    }
}

/// Serialize a list of inline children.
pub(crate) fn container_phrasing(state: &mut State, children: &[Node]) -> String {
    let runs: Vec<Run> = children.iter().filter_map(Run::new).collect();
    serialize_runs(state, &runs)
}

fn serialize_runs(state: &mut State, runs: &[Run]) -> String {
    let mut result = String::new();
    let mut guard_next = false;
    let mut start = 0;

    while start < runs.len() {
        let mut guards = Guards::default();
        let mut content = match outer_mark(runs, start) {
            None => {
                let content = leaf(state, runs[start].node);
                start += 1;
                content
            }
            Some((mark, end)) => {
                let group = &runs[start..end];
                start = end;
                let content = if *mark == Mark::Code {
                    code_span(group)
                } else {
                    state.at_line_start = false;
                    let inner: Vec<Run> = group.iter().map(|run| run.without(mark)).collect();
                    let content = serialize_runs(state, &inner);
                    if let Some(delimiter) = delimiter(state, mark) {
                        guards = Guards::around(&content, delimiter.starts_with('_'));
                    }
                    wrap(state, mark, content)
                };
                state.at_line_start = false;
                content
            }
        };

        if guard_next {
            content = reference_first_word_char(content);
        }
        if guards.open {
            reference_last_word_char(&mut result);
        }
        // `![` opens an image.
        if content.starts_with('[') && result.ends_with('!') {
            result.pop();
            result.push_str("\\!");
        }
        guard_next = guards.close;
        result.push_str(&content);
    }

    result
}

/// Delimiter edges that only open or close next to a non-word character
/// outside the group. A delimiter whose inner neighbour is punctuation is not
/// flanking when a letter sits on its other side, and `_` never opens or
/// closes inside a word.
#[derive(Default)]
struct Guards {
    open: bool,
    close: bool,
}

impl Guards {
    fn around(content: &str, underscore: bool) -> Self {
        let needs_guard = |edge: Option<char>| {
            edge.is_some_and(|c| !c.is_whitespace() && (underscore || !c.is_alphanumeric()))
        };
        Guards {
            open: needs_guard(content.chars().next()),
            close: needs_guard(content.chars().last()),
        }
    }
}

/// Replace a leading letter or digit with a character reference.
fn reference_first_word_char(content: String) -> String {
    match content.chars().next() {
        Some(first) if first.is_alphanumeric() => format!(
            "{}{}",
            escape::char_reference(first),
            &content[first.len_utf8()..]
        ),
        _ => content,
    }
}

/// Replace a trailing letter or digit with a character reference.
fn reference_last_word_char(result: &mut String) {
    if let Some(last) = result.chars().last().filter(|c| c.is_alphanumeric()) {
        result.truncate(result.len() - last.len_utf8());
        result.push_str(&escape::char_reference(last));
    }
}

/// The mark to open at `start` and the end of the run range it covers.
fn outer_mark<'a>(runs: &[Run<'a>], start: usize) -> Option<(&'a Mark, usize)> {
    let marks = &runs[start].marks;

    let mut best: Option<(&'a Mark, usize)> = None;
    for &mark in marks.iter().filter(|mark| !matches!(mark, Mark::Code)) {
        let end = start
            + runs[start..]
                .iter()
                .take_while(|run| run.marks.contains(&mark))
                .count();
        if best.map_or(true, |(_, best_end)| end > best_end) {
            best = Some((mark, end));
        }
    }
    if best.is_some() {
        return best;
    }

    // Only `code` is left: group runs that carry nothing else.
    let code = marks.iter().copied().find(|mark| matches!(mark, Mark::Code))?;
    let end = start
        + runs[start..]
            .iter()
            .take_while(|run| run.marks.len() == 1 && run.marks[0] == code)
            .count();
    Some((code, end))
}

fn leaf(state: &mut State, node: &Node) -> String {
    match node {
        Node::Text(text) => {
            let escaped = escape::escape_text(&text.value, state.at_line_start);
            state.at_line_start = text.value.ends_with('\n');
            escaped
        }
        Node::HardBreak(_) => {
            state.at_line_start = true;
            "\n".to_string()
        }
        _ => String::new(),
    }
}

/// Emphasis-style delimiter for `mark`; links and code have none.
fn delimiter(state: &State, mark: &Mark) -> Option<String> {
    match mark {
        Mark::Bold => Some(state.options.strong.to_string().repeat(2)),
        Mark::Italic => Some(state.options.emphasis.to_string()),
        Mark::Strike => Some("~~".to_string()),
        Mark::Link { .. } | Mark::Code => None,
    }
}

/// Surround `content` with the delimiters of `mark`. Whitespace at the edges
/// stays outside emphasis delimiters, where it cannot break flanking rules.
fn wrap(state: &State, mark: &Mark, content: String) -> String {
    if let Mark::Link { href } = mark {
        return format!("[{}]({})", content, escape::escape_destination(href));
    }
    let Some(delimiter) = delimiter(state, mark) else {
        return content;
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content;
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

/// Raw code span; the fence is one backtick longer than any run inside.
fn code_span(group: &[Run]) -> String {
    let value: String = group
        .iter()
        .filter_map(|run| match run.node {
            Node::Text(text) => Some(text.value.as_str()),
            _ => None,
        })
        .collect();

    let ticks = "`".repeat(longest_backtick_run(&value) + 1);
    let needs_space = value.starts_with('`')
        || value.ends_with('`')
        || (value.starts_with(' ') && value.ends_with(' ') && !value.trim().is_empty());

    if needs_space {
        format!("{} {} {}", ticks, value, ticks)
    } else {
        format!("{}{}{}", ticks, value, ticks)
    }
}

/// Find the longest consecutive run of backticks in a string.
fn longest_backtick_run(s: &str) -> usize {
    let mut max = 0;
    let mut current = 0;
    for c in s.chars() {
        if c == '`' {
            current += 1;
            max = max.max(current);
        } else {
            current = 0;
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{HardBreak, Marks, Text};
    use crate::stringify::StringifyOptions;

    fn run(value: &str, marks: &[Mark]) -> Node {
        Node::Text(Text {
            value: value.into(),
            marks: marks.iter().cloned().collect::<Marks>(),
        })
    }

    fn render(children: &[Node]) -> String {
        let options = StringifyOptions::default();
        let mut state = State::new(&options);
        container_phrasing(&mut state, children)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render(&[run("hello", &[])]), "hello");
    }

    #[test]
    fn test_single_marks() {
        assert_eq!(render(&[run("b", &[Mark::Bold])]), "**b**");
        assert_eq!(render(&[run("i", &[Mark::Italic])]), "*i*");
        assert_eq!(render(&[run("s", &[Mark::Strike])]), "~~s~~");
        assert_eq!(render(&[run("c", &[Mark::Code])]), "`c`");
    }

    #[test]
    fn test_adjacent_runs_share_outer_mark() {
        let children = [
            run("a ", &[Mark::Bold]),
            run("b", &[Mark::Bold, Mark::Italic]),
            run(" c", &[Mark::Bold]),
        ];
        assert_eq!(render(&children), "**a *b* c**");
    }

    #[test]
    fn test_longest_span_is_outermost() {
        let children = [
            run("a", &[Mark::Italic, Mark::Bold]),
            run("b", &[Mark::Bold]),
        ];
        assert_eq!(render(&children), "***a*b**");
    }

    #[test]
    fn test_tie_follows_mark_order() {
        assert_eq!(render(&[run("x", &[Mark::Italic, Mark::Bold])]), "***x***");
        assert_eq!(render(&[run("x", &[Mark::Bold, Mark::Italic])]), "***x***");
    }

    #[test]
    fn test_whitespace_moves_outside_delimiters() {
        let children = [run("a", &[]), run(" b ", &[Mark::Bold]), run("c", &[])];
        assert_eq!(render(&children), "a **b** c");
    }

    #[test]
    fn test_link_wraps_marked_text() {
        let link = Mark::Link {
            href: "https://x.test".into(),
        };
        let children = [
            run("see ", &[link.clone()]),
            run("docs", &[link.clone(), Mark::Bold]),
        ];
        assert_eq!(render(&children), "[see **docs**](https://x.test)");
    }

    #[test]
    fn test_code_inside_link() {
        let link = Mark::Link {
            href: "https://x.test".into(),
        };
        assert_eq!(
            render(&[run("x", &[link, Mark::Code])]),
            "[`x`](https://x.test)"
        );
    }

    #[test]
    fn test_code_is_raw() {
        assert_eq!(render(&[run("a*b", &[Mark::Code])]), "`a*b`");
        assert_eq!(render(&[run("a`b", &[Mark::Code])]), "``a`b``");
        assert_eq!(render(&[run("`x", &[Mark::Code])]), "`` `x ``");
    }

    #[test]
    fn test_hard_break_is_newline() {
        let children = [run("a", &[]), Node::HardBreak(HardBreak), run("b", &[])];
        assert_eq!(render(&children), "a\nb");
    }

    #[test]
    fn test_text_after_break_escaped_at_line_start() {
        let children = [run("a", &[]), Node::HardBreak(HardBreak), run("# b", &[])];
        assert_eq!(render(&children), "a\n\\# b");
    }

    #[test]
    fn test_block_nodes_ignored() {
        assert_eq!(render(&[run("a", &[]), Node::paragraph("x")]), "a");
    }

    #[test]
    fn test_bang_before_link_escaped() {
        let link = Mark::Link {
            href: "https://x.test".into(),
        };
        let children = [run("Wow!", &[]), run("x", &[link])];
        assert_eq!(render(&children), "Wow\\![x](https://x.test)");
    }

    #[test]
    fn test_closing_after_punctuation_before_letter() {
        let children = [run("a.", &[Mark::Bold]), run("b", &[])];
        assert_eq!(render(&children), "**a.**&#98;");
    }

    #[test]
    fn test_opening_before_punctuation_after_letter() {
        let children = [run("a", &[]), run(".b", &[Mark::Italic])];
        assert_eq!(render(&children), "&#97;*.b*");
    }

    #[test]
    fn test_word_edges_need_no_reference() {
        let children = [run("a", &[]), run("b", &[Mark::Bold]), run("c", &[])];
        assert_eq!(render(&children), "a**b**c");
    }

    #[test]
    fn test_intraword_underscore_delimiters() {
        let options = StringifyOptions {
            strong: '_',
            ..StringifyOptions::default()
        };
        let mut state = State::new(&options);
        let children = [run("a", &[]), run("b", &[Mark::Bold]), run("c", &[])];
        assert_eq!(
            container_phrasing(&mut state, &children),
            "&#97;__b__&#99;"
        );
    }

    #[test]
    fn test_longest_backtick_run() {
        assert_eq!(longest_backtick_run("a``b`c"), 2);
        assert_eq!(longest_backtick_run("none"), 0);
    }
}
