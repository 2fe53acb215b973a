//! Per-file-type content transforms.
//!
//! Every transform is a pure function from file content to normalized
//! content. Lines are split with [`split_lines`], so every line ending
//! collapses to `\n` and a final line break is not kept.

/// Whether `c` ends a line.
///
/// Besides `\n` and `\r` this covers vertical tab, form feed, the file,
/// group and record separators, NEL and the Unicode line and paragraph
/// separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `content` into lines without their terminators.
///
/// `\r\n` counts as one break. A break at the very end does not produce a
/// trailing empty line, and empty content has no lines.
pub(crate) fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&content[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                start = next + 1;
            }
        }
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// Line-scan state for the code transform.
///
/// This is a line heuristic, not a lexer: a single flag tracks whether the
/// scan is inside a `{ ... }` region, with no nesting depth.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CodeScanState {
    in_multiline_comment: bool,
    in_code_block: bool,
}

impl CodeScanState {
    /// Advance over one line and decide whether to keep it.
    fn keep_line(&mut self, stripped: &str, next_stripped: &str) -> bool {
        if stripped.starts_with("/*") && !stripped.contains("*/") {
            self.in_multiline_comment = true;
        }
        if stripped.contains("*/") {
            self.in_multiline_comment = false;
            return true;
        }
        if self.in_multiline_comment || stripped.starts_with("//") {
            return true;
        }

        if stripped.contains('{') {
            self.in_code_block = true;
        }
        if stripped.contains('}') {
            self.in_code_block = false;
        }

        if self.in_code_block {
            // Blank line right before a closing brace or paren is noise
            let closes = next_stripped.starts_with('}') || next_stripped.starts_with(')');
            !stripped.is_empty() || !closes
        } else {
            true
        }
    }
}

/// Optimize TypeScript/JavaScript code.
///
/// Drops blank lines that sit directly before a closing `}` or `)` inside a
/// brace-delimited region. Comments, indentation and everything else are
/// kept as-is.
pub fn optimize_typescript_code(content: &str) -> String {
    let lines = split_lines(content);
    let mut state = CodeScanState::default();
    let mut optimized = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        let next_stripped = lines.get(i + 1).map_or("", |next| next.trim());
        if state.keep_line(stripped, next_stripped) {
            optimized.push(*line);
        }
    }

    optimized.join("\n")
}

/// Optimize Markdown content. Whitespace is significant, so lines pass through.
pub fn optimize_markdown(content: &str) -> String {
    split_lines(content).join("\n")
}

/// Optimize YAML content by removing lines that are empty once trimmed.
pub fn optimize_yaml(content: &str) -> String {
    split_lines(content)
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Optimize JSON content. Treated as opaque lines; never parsed.
pub fn optimize_json(content: &str) -> String {
    split_lines(content).join("\n")
}

/// Optimize plain text content, keeping leading and trailing whitespace.
pub fn optimize_plain_text(content: &str) -> String {
    split_lines(content).join("\n")
}
