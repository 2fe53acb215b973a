//! Splitting a combined dump back into individual files.

use regex::Regex;
use std::sync::LazyLock;

use crate::file_map::FileMap;
use crate::{HEADER_DELIMITER, HEADER_MARKER};

// Delimiter run at the very start of the line, marker anywhere after it
static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "^{}.*{}",
        regex::escape(HEADER_DELIMITER),
        regex::escape(HEADER_MARKER)
    );
    Regex::new(&pattern).unwrap()
});

/// Whether `line` opens a new file section.
///
/// No leading whitespace is tolerated before the delimiter run, and a
/// delimiter line without the marker text is ordinary content.
pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER_RE.is_match(line)
}

/// Extract the file path from a section header line.
///
/// The path is the text after the first marker, cut at the next marker if
/// one follows on the same line, and trimmed.
pub fn section_path(header: &str) -> Option<&str> {
    header
        .split(HEADER_MARKER)
        .nth(1)
        .and_then(|rest| rest.split('\n').next())
        .map(str::trim)
}

/// Parse a combined dump into a map of file path to file content.
///
/// Lines before the first header are dropped. A dump ending in a newline
/// leaves a trailing empty line on the last file's content.
pub fn create_file_map(combined_content: &str) -> FileMap {
    let mut file_map = FileMap::new();
    let mut current_file: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();

    for line in combined_content.split('\n') {
        if is_section_header(line) {
            if let Some(path) = current_file.take() {
                file_map.insert(path, current_content.join("\n"));
            }
            current_file = section_path(line).map(str::to_string);
            current_content.clear();
        } else if current_file.is_some() {
            current_content.push(line);
        }
    }

    if let Some(path) = current_file {
        file_map.insert(path, current_content.join("\n"));
    }

    file_map
}
