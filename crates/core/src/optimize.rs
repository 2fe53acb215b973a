//! Dispatching file content to the transform for its type.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::file_map::FileMap;
use crate::transforms::{
    optimize_json, optimize_markdown, optimize_plain_text, optimize_typescript_code, optimize_yaml,
};

/// Content type of a file, decided by its path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// `.ts`, `.js`
    Code,
    /// `.md`
    Markdown,
    /// `.yml`, `.yaml`
    Yaml,
    /// `.json`, including `package.json`
    Json,
    /// `.dockerignore`, `.gitignore`; whitespace is significant, content is untouched.
    Verbatim,
    PlainText,
}

impl ContentKind {
    /// Route a path to its content kind. First match wins.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".ts") || path.ends_with(".js") {
            Self::Code
        } else if path.ends_with(".md") {
            Self::Markdown
        } else if path.ends_with(".yml") || path.ends_with(".yaml") {
            Self::Yaml
        } else if path.ends_with(".json") {
            Self::Json
        } else if path.ends_with(".dockerignore") || path.ends_with(".gitignore") {
            Self::Verbatim
        } else {
            Self::PlainText
        }
    }

    /// Apply this kind's transform to `content`.
    pub fn optimize(self, content: &str) -> String {
        match self {
            Self::Code => optimize_typescript_code(content),
            Self::Markdown => optimize_markdown(content),
            Self::Yaml => optimize_yaml(content),
            Self::Json => optimize_json(content),
            Self::Verbatim => content.to_string(),
            Self::PlainText => optimize_plain_text(content),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Verbatim => "verbatim",
            Self::PlainText => "plain_text",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimize a single file's content based on its path.
pub fn optimize_file(path: &str, content: &str) -> String {
    let kind = ContentKind::from_path(path);
    debug!(path, %kind, "optimizing file");
    kind.optimize(content)
}

/// Optimize every file in the map for RAG indexing.
///
/// Entries are independent, so they are processed in parallel with rayon.
/// The result has the same keys in the same order.
pub fn optimize_content_for_rag(file_map: &FileMap) -> FileMap {
    file_map
        .entries()
        .par_iter()
        .map(|(path, content)| (path.clone(), optimize_file(path, content)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Single-threaded variant of [`optimize_content_for_rag`].
pub fn sequential_optimize_content_for_rag(file_map: &FileMap) -> FileMap {
    file_map
        .iter()
        .map(|(path, content)| (path.to_string(), optimize_file(path, content)))
        .collect()
}
