//! Node.js bindings for the RAG content optimizer.
//!
//! File maps cross the boundary as arrays of `{ path, content }` objects so
//! that the order of files in the dump is kept on the JavaScript side.

use napi::bindgen_prelude::*;
use napi_derive::napi;

use rag_optimizer_core::{
    create_file_map as core_create_file_map, optimize_content_for_rag as core_optimize,
    optimize_file as core_optimize_file, CharApproxCounter, ContentKind, FileMap,
    OptimizationReport,
};

/// A single file recovered from a combined dump.
#[napi(object)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

fn to_entries(map: FileMap) -> Vec<FileEntry> {
    map.into_iter()
        .map(|(path, content)| FileEntry { path, content })
        .collect()
}

fn to_file_map(entries: Vec<FileEntry>) -> FileMap {
    entries
        .into_iter()
        .map(|entry| (entry.path, entry.content))
        .collect()
}

/// Split a combined dump into files, in order of appearance.
#[napi]
pub fn create_file_map(combined_content: String) -> Vec<FileEntry> {
    to_entries(core_create_file_map(&combined_content))
}

/// Optimize every file for RAG indexing. Paths are kept; content is normalized.
#[napi]
pub fn optimize_content_for_rag(files: Vec<FileEntry>) -> Vec<FileEntry> {
    to_entries(core_optimize(&to_file_map(files)))
}

/// Optimize a single file's content based on its path.
#[napi]
pub fn optimize_file(path: String, content: String) -> String {
    core_optimize_file(&path, &content)
}

/// Content kind a path routes to: `code`, `markdown`, `yaml`, `json`,
/// `verbatim` or `plain_text`.
#[napi]
pub fn content_kind(path: String) -> String {
    ContentKind::from_path(&path).as_str().to_string()
}

/// Split and optimize a dump, returning the savings report as a JSON string.
#[napi]
pub fn optimization_report(combined_content: String) -> Result<String> {
    let original = core_create_file_map(&combined_content);
    let optimized = core_optimize(&original);
    let report = OptimizationReport::build(&original, &optimized, &CharApproxCounter);
    report
        .to_json_pretty()
        .map_err(|e| Error::from_reason(e.to_string()))
}
