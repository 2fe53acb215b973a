//! Core logic for turning a combined source dump into RAG-ready files.
//!
//! A dump is a single text stream in which every file is introduced by a
//! header line such as `===== File: src/index.ts`. This crate splits the
//! stream back into a [`FileMap`] and runs a per-file-type normalization pass
//! over it to trim noise before the content is indexed for retrieval.

mod error;
mod file_map;
mod optimize;
pub mod pipeline;
mod report;
mod splitter;
mod transforms;

pub use error::{Error, Result};
pub use file_map::FileMap;
pub use optimize::{
    optimize_content_for_rag, optimize_file, sequential_optimize_content_for_rag, ContentKind,
};
pub use pipeline::{
    discover_input_files, process_input, read_combined_file, write_file_map, PipelineConfig,
    ProcessOutcome, WriteFailure, WriteSummary,
};
pub use report::{
    CharApproxCounter, DumpReport, FileStats, OptimizationReport, ReportTotals, RunReport,
    TokenCounter,
};
pub use splitter::{create_file_map, is_section_header, section_path};
pub use transforms::{
    optimize_json, optimize_markdown, optimize_plain_text, optimize_typescript_code, optimize_yaml,
};

/// Run of delimiter characters that opens a section header line.
pub const HEADER_DELIMITER: &str = "=====";

/// Marker text that precedes the file path on a section header line.
pub const HEADER_MARKER: &str = "File: ";

/// Input file read when no input is given.
pub const DEFAULT_INPUT_FILE: &str = "jina-reader-mcp.txt";

/// Output directory written when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "optimized_output";

/// Approximate characters per token used by [`CharApproxCounter`].
pub const CHARS_PER_TOKEN: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_then_optimize() {
        let dump = "===== File: src/a.ts\nif (x) {\n  y();\n\n}\n===== File: b.yml\nk: v\n\n";
        let optimized = optimize_content_for_rag(&create_file_map(dump));
        assert_eq!(optimized.get("src/a.ts"), Some("if (x) {\n  y();\n}"));
        assert_eq!(optimized.get("b.yml"), Some("k: v"));
    }
}
