//! Token-footprint statistics for an optimization run.

use std::path::PathBuf;

use serde::Serialize;

use crate::file_map::FileMap;
use crate::optimize::ContentKind;
use crate::pipeline::{PipelineConfig, WriteFailure};
use crate::transforms::split_lines;
use crate::CHARS_PER_TOKEN;

/// Estimates how many tokens a piece of text costs.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Character-based estimate, rounding partial tokens up.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharApproxCounter;

impl TokenCounter for CharApproxCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.len().div_ceil(CHARS_PER_TOKEN)
    }
}

/// Before/after statistics for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub path: String,
    pub kind: ContentKind,
    pub original_bytes: usize,
    pub optimized_bytes: usize,
    pub original_lines: usize,
    pub optimized_lines: usize,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
}

/// Aggregated statistics over all files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub files: usize,
    pub original_bytes: usize,
    pub optimized_bytes: usize,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
}

/// Report of how much an optimization pass shrank a file map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationReport {
    pub files: Vec<FileStats>,
    pub totals: ReportTotals,
}

impl OptimizationReport {
    /// Compare `original` with `optimized`, file by file, in `original` order.
    ///
    /// Paths missing from `optimized` are skipped.
    pub fn build<C: TokenCounter>(original: &FileMap, optimized: &FileMap, counter: &C) -> Self {
        let mut report = OptimizationReport::default();

        for (path, before) in original.iter() {
            let Some(after) = optimized.get(path) else {
                continue;
            };
            let stats = FileStats {
                path: path.to_string(),
                kind: ContentKind::from_path(path),
                original_bytes: before.len(),
                optimized_bytes: after.len(),
                original_lines: split_lines(before).len(),
                optimized_lines: split_lines(after).len(),
                original_tokens: counter.count_tokens(before),
                optimized_tokens: counter.count_tokens(after),
            };

            report.totals.files += 1;
            report.totals.original_bytes += stats.original_bytes;
            report.totals.optimized_bytes += stats.optimized_bytes;
            report.totals.original_tokens += stats.original_tokens;
            report.totals.optimized_tokens += stats.optimized_tokens;
            report.files.push(stats);
        }

        report
    }

    pub fn saved_tokens(&self) -> usize {
        self.totals
            .original_tokens
            .saturating_sub(self.totals.optimized_tokens)
    }

    pub fn saved_bytes(&self) -> usize {
        self.totals
            .original_bytes
            .saturating_sub(self.totals.optimized_bytes)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Savings and write failures for one processed dump.
#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub report: OptimizationReport,
    pub failed: Vec<WriteFailure>,
}

/// Report for a whole run over one or more dumps.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub extension: String,
    pub parallel: bool,
    pub dumps: Vec<DumpReport>,
}

impl RunReport {
    pub fn new(input: PathBuf, output_dir: PathBuf, config: &PipelineConfig) -> Self {
        Self {
            input,
            output_dir,
            extension: config.input_extension.clone(),
            parallel: config.parallel,
            dumps: Vec::new(),
        }
    }

    pub fn saved_tokens(&self) -> usize {
        self.dumps.iter().map(|d| d.report.saved_tokens()).sum()
    }

    /// Paths that are not valid UTF-8 fail to serialize.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{optimize_content_for_rag, Error};

    #[test]
    fn test_char_approx_counter() {
        assert_eq!(CharApproxCounter.count_tokens(""), 0);
        assert_eq!(CharApproxCounter.count_tokens("abcd"), 1);
        assert_eq!(CharApproxCounter.count_tokens("abcde"), 2);
    }

    #[test]
    fn test_report_counts_savings() {
        let original: FileMap = vec![
            ("a.yml".to_string(), "a: 1\n\n\n\n\n\n\nb: 2".to_string()),
            (".gitignore".to_string(), "dist\n".to_string()),
        ]
        .into_iter()
        .collect();
        let optimized = optimize_content_for_rag(&original);

        let report = OptimizationReport::build(&original, &optimized, &CharApproxCounter);

        assert_eq!(report.totals.files, 2);
        assert_eq!(report.files[0].path, "a.yml");
        assert_eq!(report.files[0].kind, ContentKind::Yaml);
        assert_eq!(report.files[0].original_bytes, 15);
        assert_eq!(report.files[0].optimized_bytes, 9);
        assert_eq!(report.files[0].original_lines, 8);
        assert_eq!(report.files[0].optimized_lines, 2);
        assert_eq!(report.files[1].original_bytes, report.files[1].optimized_bytes);
        assert_eq!(report.saved_bytes(), 6);
        assert_eq!(report.saved_tokens(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let map: FileMap = vec![("x.md".to_string(), "hi".to_string())]
            .into_iter()
            .collect();
        let report = OptimizationReport::build(&map, &map, &CharApproxCounter);
        let json = report.to_json_pretty().unwrap();
        assert!(json.contains("\"kind\": \"markdown\""));
        assert!(json.contains("\"files\": 1"));
    }

    #[test]
    fn test_run_report_serializes_failures() {
        let mut run = RunReport::new(
            PathBuf::from("dumps"),
            PathBuf::from("out"),
            &PipelineConfig::default(),
        );
        run.dumps.push(DumpReport {
            input: PathBuf::from("dumps/repo.txt"),
            output_dir: PathBuf::from("out/repo"),
            report: OptimizationReport::default(),
            failed: vec![WriteFailure {
                path: PathBuf::from("out/repo/blocked/a.md"),
                error: "Not a directory".to_string(),
            }],
        });

        let json = run.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["extension"], "txt");
        assert_eq!(value["parallel"], true);
        assert_eq!(value["dumps"][0]["input"], "dumps/repo.txt");
        assert_eq!(value["dumps"][0]["failed"][0]["error"], "Not a directory");
        assert_eq!(run.saved_tokens(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_json_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = PathBuf::from(OsStr::from_bytes(b"dump\xff.txt"));
        let run = RunReport::new(input, PathBuf::from("out"), &PipelineConfig::default());
        assert!(matches!(run.to_json_pretty(), Err(Error::Json(_))));
    }
}
