//! Pipeline for turning combined dumps on disk into optimized file trees.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::file_map::FileMap;
use crate::optimize::{optimize_content_for_rag, sequential_optimize_content_for_rag};
use crate::report::{CharApproxCounter, OptimizationReport};
use crate::splitter::create_file_map;

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Extension of dump files picked up when the input is a directory.
    pub input_extension: String,
    /// Normalize files in parallel with rayon.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_extension: "txt".to_string(),
            parallel: true,
        }
    }
}

/// A single output file that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of writing a file map to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<WriteFailure>,
}

/// Result of processing one dump.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub optimized: FileMap,
    pub report: OptimizationReport,
    pub summary: WriteSummary,
}

/// Discover dump files to process.
///
/// A file path is returned as-is. A directory is walked for files with the
/// given extension, sorted by path.
pub fn discover_input_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable path while discovering dumps");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == extension))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Read a combined dump from disk.
pub fn read_combined_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, e),
    })
}

/// Resolve where `file_path` lands under `output_root`.
///
/// Paths that are absolute or climb out with `..` would escape the output
/// root and are rejected.
fn output_path(output_root: &Path, file_path: &str) -> std::result::Result<PathBuf, String> {
    let relative = Path::new(file_path);
    if file_path.is_empty() {
        return Err("empty file path".to_string());
    }
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(format!("path '{}' escapes the output directory", file_path));
    }
    Ok(output_root.join(relative))
}

fn write_one(
    output_root: &Path,
    file_path: &str,
    content: &str,
) -> std::result::Result<PathBuf, (PathBuf, String)> {
    let full_path =
        output_path(output_root, file_path).map_err(|e| (output_root.join(file_path), e))?;
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| (full_path.clone(), e.to_string()))?;
    }
    std::fs::write(&full_path, content).map_err(|e| (full_path.clone(), e.to_string()))?;
    Ok(full_path)
}

/// Write every file in `file_map` under `output_root`.
///
/// The output root itself must be creatable. A failure on an individual
/// file is logged and recorded; remaining files are still written.
pub fn write_file_map(output_root: &Path, file_map: &FileMap) -> Result<WriteSummary> {
    std::fs::create_dir_all(output_root).map_err(|e| Error::io(output_root, e))?;

    let mut summary = WriteSummary::default();
    for (file_path, content) in file_map.iter() {
        match write_one(output_root, file_path, content) {
            Ok(full_path) => {
                info!(path = %full_path.display(), "wrote optimized file");
                summary.written.push(full_path);
            }
            Err((full_path, error)) => {
                warn!(path = %full_path.display(), %error, "failed to write optimized file");
                summary.failed.push(WriteFailure {
                    path: full_path,
                    error,
                });
            }
        }
    }

    Ok(summary)
}

/// Read, split, optimize and write a single dump.
pub fn process_input(
    input: &Path,
    output_root: &Path,
    config: &PipelineConfig,
) -> Result<ProcessOutcome> {
    let combined = read_combined_file(input)?;
    let file_map = create_file_map(&combined);
    info!(input = %input.display(), files = file_map.len(), "split combined dump");

    let optimized = if config.parallel {
        optimize_content_for_rag(&file_map)
    } else {
        sequential_optimize_content_for_rag(&file_map)
    };
    let report = OptimizationReport::build(&file_map, &optimized, &CharApproxCounter);
    let summary = write_file_map(output_root, &optimized)?;

    Ok(ProcessOutcome {
        optimized,
        report,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_input_files() {
        let temp = TempDir::new().unwrap();
        let dump1 = temp.path().join("repo1.txt");
        let dump2 = temp.path().join("nested/repo2.txt");

        std::fs::create_dir_all(temp.path().join("nested")).unwrap();
        std::fs::write(&dump1, "===== File: a.md\n").unwrap();
        std::fs::write(&dump2, "===== File: b.md\n").unwrap();
        std::fs::write(temp.path().join("notes.md"), "ignored").unwrap();

        let files = discover_input_files(temp.path(), "txt");
        assert_eq!(files, vec![dump2.clone(), dump1.clone()]);

        assert_eq!(discover_input_files(&dump1, "txt"), vec![dump1]);
    }

    #[test]
    fn test_discover_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(discover_input_files(&temp.path().join("absent"), "txt").is_empty());
    }

    #[test]
    fn test_missing_input_is_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.txt");
        let err = read_combined_file(&missing).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { ref path } if *path == missing));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_write_file_map_creates_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let map: FileMap = vec![
            ("src/lib/a.ts".to_string(), "a".to_string()),
            ("README.md".to_string(), "# r".to_string()),
        ]
        .into_iter()
        .collect();

        let summary = write_file_map(&out, &map).unwrap();

        assert_eq!(summary.written.len(), 2);
        assert!(summary.failed.is_empty());
        assert_eq!(std::fs::read_to_string(out.join("src/lib/a.ts")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(out.join("README.md")).unwrap(), "# r");
    }

    #[test]
    fn test_write_failure_does_not_stop_other_files() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        // A regular file where a directory is needed
        std::fs::write(out.join("blocked"), "").unwrap();

        let map: FileMap = vec![
            ("first.md".to_string(), "1".to_string()),
            ("blocked/inner.md".to_string(), "2".to_string()),
            ("../escape.md".to_string(), "3".to_string()),
            ("last.md".to_string(), "4".to_string()),
        ]
        .into_iter()
        .collect();

        let summary = write_file_map(&out, &map).unwrap();

        assert_eq!(summary.written, vec![out.join("first.md"), out.join("last.md")]);
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.failed[0].path, out.join("blocked/inner.md"));
        assert!(summary.failed[1].error.contains("escapes"));
        assert!(!temp.path().join("escape.md").exists());
    }

    #[test]
    fn test_process_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dump.txt");
        let out = temp.path().join("optimized_output");
        std::fs::write(
            &input,
            "===== File: src/index.ts\nfunction f() {\n    let x = 1;\n\n}\n\
             ===== File: .gitignore\nnode_modules/  \n\n",
        )
        .unwrap();

        let outcome = process_input(&input, &out, &PipelineConfig::default()).unwrap();

        assert_eq!(outcome.optimized.len(), 2);
        assert_eq!(outcome.report.totals.files, 2);
        assert!(outcome.summary.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(out.join("src/index.ts")).unwrap(),
            "function f() {\n    let x = 1;\n}"
        );
        assert_eq!(
            std::fs::read_to_string(out.join(".gitignore")).unwrap(),
            "node_modules/  \n\n"
        );
    }
}
