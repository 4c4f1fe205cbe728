use std::fs;
use std::path::{Path, PathBuf};

use covpage::html::HtmlReport;
use tempfile::TempDir;

/// Create a fresh report over temporary source/output directories, returning
/// the report, the dir handle, and the output path. The caller must hold
/// onto `TempDir` to keep the temp directory alive.
pub fn setup_report() -> (HtmlReport, TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let source_root = dir.path().join("src");
    let output = dir.path().join("coverage-html");
    fs::create_dir_all(&source_root).unwrap();
    let report = HtmlReport::new(&output, &source_root);
    (report, dir, output)
}

/// Write a source file under the sandbox's source root.
pub fn write_source(dir: &TempDir, relative_path: &str, content: &str) {
    let path = dir.path().join("src").join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Read a rendered artifact back from the output directory.
pub fn read_artifact(output: &Path, relative_path: &str) -> String {
    fs::read_to_string(output.join(relative_path)).unwrap()
}
