//! HTML report rendering: one annotated page per source file plus the
//! summary index linking them.
//!
//! Page and index markup are produced by pure functions returning owned
//! strings; [`HtmlReport`] accumulates structured summary rows and only
//! touches the filesystem when an artifact is written. Re-rendering the
//! same inputs produces byte-identical pages.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::classify::{classify, Classification, LineAnnotation};
use crate::error::{CovpageError, Result};
use crate::model::{rate, FileSummary, HitLookup, SourceFile, Status, TestMethod};
use crate::report::Renderer;
use crate::sanitize::artifact_path;

const BG_COVERED: &str = "background-color: #D2EACE;";
const BG_UNCOVERED: &str = "background-color: #EACECC;";
const BG_NON_EXECUTABLE: &str = "background-color: #EEF4ED;";

fn status_color(status: Status) -> &'static str {
    match status {
        Status::Pass => BG_COVERED,
        Status::Fail => BG_UNCOVERED,
    }
}

fn classification_color(classification: Classification) -> &'static str {
    match classification {
        Classification::Covered => BG_COVERED,
        Classification::Uncovered => BG_UNCOVERED,
        Classification::NonExecutable => BG_NON_EXECUTABLE,
    }
}

/// Escape text for HTML element content and attribute values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render one annotated source page. Expects one annotation per entry of
/// `source_lines` (the output of [`classify`] on the same slice).
#[must_use]
pub fn render_page(source_lines: &[String], annotations: &[LineAnnotation]) -> String {
    let mut html = String::new();
    html.push_str("<html>\n");
    html.push_str("<body style=\"font-family: monospace;\">\n");
    for (line, annotation) in source_lines.iter().zip(annotations) {
        render_line(&mut html, line, annotation);
    }
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

fn render_line(html: &mut String, line: &str, annotation: &LineAnnotation) {
    let mut style = String::from("white-space: pre;");
    style.push_str(classification_color(annotation.classification));

    let test_names = annotation
        .tests
        .iter()
        .map(TestMethod::label)
        .collect::<Vec<_>>()
        .join(", ");

    let icon = if annotation.tests.is_empty() {
        "<span style=\"margin-right: 5px;\">&nbsp;</span>".to_string()
    } else {
        format!(
            "<span style=\"cursor: pointer; margin-right: 5px;\" \
             title=\"Covered by tests: {} for {}\">&#9432;</span>",
            escape(&test_names),
            annotation.hit_count
        )
    };

    // An empty line still occupies visual space so its background shows.
    let content = if line.is_empty() {
        "&nbsp;".to_string()
    } else {
        escape(line)
    };

    writeln!(
        html,
        "<div style=\"{}\" title=\"{}\">{}{}</div>",
        style,
        escape(&test_names),
        icon,
        content
    )
    .unwrap();
}

/// One accumulated summary-table row.
#[derive(Debug)]
struct SummaryRow {
    path: String,
    link: String,
    summary: FileSummary,
    status: Status,
}

fn render_index(
    rows: &[SummaryRow],
    lines: u64,
    covered_lines: u64,
    threshold: f64,
    status: Status,
    generated_at: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<html>\n");
    html.push_str("<body style=\"font-family: sans-serif;\">\n");

    html.push_str("<h1>Summary</h1>\n");
    html.push_str("<table border=\"1\" cellpadding=\"5\">\n");
    writeln!(
        html,
        "<tr><th>Generated on</th><td>{}</td></tr>",
        escape(generated_at)
    )
    .unwrap();
    writeln!(html, "<tr><th>Lines</th><td>{lines}</td></tr>").unwrap();
    writeln!(html, "<tr><th>Covered Lines</th><td>{covered_lines}</td></tr>").unwrap();
    writeln!(
        html,
        "<tr><th>Threshold</th><td>{:.1}%</td></tr>",
        threshold * 100.0
    )
    .unwrap();
    writeln!(
        html,
        "<tr><th>Percentage</th><td style=\"{}\">{:.1}%</td></tr>",
        status_color(status),
        rate(covered_lines, lines) * 100.0
    )
    .unwrap();
    html.push_str("</table>\n");

    html.push_str("<h1>Coverage</h1>\n");
    html.push_str("<table border=\"1\" cellpadding=\"5\">\n");
    html.push_str("<tr>\n");
    html.push_str("<th>File</th>\n");
    html.push_str("<th>Lines</th>\n");
    html.push_str("<th>Covered Lines</th>\n");
    html.push_str("<th>Percentage</th>\n");
    html.push_str("</tr>\n");
    for row in rows {
        writeln!(
            html,
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td>\
             <td style=\"{}\">{:.1}%</td></tr>",
            escape(&row.link),
            escape(&row.path),
            row.summary.lines,
            row.summary.covered_lines,
            status_color(row.status),
            row.summary.line_rate() * 100.0
        )
        .unwrap();
    }
    html.push_str("</table>\n");

    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

/// Write an artifact, creating parent directories as needed. Overwrites any
/// existing file at the path.
fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// The HTML renderer: per-file pages under the output directory plus an
/// `index.html` summary linking them.
pub struct HtmlReport {
    output: PathBuf,
    source_root: PathBuf,
    rows: Vec<SummaryRow>,
}

impl HtmlReport {
    pub fn new(output: impl Into<PathBuf>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            source_root: source_root.into(),
            rows: Vec::new(),
        }
    }

    fn read_source_lines(&self, relative_path: &str) -> Result<Vec<String>> {
        let path = self.source_root.join(relative_path);
        let text = fs::read_to_string(&path).map_err(|source| CovpageError::Source {
            path: path.clone(),
            source,
        })?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

impl Renderer for HtmlReport {
    fn file_summary(&mut self, path: &str, summary: &FileSummary, status: Status) -> Result<()> {
        self.rows.push(SummaryRow {
            path: path.to_string(),
            link: artifact_path(path),
            summary: *summary,
            status,
        });
        Ok(())
    }

    fn file_detail(&mut self, file: &SourceFile, hits: &dyn HitLookup) -> Result<()> {
        let source_lines = self.read_source_lines(&file.path)?;
        let annotations = classify(&source_lines, &file.instructions, hits);
        let page = render_page(&source_lines, &annotations);
        write_artifact(&self.output.join(artifact_path(&file.path)), &page)
    }

    fn finish(
        &mut self,
        lines: u64,
        covered_lines: u64,
        threshold: f64,
        status: Status,
    ) -> Result<()> {
        let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let html = render_index(
            &self.rows,
            lines,
            covered_lines,
            threshold,
            status,
            &generated_at,
        );
        write_artifact(&self.output.join("index.html"), &html)
    }
}
