//! The rendering protocol spoken by the report driver.
//!
//! The driver owns sequencing: for each known source file (in whatever
//! order it chooses) it calls [`Renderer::file_summary`] and
//! [`Renderer::file_detail`], then calls [`Renderer::finish`] exactly once
//! with the grand totals. Any concrete renderer implements this trait
//! independently; there is no shared base.

use crate::error::Result;
use crate::model::{FileSummary, HitLookup, SourceFile, Status};

/// A renderer that turns the instrumentation model into report artifacts.
pub trait Renderer {
    /// Called once before any file. Most renderers need no setup.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Accumulate one file's aggregate numbers for the summary, with the
    /// driver's pass/fail verdict for that file.
    fn file_summary(&mut self, path: &str, summary: &FileSummary, status: Status) -> Result<()>;

    /// Render the detailed per-file artifact for one source file.
    fn file_detail(&mut self, file: &SourceFile, hits: &dyn HitLookup) -> Result<()>;

    /// Flush the summary artifact with grand totals, the configured
    /// threshold, and the overall verdict.
    fn finish(
        &mut self,
        lines: u64,
        covered_lines: u64,
        threshold: f64,
        status: Status,
    ) -> Result<()>;
}
