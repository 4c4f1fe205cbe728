//! In-memory representation of the instrumentation model consumed by the
//! renderers. The instrumentation engine produces instructions mapped to
//! source lines; the test runner produces hit counts and test attribution,
//! queried through [`HitLookup`].

use std::collections::HashMap;

/// Compute a coverage rate as a fraction in `0.0..=1.0`.
///
/// A zero total counts as fully covered: a file with nothing to cover
/// cannot fail a threshold.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        covered as f64 / total as f64
    }
}

/// An instrumented unit of executable code.
///
/// A single instruction may span multiple source lines (e.g. a multi-line
/// statement). Line numbers are 1-indexed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Instruction {
    /// Stable identifier assigned by the instrumentation engine.
    pub id: String,
    /// Source lines this instruction spans.
    pub lines: Vec<u32>,
}

/// A source file known to the instrumentation engine, keyed by a path
/// relative to the source root.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub instructions: Vec<Instruction>,
}

impl SourceFile {
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }
}

/// A test method that exercised an instruction.
///
/// Identity for deduplication is `(class_name, method_name)`; `count` is
/// how many times this particular test drove the instruction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TestMethod {
    pub class_name: String,
    pub method_name: String,
    pub count: u64,
}

impl TestMethod {
    /// Display form used in tooltips: `Class.method (count)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{} ({})", self.class_name, self.method_name, self.count)
    }
}

/// Query surface over the raw hit data collected during a test run.
pub trait HitLookup {
    /// Whether the instruction executed at least once.
    fn is_hit(&self, instruction_id: &str) -> bool;

    /// Total execution count across all tests.
    fn hit_count(&self, instruction_id: &str) -> u64;

    /// Tests that exercised the instruction, in first-seen order.
    fn attributing_tests(&self, instruction_id: &str) -> &[TestMethod];
}

#[derive(Debug, Default)]
struct InstructionHits {
    count: u64,
    tests: Vec<TestMethod>,
}

/// In-memory [`HitLookup`] built up one recorded hit at a time.
#[derive(Debug, Default)]
pub struct HitMap {
    instructions: HashMap<String, InstructionHits>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` executions of an instruction by a test. Repeated calls
    /// for the same `(class, method)` accumulate into one entry.
    pub fn record(&mut self, instruction_id: &str, class_name: &str, method_name: &str, count: u64) {
        let entry = self
            .instructions
            .entry(instruction_id.to_string())
            .or_default();
        entry.count += count;
        match entry
            .tests
            .iter_mut()
            .find(|t| t.class_name == class_name && t.method_name == method_name)
        {
            Some(test) => test.count += count,
            None => entry.tests.push(TestMethod {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
                count,
            }),
        }
    }
}

impl HitLookup for HitMap {
    fn is_hit(&self, instruction_id: &str) -> bool {
        self.instructions.contains_key(instruction_id)
    }

    fn hit_count(&self, instruction_id: &str) -> u64 {
        self.instructions
            .get(instruction_id)
            .map_or(0, |h| h.count)
    }

    fn attributing_tests(&self, instruction_id: &str) -> &[TestMethod] {
        self.instructions
            .get(instruction_id)
            .map_or(&[], |h| h.tests.as_slice())
    }
}

/// Per-file aggregate fed into the summary index.
///
/// `lines` counts distinct instrumented lines (lines spanned by at least one
/// instruction), not physical lines — blanks and comments don't dilute the
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FileSummary {
    pub lines: u64,
    pub covered_lines: u64,
}

impl FileSummary {
    #[must_use]
    pub fn line_rate(&self) -> f64 {
        rate(self.covered_lines, self.lines)
    }
}

/// Pass/fail verdict against the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// A rate meeting or exceeding the threshold passes.
    #[must_use]
    pub fn from_rate(rate: f64, threshold: f64) -> Self {
        if rate >= threshold {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}
