//! Per-line coverage classification.
//!
//! Reconciles instruction-level hit data against source-line text: each
//! physical line is classified covered / uncovered / non-executable, with
//! an aggregate hit count and the deduplicated list of attributing tests.
//! Annotations are recomputed fresh for every render and never cached, so
//! a report always reflects the latest hit snapshot.

use std::collections::HashSet;

use crate::model::{FileSummary, HitLookup, Instruction, TestMethod};

/// Coverage status of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// At least one instruction spanning the line was hit.
    Covered,
    /// Instructions span the line but none were hit.
    Uncovered,
    /// No instruction spans the line (blank lines, braces, comments).
    NonExecutable,
}

/// Derived annotation for one physical source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAnnotation {
    /// 1-indexed line number.
    pub line_number: u32,
    pub classification: Classification,
    /// Sum of hit counts over all instructions spanning the line. Multiple
    /// instructions on one line each contribute: this measures execution
    /// volume at the source position, not instruction count.
    pub hit_count: u64,
    /// Attributing tests, deduplicated by `(class, method)` in first-seen
    /// order.
    pub tests: Vec<TestMethod>,
}

/// Classify every line of a source file, one annotation per entry of
/// `source_lines`.
///
/// A line spanned by both hit and not-hit instructions counts as covered.
/// If `source_lines` diverges from what the instrumentation recorded (the
/// file changed after instrumentation), classification proceeds per
/// available line index; the mismatch is the caller's data-quality problem,
/// not an error.
pub fn classify(
    source_lines: &[String],
    instructions: &[Instruction],
    hits: &dyn HitLookup,
) -> Vec<LineAnnotation> {
    let mut covered: HashSet<u32> = HashSet::new();
    let mut uncovered: HashSet<u32> = HashSet::new();
    for instruction in instructions {
        let set = if hits.is_hit(&instruction.id) {
            &mut covered
        } else {
            &mut uncovered
        };
        set.extend(instruction.lines.iter().copied());
    }

    (1..=source_lines.len() as u32)
        .map(|line_number| annotate_line(line_number, &covered, &uncovered, instructions, hits))
        .collect()
}

fn annotate_line(
    line_number: u32,
    covered: &HashSet<u32>,
    uncovered: &HashSet<u32>,
    instructions: &[Instruction],
    hits: &dyn HitLookup,
) -> LineAnnotation {
    let classification = if covered.contains(&line_number) {
        Classification::Covered
    } else if uncovered.contains(&line_number) {
        Classification::Uncovered
    } else {
        Classification::NonExecutable
    };

    let mut hit_count = 0;
    let mut tests: Vec<TestMethod> = Vec::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for instruction in instructions {
        if !instruction.lines.contains(&line_number) {
            continue;
        }
        hit_count += hits.hit_count(&instruction.id);
        for test in hits.attributing_tests(&instruction.id) {
            if seen.insert((test.class_name.as_str(), test.method_name.as_str())) {
                tests.push(test.clone());
            }
        }
    }

    LineAnnotation {
        line_number,
        classification,
        hit_count,
        tests,
    }
}

/// Derive the per-file summary row from classifier output: total counts
/// distinct instrumented lines, covered counts those classified covered.
#[must_use]
pub fn summarize(annotations: &[LineAnnotation]) -> FileSummary {
    let lines = annotations
        .iter()
        .filter(|a| a.classification != Classification::NonExecutable)
        .count() as u64;
    let covered_lines = annotations
        .iter()
        .filter(|a| a.classification == Classification::Covered)
        .count() as u64;
    FileSummary {
        lines,
        covered_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HitMap;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    fn instruction(id: &str, lines: &[u32]) -> Instruction {
        Instruction {
            id: id.to_string(),
            lines: lines.to_vec(),
        }
    }

    #[test]
    fn test_line_without_instructions_is_non_executable() {
        let annotations = classify(&lines(&["", "}"]), &[], &HitMap::new());
        assert_eq!(annotations.len(), 2);
        assert!(annotations
            .iter()
            .all(|a| a.classification == Classification::NonExecutable));
        assert!(annotations.iter().all(|a| a.hit_count == 0));
    }

    #[test]
    fn test_multi_line_instruction_with_attribution() {
        // I1 spans lines 1-2 and was hit twice by Foo.Bar; I2 on line 3
        // never ran.
        let instructions = vec![instruction("i1", &[1, 2]), instruction("i2", &[3])];
        let mut hits = HitMap::new();
        hits.record("i1", "Foo", "Bar", 2);

        let annotations = classify(&lines(&["let x = foo()", "    .bar();", "panic!()"]), &instructions, &hits);

        assert_eq!(annotations[0].classification, Classification::Covered);
        assert_eq!(annotations[0].hit_count, 2);
        assert_eq!(annotations[0].tests.len(), 1);
        assert_eq!(annotations[0].tests[0].class_name, "Foo");

        assert_eq!(annotations[1].classification, Classification::Covered);
        assert_eq!(annotations[1].hit_count, 2);

        assert_eq!(annotations[2].classification, Classification::Uncovered);
        assert_eq!(annotations[2].hit_count, 0);
        assert!(annotations[2].tests.is_empty());
    }

    #[test]
    fn test_covered_dominates_mixed_spans() {
        // Two instructions on line 1: one hit, one not.
        let instructions = vec![instruction("hit", &[1]), instruction("missed", &[1])];
        let mut hits = HitMap::new();
        hits.record("hit", "T", "t", 1);

        let annotations = classify(&lines(&["a(); b();"]), &instructions, &hits);
        assert_eq!(annotations[0].classification, Classification::Covered);
    }

    #[test]
    fn test_hit_count_sums_overlapping_instructions() {
        let instructions = vec![instruction("i1", &[1, 2]), instruction("i2", &[2])];
        let mut hits = HitMap::new();
        hits.record("i1", "T", "a", 3);
        hits.record("i2", "T", "b", 4);

        let annotations = classify(&lines(&["x", "y"]), &instructions, &hits);
        assert_eq!(annotations[0].hit_count, 3);
        assert_eq!(annotations[1].hit_count, 7);
    }

    #[test]
    fn test_attribution_deduplicates_by_identity() {
        // The same test hit two different instructions on one line.
        let instructions = vec![instruction("i1", &[1]), instruction("i2", &[1])];
        let mut hits = HitMap::new();
        hits.record("i1", "Foo", "Bar", 1);
        hits.record("i2", "Foo", "Bar", 1);
        hits.record("i2", "Foo", "Other", 1);

        let annotations = classify(&lines(&["x"]), &instructions, &hits);
        assert_eq!(annotations[0].tests.len(), 2);
        assert_eq!(annotations[0].tests[0].method_name, "Bar");
        assert_eq!(annotations[0].tests[1].method_name, "Other");
    }

    #[test]
    fn test_line_count_mismatch_is_tolerated() {
        // Instrumentation recorded line 5 but the file now has 2 lines.
        let instructions = vec![instruction("i1", &[5])];
        let annotations = classify(&lines(&["a", "b"]), &instructions, &HitMap::new());
        assert_eq!(annotations.len(), 2);
        assert!(annotations
            .iter()
            .all(|a| a.classification == Classification::NonExecutable));
    }

    #[test]
    fn test_summarize_counts_instrumented_lines() {
        let instructions = vec![instruction("i1", &[1]), instruction("i2", &[3])];
        let mut hits = HitMap::new();
        hits.record("i1", "T", "t", 1);

        let annotations = classify(&lines(&["a", "", "c"]), &instructions, &hits);
        let summary = summarize(&annotations);
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.covered_lines, 1);
        assert_eq!(summary.line_rate(), 0.5);
    }

    #[test]
    fn test_summarize_empty_file() {
        let summary = summarize(&[]);
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.line_rate(), 1.0);
    }
}
