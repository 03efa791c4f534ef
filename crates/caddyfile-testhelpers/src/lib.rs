//! Helpers for asserting errors against caret-annotated sources.
//!
//! An annotated source is ordinary Caddyfile text where some lines are
//! annotations: their first non-whitespace character is `^`. The carets mark
//! character columns on the nearest preceding source line, and the text after
//! the carets must appear in the error message reported for that range:
//!
//! ```text
//! example.com {
//!     foobar
//!     ^^^^^^ unknown directive
//! }
//! ```

use caddyfile_tokenizer::{Position, Range};

/// An error reported by the code under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualError {
    pub range: Range,
    pub message: String,
}

impl ActualError {
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// An error expected by an annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExpectedError {
    range: Range,
    label: String,
}

fn is_annotation(line: &str) -> bool {
    line.trim_start().starts_with('^')
}

/// Remove annotation lines, returning the source the code under test sees.
pub fn source_without_annotations(annotated: &str) -> String {
    annotated
        .split_inclusive('\n')
        .filter(|line| !is_annotation(line))
        .collect()
}

fn expected_errors(annotated: &str) -> Vec<ExpectedError> {
    let mut expected = Vec::new();
    let mut source_line: Option<u32> = None;
    let mut next_line = 0u32;

    for line in annotated.lines() {
        if !is_annotation(line) {
            source_line = Some(next_line);
            next_line += 1;
            continue;
        }
        let Some(target) = source_line else {
            panic!("annotation {line:?} has no source line above it");
        };
        let start = line.chars().take_while(|c| *c != '^').count() as u32;
        let width = line.chars().skip(start as usize).take_while(|c| *c == '^').count() as u32;
        let label: String = line.chars().skip((start + width) as usize).collect();
        expected.push(ExpectedError {
            range: Range::new(
                Position::new(target, start),
                Position::new(target, start + width),
            ),
            label: label.trim().to_string(),
        });
    }
    expected
}

fn describe(range: &Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line, range.start.character, range.end.line, range.end.character
    )
}

/// Assert that `actual` matches the annotations in `annotated` exactly.
///
/// Every annotation must be matched by an error with the same range whose
/// message contains the annotation label, and every actual error must be
/// matched by an annotation. Order does not matter.
pub fn assert_annotated_errors(annotated: &str, actual: Vec<ActualError>) {
    let expected = expected_errors(annotated);
    let mut unmatched_actual = actual;
    let mut missing = Vec::new();

    for exp in &expected {
        let found = unmatched_actual
            .iter()
            .position(|act| act.range == exp.range && act.message.contains(&exp.label));
        match found {
            Some(index) => {
                unmatched_actual.remove(index);
            }
            None => missing.push(exp),
        }
    }

    if missing.is_empty() && unmatched_actual.is_empty() {
        return;
    }

    let mut report = String::from("annotated errors do not match\n");
    report.push_str("--- source ---\n");
    report.push_str(&source_without_annotations(annotated));
    for exp in missing {
        report.push_str(&format!(
            "\nexpected but not reported: {} {:?}",
            describe(&exp.range),
            exp.label
        ));
    }
    for act in unmatched_actual {
        report.push_str(&format!(
            "\nreported but not expected: {} {:?}",
            describe(&act.range),
            act.message
        ));
    }
    panic!("{report}");
}
