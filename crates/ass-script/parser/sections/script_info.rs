//! Script Info section parser

use crate::parser::{ast::ScriptInfo, errors::IssueCategory, ParseIssue};

/// Parser for `[Script Info]` key-value lines
#[derive(Debug, Default)]
pub struct ScriptInfoParser {
    fields: Vec<(String, String)>,
    issues: Vec<ParseIssue>,
}

impl ScriptInfoParser {
    /// Create an empty parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single trimmed, non-empty line
    ///
    /// Comment lines (`!`, `;`) are ignored. A line must split into exactly
    /// two parts on `:`; values that themselves contain a colon are skipped.
    pub fn parse_line(&mut self, line: &str, line_number: usize) {
        if line.starts_with('!') || line.starts_with(';') {
            return;
        }

        let mut parts = line.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                self.fields
                    .push((key.trim().to_string(), value.trim().to_string()));
            }
            _ => {
                log::trace!("skipping script info line {line_number}: {line}");
                self.issues.push(ParseIssue::warning(
                    IssueCategory::Format,
                    format!("Script info line is not a key:value pair: {line}"),
                    line_number,
                ));
            }
        }
    }

    /// Finish the section
    #[must_use]
    pub fn finish(self) -> (ScriptInfo, Vec<ParseIssue>) {
        (
            ScriptInfo {
                fields: self.fields,
            },
            self.issues,
        )
    }
}
