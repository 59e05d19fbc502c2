//! Events section parser for ASS scripts.
//!
//! `Dialogue:` lines are zipped against the `Format:` schema. Splitting stops
//! at the `Text` column so the text keeps its commas verbatim.

use crate::{
    parser::{ast::Event, errors::IssueCategory, ParseIssue},
    utils::{parse_float_prefix, parse_time_lenient, sanitize_name},
};

use super::{field, parse_format};

/// Column order assumed when a section has no `Format:` line
const DEFAULT_EVENT_FORMAT: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// Parser for `[Events]` section content
#[derive(Debug, Default)]
pub struct EventsParser {
    /// Format fields for the events section
    format: Option<Vec<String>>,
    events: Vec<Event>,
    issues: Vec<ParseIssue>,
}

impl EventsParser {
    /// Create an empty parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single trimmed, non-empty line
    pub fn parse_line(&mut self, line: &str, line_number: usize) {
        if let Some(format_data) = line.strip_prefix("Format:") {
            self.format = Some(parse_format(format_data));
        } else if let Some(data) = line.strip_prefix("Dialogue:") {
            let event = self.parse_dialogue(data.trim_start(), line_number);
            self.events.push(event);
        } else if line.starts_with("Comment:") || line.starts_with(';') {
            log::trace!("skipping comment event on line {line_number}");
        } else {
            log::trace!("skipping event section line {line_number}: {line}");
            self.issues.push(ParseIssue::info(
                IssueCategory::Structure,
                format!("Unexpected line in events section: {line}"),
                line_number,
            ));
        }
    }

    /// Finish the section
    #[must_use]
    pub fn finish(self) -> (Vec<Event>, Vec<ParseIssue>) {
        (self.events, self.issues)
    }

    fn parse_dialogue(&mut self, data: &str, line_number: usize) -> Event {
        let default_format: Vec<String>;
        let format = if let Some(format) = &self.format {
            format.as_slice()
        } else {
            default_format = DEFAULT_EVENT_FORMAT.iter().map(ToString::to_string).collect();
            &default_format
        };

        let text_index = format.iter().position(|f| f.eq_ignore_ascii_case("Text"));
        let parts: Vec<&str> = match text_index {
            Some(index) => data.splitn(index + 1, ',').collect(),
            None => data.split(',').collect(),
        };

        let get = |name: &str| field(format, &parts, name).map(str::trim);
        let integer = |name: &str| {
            get(name)
                .and_then(parse_float_prefix)
                .filter(|v| v.is_finite())
                .map_or(0, |v| v.trunc() as i32)
        };

        let start = get("Start").map_or(0.0, parse_time_lenient);
        let mut end = get("End").map_or(0.0, parse_time_lenient);
        if end < start {
            self.issues.push(ParseIssue::warning(
                IssueCategory::Timing,
                format!("Event ends before it starts ({end}s < {start}s)"),
                line_number,
            ));
            end = start;
        }

        let style = get("Style")
            .filter(|s| !s.is_empty())
            .map_or_else(|| "Default".to_string(), sanitize_name);

        Event {
            layer: integer("Layer"),
            start,
            end,
            style,
            name: get("Name").unwrap_or_default().to_string(),
            margin_l: integer("MarginL"),
            margin_r: integer("MarginR"),
            margin_v: integer("MarginV"),
            effect: get("Effect").unwrap_or_default().to_string(),
            text: text_index
                .and_then(|index| parts.get(index))
                .map(|text| (*text).to_string())
                .unwrap_or_default(),
            line: line_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> (Vec<Event>, Vec<ParseIssue>) {
        let mut parser = EventsParser::new();
        for (i, line) in lines.iter().enumerate() {
            parser.parse_line(line, i + 1);
        }
        parser.finish()
    }

    #[test]
    fn text_keeps_commas() {
        let (events, issues) = parse(&[
            "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text",
            "Dialogue: 1,0:00:01.00,0:00:02.50,My Style,Bob,5,6,7,,One, two, three",
        ]);
        assert!(issues.is_empty());
        let event = &events[0];
        assert_eq!(event.layer, 1);
        assert!((event.start - 1.0).abs() < 1e-9);
        assert!((event.end - 2.5).abs() < 1e-9);
        assert_eq!(event.style, "My_Style");
        assert_eq!(event.name, "Bob");
        assert_eq!((event.margin_l, event.margin_r, event.margin_v), (5, 6, 7));
        assert_eq!(event.text, "One, two, three");
        assert_eq!(event.line, 2);
    }

    #[test]
    fn malformed_numbers_default_to_zero() {
        let (events, _) = parse(&[
            "Format: Layer, Start, End, Style, Text",
            "Dialogue: x,bad,0:00:03.00,Default,Hi",
        ]);
        assert_eq!(events[0].layer, 0);
        assert!(events[0].start.abs() < f64::EPSILON);
        assert!((events[0].end - 3.0).abs() < 1e-9);
    }

    #[test]
    fn end_is_clamped_to_start() {
        let (events, issues) = parse(&[
            "Format: Start, End, Text",
            "Dialogue: 0:00:05.00,0:00:01.00,Backwards",
        ]);
        assert!((events[0].end - events[0].start).abs() < f64::EPSILON);
        assert_eq!(issues[0].category, IssueCategory::Timing);
    }

    #[test]
    fn comments_are_skipped() {
        let (events, issues) = parse(&[
            "Format: Start, End, Text",
            "Comment: 0:00:00.00,0:00:01.00,hidden",
            "Dialogue: 0:00:00.00,0:00:01.00,shown",
        ]);
        assert_eq!(events.len(), 1);
        assert!(issues.is_empty());
        assert_eq!(events[0].text, "shown");
        assert_eq!(events[0].style, "Default");
    }

    #[test]
    fn default_format_without_format_line() {
        let (events, _) = parse(&["Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,Hello, world"]);
        assert_eq!(events[0].text, "Hello, world");
    }
}
