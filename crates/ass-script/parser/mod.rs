//! ASS script parser
//!
//! Splits a document into its `[Script Info]`, `[V4+ Styles]` and `[Events]`
//! sections and hands every line to the matching section parser. Parsing is
//! permissive: lines that do not fit their section are skipped and recorded
//! as [`ParseIssue`]s.
//!
//! # Example
//!
//! ```rust
//! use ass_script::Script;
//!
//! let script = Script::parse("[Events]\nFormat: Start, End, Style, Text\nDialogue: 0:00:00.00,0:00:01.00,Missing,Hi");
//!
//! // unknown styles resolve to the built-in Default
//! assert_eq!(script.style(&script.events()[0].style).name, "Default");
//! ```

pub mod ast;
mod errors;
pub mod sections;

use ahash::AHashMap;

use self::ast::{Event, ScriptInfo, Style};
use self::sections::{EventsParser, ScriptInfoParser, StylesParser};

pub use errors::{IssueCategory, IssueSeverity, ParseIssue};

/// Section currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// Lines before the first header
    Preamble,
    ScriptInfo,
    Styles,
    Events,
    /// Sections the renderer has no use for (`[Fonts]`, `[Graphics]`, ...)
    Unknown,
}

impl SectionKind {
    fn from_header(header: &str) -> Self {
        if header == "[Script Info]" {
            Self::ScriptInfo
        } else if header.contains("Styles") {
            Self::Styles
        } else if header == "[Events]" {
            Self::Events
        } else {
            Self::Unknown
        }
    }
}

/// Parsed ASS script
///
/// Immutable after parsing. Styles are kept in document order with a name
/// index for lookups.
#[derive(Debug, Clone)]
pub struct Script {
    info: ScriptInfo,
    styles: Vec<Style>,
    style_index: AHashMap<String, usize>,
    events: Vec<Event>,
    issues: Vec<ParseIssue>,
    fallback_style: Style,
}

impl Script {
    /// Parse a script document
    ///
    /// Never fails; see [`Script::issues`] for skipped content.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let mut info_parser = ScriptInfoParser::new();
        let mut styles_parser = StylesParser::new();
        let mut events_parser = EventsParser::new();
        let mut issues = Vec::new();
        let mut section = SectionKind::Preamble;

        for (index, raw) in source.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                section = SectionKind::from_header(line);
                if section == SectionKind::Unknown {
                    issues.push(ParseIssue::info(
                        IssueCategory::Structure,
                        format!("Skipping unsupported section {line}"),
                        line_number,
                    ));
                }
                continue;
            }

            match section {
                SectionKind::ScriptInfo => info_parser.parse_line(line, line_number),
                SectionKind::Styles => styles_parser.parse_line(line, line_number),
                SectionKind::Events => events_parser.parse_line(line, line_number),
                SectionKind::Preamble | SectionKind::Unknown => {}
            }
        }

        let (info, mut info_issues) = info_parser.finish();
        let (styles, mut style_issues) = styles_parser.finish();
        let (events, mut event_issues) = events_parser.finish();
        issues.append(&mut info_issues);
        issues.append(&mut style_issues);
        issues.append(&mut event_issues);
        issues.sort_by_key(|issue| issue.line);

        let style_index = styles
            .iter()
            .enumerate()
            .map(|(i, style)| (style.name.clone(), i))
            .collect();

        log::debug!(
            "parsed script: {} info fields, {} styles, {} events, {} issues",
            info.fields.len(),
            styles.len(),
            events.len(),
            issues.len()
        );

        Self {
            info,
            styles,
            style_index,
            events,
            issues,
            fallback_style: Style::builtin_default(),
        }
    }

    /// `[Script Info]` fields
    #[must_use]
    pub const fn info(&self) -> &ScriptInfo {
        &self.info
    }

    /// Styles in document order
    #[must_use]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Dialogue events in document order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Issues collected while parsing, ordered by line
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Find a style by exact name
    #[must_use]
    pub fn find_style(&self, name: &str) -> Option<&Style> {
        self.style_index.get(name).map(|&i| &self.styles[i])
    }

    /// Resolve a style reference
    ///
    /// Falls back to the script's `Default` style and then to the built-in
    /// [`Style::builtin_default`].
    #[must_use]
    pub fn style(&self, name: &str) -> &Style {
        self.find_style(name)
            .or_else(|| self.find_style(Style::DEFAULT_NAME))
            .unwrap_or(&self.fallback_style)
    }
}
