//! Section-specific parsers
//!
//! Each parser is fed the trimmed lines of its section one at a time by the
//! top-level [`Script`](crate::Script) parser and collects the records and
//! [`ParseIssue`](crate::ParseIssue)s of that section.

mod events;
mod script_info;
mod styles;

pub use events::EventsParser;
pub use script_info::ScriptInfoParser;
pub use styles::StylesParser;

/// Look up a field by (case-insensitive) schema name in a zipped line
fn field<'a>(format: &[String], parts: &[&'a str], name: &str) -> Option<&'a str> {
    format
        .iter()
        .position(|f| f.eq_ignore_ascii_case(name))
        .and_then(|idx| parts.get(idx).copied())
}

/// Parse a `Format:` line into trimmed field names
fn parse_format(data: &str) -> Vec<String> {
    data.split(',').map(|f| f.trim().to_string()).collect()
}
