//! Event AST node for ASS dialogue lines

/// Dialogue event from `[Events]` section
///
/// Times are in seconds from the start of the video. `end` is never before
/// `start`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Layer (z-order bucket), higher is drawn on top
    pub layer: i32,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Style name, sanitized like style definitions
    pub style: String,

    /// Actor name
    pub name: String,

    /// Left margin override, `0` means use the style's
    pub margin_l: i32,

    /// Right margin override, `0` means use the style's
    pub margin_r: i32,

    /// Vertical margin override, `0` means use the style's
    pub margin_v: i32,

    /// Effect field, kept verbatim
    pub effect: String,

    /// Raw tagged text including commas
    pub text: String,

    /// 1-based source line number
    pub line: usize,
}

impl Event {
    /// Event duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        (self.end - self.start) * 1000.0
    }

    /// Whether the event is visible at `time` seconds (inclusive bounds)
    #[must_use]
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

impl Default for Event {
    fn default() -> Self {
        Self {
            layer: 0,
            start: 0.0,
            end: 0.0,
            style: "Default".to_string(),
            name: String::new(),
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            effect: String::new(),
            text: String::new(),
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_bounds_are_inclusive() {
        let event = Event {
            start: 1.0,
            end: 2.0,
            ..Event::default()
        };
        assert!(event.is_active_at(1.0));
        assert!(event.is_active_at(2.0));
        assert!(!event.is_active_at(0.99));
        assert!(!event.is_active_at(2.01));
    }
}
