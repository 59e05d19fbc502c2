//! Identifier allocation for generated visual resources

use core::fmt;

/// Identifier of a generated resource (gradient, clip region, transition scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(u64);

impl ResourceId {
    /// Raw counter value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic per-renderer id counter
///
/// Never reset, so ids stay unique across reloads of the same renderer.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a counter starting at 1
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id
    pub fn allocate(&mut self) -> ResourceId {
        let id = ResourceId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert!(b > a);
        assert_eq!(a.get(), 1);
        assert_eq!(ids.allocated(), 2);
    }
}
