//! Component identifiers and their allocator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a diagram component - an integer unique within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Create an id from its raw integer value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw integer value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues unique component ids for one document
///
/// Ids are monotonically increasing and never reused, so a snapshot taken
/// for a destroyed component can never alias a newer one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a new allocator starting at id 0
    pub fn new() -> Self {
        IdAllocator { next: 0 }
    }

    /// Allocate the next id
    pub fn allocate(&mut self) -> ComponentId {
        let id = ComponentId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut allocator = IdAllocator::new();
        let a = allocator.allocate();
        let b = allocator.allocate();
        let c = allocator.allocate();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_allocator_never_reuses() {
        let mut allocator = IdAllocator::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(allocator.allocate()));
        }
        assert_eq!(allocator.issued(), 1000);
    }

    #[test]
    fn test_component_id_display() {
        assert_eq!(ComponentId::from_raw(42).to_string(), "42");
    }

    #[test]
    fn test_component_id_serialization_roundtrip() {
        let id = ComponentId::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ComponentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_independent_allocators_are_isolated() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        assert_eq!(a.allocate(), b.allocate());
        a.allocate();
        assert_eq!(a.issued(), 2);
        assert_eq!(b.issued(), 1);
    }
}
