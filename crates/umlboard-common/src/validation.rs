//! Identifier grammar and per-kind name uniqueness
//!
//! Mutating setters in the model never throw on a bad name; they consult
//! `verify_name` / `NameRegistry` and report `false`, leaving the rename
//! decision with the caller.

use std::collections::HashMap;

use crate::id::ComponentId;

use serde::{Deserialize, Serialize};

/// Accented characters accepted by the identifier grammar, a fixed set
/// carried over from the editor's legacy name rules.
const ACCENTED: &str = "àâäéèêëîïôöùûüçÀÂÄÉÈÊËÎÏÔÖÙÛÜÇ";

/// The namespace a name is checked against.
///
/// Type names, method names and variable names are independent scopes: a
/// method may share its name with an attribute without conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    /// Entity and data-type names
    Type,
    /// Method names
    Method,
    /// Attribute and parameter names
    Variable,
}

impl NameKind {
    /// Get all name kinds.
    pub fn all() -> &'static [NameKind] {
        &[NameKind::Type, NameKind::Method, NameKind::Variable]
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || ACCENTED.contains(c)
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Check a name against the identifier grammar.
///
/// Accepts ASCII letters, digits, underscores and a fixed accented set;
/// the first character must not be a digit. Returns `false` instead of
/// erroring so callers can keep the current name.
pub fn verify_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Tracks which names are taken, per kind, within one document
///
/// Uniqueness is scoped by [`NameKind`]; a name maps to the id of the
/// component holding it. Registration paths that bypass user input (for
/// example cloning) insert without an availability check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRegistry {
    names: HashMap<NameKind, HashMap<String, ComponentId>>,
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `name` passes the grammar and is not held by another component
    pub fn verify(&self, kind: NameKind, name: &str, holder: ComponentId) -> bool {
        verify_name(name) && self.is_available(kind, name, holder)
    }

    /// True when `name` is unused in `kind`, or already held by `holder`
    pub fn is_available(&self, kind: NameKind, name: &str, holder: ComponentId) -> bool {
        match self.names.get(&kind).and_then(|scope| scope.get(name)) {
            Some(current) => *current == holder,
            None => true,
        }
    }

    /// Record `name` as held by `holder`, replacing any previous owner entry
    pub fn register(&mut self, kind: NameKind, name: &str, holder: ComponentId) {
        self.names
            .entry(kind)
            .or_default()
            .insert(name.to_string(), holder);
    }

    /// Release `name` if it is held by `holder`
    pub fn release(&mut self, kind: NameKind, name: &str, holder: ComponentId) {
        if let Some(scope) = self.names.get_mut(&kind) {
            if scope.get(name) == Some(&holder) {
                scope.remove(name);
            }
        }
    }

    /// Number of names tracked in one kind scope
    pub fn tracked(&self, kind: NameKind) -> usize {
        self.names.get(&kind).map_or(0, |scope| scope.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_name_accepts_identifiers() {
        assert!(verify_name("foo"));
        assert!(verify_name("_bar"));
        assert!(verify_name("Foo42"));
        assert!(verify_name("éléphant"));
    }

    #[test]
    fn test_verify_name_rejects_bad_identifiers() {
        assert!(!verify_name(""));
        assert!(!verify_name("2fast"));
        assert!(!verify_name("has space"));
        assert!(!verify_name("dash-ed"));
        assert!(!verify_name("dot.ted"));
    }

    #[test]
    fn test_registry_scopes_are_independent() {
        let mut registry = NameRegistry::new();
        registry.register(NameKind::Method, "value", ComponentId::from_raw(1));
        assert!(registry.is_available(NameKind::Variable, "value", ComponentId::from_raw(2)));
        assert!(!registry.is_available(NameKind::Method, "value", ComponentId::from_raw(2)));
    }

    #[test]
    fn test_registry_holder_keeps_own_name() {
        let mut registry = NameRegistry::new();
        registry.register(NameKind::Type, "Foo", ComponentId::from_raw(1));
        assert!(registry.verify(NameKind::Type, "Foo", ComponentId::from_raw(1)));
        assert!(!registry.verify(NameKind::Type, "Foo", ComponentId::from_raw(2)));
    }

    #[test]
    fn test_registry_release_requires_holder() {
        let mut registry = NameRegistry::new();
        registry.register(NameKind::Variable, "x", ComponentId::from_raw(1));
        registry.release(NameKind::Variable, "x", ComponentId::from_raw(2));
        assert!(!registry.is_available(NameKind::Variable, "x", ComponentId::from_raw(3)));
        registry.release(NameKind::Variable, "x", ComponentId::from_raw(1));
        assert!(registry.is_available(NameKind::Variable, "x", ComponentId::from_raw(3)));
    }

    #[test]
    fn test_registry_rename_flow() {
        let mut registry = NameRegistry::new();
        registry.register(NameKind::Method, "run", ComponentId::from_raw(1));
        assert!(registry.verify(NameKind::Method, "start", ComponentId::from_raw(1)));
        registry.release(NameKind::Method, "run", ComponentId::from_raw(1));
        registry.register(NameKind::Method, "start", ComponentId::from_raw(1));
        assert!(registry.is_available(NameKind::Method, "run", ComponentId::from_raw(9)));
        assert_eq!(registry.tracked(NameKind::Method), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for strings matching the identifier grammar
    fn identifier_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z_][a-zA-Z0-9_]{0,30}".prop_map(|s| s.to_string())
    }

    proptest! {
        #[test]
        fn prop_grammar_accepts_generated_identifiers(name in identifier_strategy()) {
            prop_assert!(verify_name(&name));
        }

        #[test]
        fn prop_grammar_rejects_leading_digit(
            digit in 0u8..10,
            rest in r"[a-zA-Z0-9_]{0,10}",
        ) {
            let name = format!("{}{}", digit, rest);
            prop_assert!(!verify_name(&name));
        }

        #[test]
        fn prop_registered_name_blocks_other_holders(
            name in identifier_strategy(),
            holder in 0u64..100,
            other in 100u64..200,
        ) {
            let holder = ComponentId::from_raw(holder);
            let other = ComponentId::from_raw(other);
            let mut registry = NameRegistry::new();
            registry.register(NameKind::Type, &name, holder);
            prop_assert!(registry.verify(NameKind::Type, &name, holder));
            prop_assert!(!registry.verify(NameKind::Type, &name, other));
        }
    }
}
