//! Preprocessor guards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A preprocessor condition that must hold for a declaration to exist.
///
/// Guards are stored as the expression that follows `#if`, so `#ifdef X`
/// becomes `defined(X)` and `#ifndef X` becomes `!defined(X)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guard(String);

impl Guard {
    /// Guard from a raw `#if` expression.
    pub fn new(condition: impl Into<String>) -> Self {
        Guard(condition.into().trim().to_string())
    }

    /// Guard for `#ifdef MACRO`.
    pub fn defined(macro_name: &str) -> Self {
        Guard(format!("defined({})", macro_name.trim()))
    }

    /// Guard for `#ifndef MACRO`.
    pub fn not_defined(macro_name: &str) -> Self {
        Guard(format!("!defined({})", macro_name.trim()))
    }

    /// The condition expression, suitable for `#if <condition>`.
    pub fn condition(&self) -> &str {
        &self.0
    }

    /// Combine an outer and an inner guard into one condition.
    pub fn compose(outer: Option<&Guard>, inner: Option<&Guard>) -> Option<Guard> {
        match (outer, inner) {
            (None, None) => None,
            (Some(g), None) | (None, Some(g)) => Some(g.clone()),
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            (Some(a), Some(b)) => Some(Guard(format!("({}) && ({})", a.0, b.0))),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_guards() {
        let a = Guard::new("ZE_ENABLE_A");
        let b = Guard::defined("ZE_ENABLE_B");

        assert_eq!(Guard::compose(None, None), None);
        assert_eq!(Guard::compose(Some(&a), None), Some(a.clone()));
        assert_eq!(Guard::compose(None, Some(&b)), Some(b.clone()));
        assert_eq!(
            Guard::compose(Some(&a), Some(&b)).unwrap().condition(),
            "(ZE_ENABLE_A) && (defined(ZE_ENABLE_B))"
        );
        assert_eq!(Guard::compose(Some(&a), Some(&a)), Some(a));
    }

    #[test]
    fn test_ifndef_guard() {
        assert_eq!(Guard::not_defined(" LEGACY ").condition(), "!defined(LEGACY)");
    }
}
