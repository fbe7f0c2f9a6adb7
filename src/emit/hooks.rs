//! Hand-written hook detection.

use std::collections::BTreeSet;

use regex::Regex;

/// The set of hook identifiers defined in a hand-written hook source.
///
/// Lookups compare whole identifiers, so `OnEnterFoo` is not found in a
/// source that only defines `OnEnterFooBar`.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    names: BTreeSet<String>,
}

impl HookRegistry {
    /// Registry without hooks: every shim casts its arguments away.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect every identifier starting with one of `prefixes`.
    pub fn from_source(text: &str, prefixes: &[&str]) -> Self {
        let alternatives: Vec<String> = prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(p))
            .collect();
        if alternatives.is_empty() {
            return Self::empty();
        }

        let pattern = format!(r"\b(?:{})\w+\b", alternatives.join("|"));
        let re = Regex::new(&pattern).unwrap();
        let names = re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        HookRegistry { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_identifiers_only() {
        let source = "\
void OnEnterCommandListAppendMemoryCopyRegion(void* params);
static void OnExitInit(void* params) {}
// OnEnter alone is not a hook
";
        let hooks = HookRegistry::from_source(source, &["OnEnter", "OnExit"]);

        assert!(hooks.contains("OnEnterCommandListAppendMemoryCopyRegion"));
        assert!(hooks.contains("OnExitInit"));
        assert!(!hooks.contains("OnEnterCommandListAppendMemoryCopy"));
        assert!(!hooks.contains("OnEnter"));
        assert_eq!(hooks.len(), 2);
    }

    #[test]
    fn test_prefix_must_start_identifier() {
        let hooks = HookRegistry::from_source("void MyOnEnterInit();", &["OnEnter"]);
        assert!(hooks.is_empty());
    }
}
