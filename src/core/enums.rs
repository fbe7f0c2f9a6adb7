//! Enum definitions with resolved member values.

use serde::Serialize;

/// Value of one enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumValue {
    /// Numeric value known at generation time
    Resolved(i64),
    /// Symbolic expression that cannot be evaluated without a preprocessor
    Unresolved(String),
}

impl EnumValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EnumValue::Resolved(v) => Some(*v),
            EnumValue::Unresolved(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumValue,
}

/// A `typedef enum` with its members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        EnumDefinition {
            name: name.into(),
            members,
        }
    }

    /// Numeric value of a member. Unresolved members have none.
    pub fn value_of(&self, member: &str) -> Option<i64> {
        self.members
            .iter()
            .find(|m| m.name == member)
            .and_then(|m| m.value.as_i64())
    }

    /// Resolved members in declaration order.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, i64)> {
        self.members
            .iter()
            .filter_map(|m| m.value.as_i64().map(|v| (m.name.as_str(), v)))
    }

    /// Resolved members ascending by value, keeping the first name per value.
    pub fn by_value(&self) -> Vec<(&str, i64)> {
        let mut seen = std::collections::BTreeMap::new();
        for (name, value) in self.resolved() {
            seen.entry(value).or_insert(name);
        }
        seen.into_iter().map(|(value, name)| (name, value)).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, value: EnumValue) -> EnumMember {
        EnumMember {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_unresolved_members_are_excluded() {
        let def = EnumDefinition::new(
            "ze_init_flag_t",
            vec![
                member("A", EnumValue::Resolved(1)),
                member("B", EnumValue::Unresolved("ZE_BIT(1)".to_string())),
                member("C", EnumValue::Resolved(4)),
            ],
        );

        assert_eq!(def.value_of("A"), Some(1));
        assert_eq!(def.value_of("B"), None);
        assert_eq!(def.value_of("missing"), None);
        assert_eq!(def.resolved().count(), 2);
    }

    #[test]
    fn test_by_value_keeps_first_alias() {
        let def = EnumDefinition::new(
            "e",
            vec![
                member("LATE", EnumValue::Resolved(7)),
                member("FIRST", EnumValue::Resolved(0)),
                member("ALIAS", EnumValue::Resolved(7)),
            ],
        );

        assert_eq!(def.by_value(), vec![("FIRST", 0), ("LATE", 7)]);
    }
}
