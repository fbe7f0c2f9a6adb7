//! Enum-to-string converters.

use crate::core::EnumDefinition;

/// `static const char* <function>(unsigned value)` switching over the
/// resolved members of `def`, ascending by value. Aliases keep the first
/// declared name.
pub fn render_converter(def: &EnumDefinition, function: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("static const char* {}(unsigned value) {{\n", function));
    out.push_str("  switch (value) {\n");
    for (name, _) in def.by_value() {
        out.push_str(&format!("    case {}:\n", name));
        out.push_str(&format!("      return \"{}\";\n", name));
    }
    out.push_str("    default:\n");
    out.push_str("      break;\n");
    out.push_str("  }\n");
    out.push_str("  return \"UNKNOWN\";\n");
    out.push_str("}\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnumMember, EnumValue};

    #[test]
    fn test_converter_orders_by_value() {
        let def = EnumDefinition::new(
            "ze_result_t",
            vec![
                EnumMember {
                    name: "ZE_RESULT_ERROR_DEVICE_LOST".to_string(),
                    value: EnumValue::Resolved(0x7000_0001),
                },
                EnumMember {
                    name: "ZE_RESULT_SUCCESS".to_string(),
                    value: EnumValue::Resolved(0),
                },
                EnumMember {
                    name: "ZE_RESULT_FLAG".to_string(),
                    value: EnumValue::Unresolved("ZE_BIT(3)".to_string()),
                },
            ],
        );

        let text = render_converter(&def, "GetResultString");
        let success = text.find("case ZE_RESULT_SUCCESS:").unwrap();
        let lost = text.find("case ZE_RESULT_ERROR_DEVICE_LOST:").unwrap();

        assert!(text.starts_with("static const char* GetResultString(unsigned value) {\n"));
        assert!(success < lost);
        assert!(!text.contains("ZE_RESULT_FLAG"));
        assert!(text.contains("  return \"UNKNOWN\";\n"));
    }
}
