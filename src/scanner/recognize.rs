//! Named line recognizers.
//!
//! Each recognizer matches one logical line of the header dialect. A mismatch
//! carries a short description of what was expected so the caller can attach
//! the file and line before reporting it.

use std::sync::LazyLock;

use regex::Regex;

use super::dialect::Dialect;

/// A line that did not have the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch(pub &'static str);

static STRUCT_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+(\w+)\s*;$").unwrap());

static ENUM_TYPEDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^typedef\s+enum\s+_?(\w+)\s*(\{)?\s*$").unwrap());

static ENUM_FORWARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^typedef\s+enum\s+\w+\s+\w+\s*;$").unwrap());

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());

/// A `type field;` line of a dispatch-table struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub ty: String,
    pub field: String,
}

/// One member line of an enum body, before value resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberLine {
    pub name: String,
    /// Right-hand side of `=`, when present
    pub value: Option<String>,
}

/// Callback typedef line: `typedef void (ZE_APICALL *ze_pfnInitCb_t)(...)`.
///
/// `Ok(None)` means the line is not a callback declaration at all.
pub fn callback_typedef(line: &str, dialect: &Dialect) -> Result<Option<String>, Mismatch> {
    if !line.contains(dialect.api_call_marker.as_str())
        || !line.contains(dialect.callback_prefix.as_str())
    {
        return Ok(None);
    }
    if line.matches(dialect.callback_prefix.as_str()).count() != 1 {
        return Err(Mismatch("exactly one callback type per line"));
    }
    dialect
        .function_from_callback(line)
        .map(Some)
        .ok_or(Mismatch("callback type with prefix and suffix"))
}

pub fn struct_field(line: &str) -> Result<StructField, Mismatch> {
    let caps = STRUCT_FIELD
        .captures(line)
        .ok_or(Mismatch("`type field;`"))?;
    Ok(StructField {
        ty: caps[1].to_string(),
        field: caps[2].to_string(),
    })
}

/// Parameter struct field `type* pName;` as `(Name, type)`.
pub fn param_field(line: &str) -> Result<(String, String), Mismatch> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Mismatch("at least a type and a name"));
    }

    let raw_name = tokens[tokens.len() - 1].trim_end_matches(';');
    let name = raw_name
        .strip_prefix('p')
        .filter(|rest| !rest.is_empty())
        .ok_or(Mismatch("name starting with `p`"))?;

    let ty = tokens[..tokens.len() - 1].join(" ");
    let ty = ty
        .strip_suffix('*')
        .ok_or(Mismatch("pointer type ending in `*`"))?
        .trim_end();

    Ok((name.to_string(), ty.to_string()))
}

/// `typedef enum _name {` line, returning the enum name with its leading
/// underscore removed. Forward declarations give `Ok(None)`.
pub fn enum_typedef(line: &str) -> Result<Option<String>, Mismatch> {
    if !line.starts_with("typedef enum") {
        return Ok(None);
    }
    if ENUM_FORWARD.is_match(line) {
        return Ok(None);
    }
    let caps = ENUM_TYPEDEF
        .captures(line)
        .ok_or(Mismatch("`typedef enum _name {`"))?;
    Ok(Some(caps[1].to_string()))
}

pub fn enum_member(line: &str) -> Result<EnumMemberLine, Mismatch> {
    if top_level_commas(line) > 1 {
        return Err(Mismatch("one enum member per line"));
    }
    let line = line.trim_end_matches(',').trim();

    let (name, value) = match line.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            if value.is_empty() || value.contains('=') {
                return Err(Mismatch("`NAME = VALUE`"));
            }
            (name.trim(), Some(value.to_string()))
        }
        None => (line, None),
    };

    if !IDENTIFIER.is_match(name) {
        return Err(Mismatch("enum member identifier"));
    }

    Ok(EnumMemberLine {
        name: name.to_string(),
        value,
    })
}

/// Numeric literal: signed decimal or `0x` hexadecimal.
pub fn parse_literal(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn top_level_commas(line: &str) -> usize {
    let mut depth = 0usize;
    let mut count = 0;
    for c in line.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_typedef() {
        let dialect = Dialect::default();

        let line = "typedef void (ZE_APICALL *ze_pfnDriverGetCb_t)(";
        assert_eq!(
            callback_typedef(line, &dialect),
            Ok(Some("zeDriverGet".to_string()))
        );
        assert_eq!(callback_typedef("ze_result_t ZE_APICALL zeInit(", &dialect), Ok(None));
        assert!(callback_typedef("typedef void (ZE_APICALL *ze_pfnDriverGet)(", &dialect).is_err());
    }

    #[test]
    fn test_param_field() {
        assert_eq!(
            param_field("ze_driver_handle_t** phDrivers;"),
            Ok(("hDrivers".to_string(), "ze_driver_handle_t*".to_string()))
        );
        assert_eq!(
            param_field("const ze_device_mem_alloc_desc_t** pdevice_desc;"),
            Ok((
                "device_desc".to_string(),
                "const ze_device_mem_alloc_desc_t*".to_string()
            ))
        );
        assert_eq!(
            param_field("size_t * psize;"),
            Ok(("size".to_string(), "size_t".to_string()))
        );
        assert!(param_field("phDrivers;").is_err());
        assert!(param_field("uint32_t pCount;").is_err());
        assert!(param_field("uint32_t* count;").is_err());
    }

    #[test]
    fn test_struct_field() {
        assert_eq!(
            struct_field("ze_global_callbacks_t Global;"),
            Ok(StructField {
                ty: "ze_global_callbacks_t".to_string(),
                field: "Global".to_string(),
            })
        );
        assert!(struct_field("ze_pfnInitCb_t pfnInitCb").is_err());
        assert!(struct_field("const char* name;").is_err());
    }

    #[test]
    fn test_enum_typedef() {
        assert_eq!(
            enum_typedef("typedef enum _ze_result_t"),
            Ok(Some("ze_result_t".to_string()))
        );
        assert_eq!(
            enum_typedef("typedef enum _ze_init_flag_t {"),
            Ok(Some("ze_init_flag_t".to_string()))
        );
        assert_eq!(enum_typedef("typedef enum _ze_result_t ze_result_t;"), Ok(None));
        assert_eq!(enum_typedef("typedef struct _ze_foo_t"), Ok(None));
        assert!(enum_typedef("typedef enum { A, B } anon_t;").is_err());
    }

    #[test]
    fn test_enum_member() {
        assert_eq!(
            enum_member("ZE_RESULT_SUCCESS = 0,"),
            Ok(EnumMemberLine {
                name: "ZE_RESULT_SUCCESS".to_string(),
                value: Some("0".to_string()),
            })
        );
        assert_eq!(
            enum_member("ZE_INIT_FLAG_GPU_ONLY = ZE_BIT(0),"),
            Ok(EnumMemberLine {
                name: "ZE_INIT_FLAG_GPU_ONLY".to_string(),
                value: Some("ZE_BIT(0)".to_string()),
            })
        );
        assert_eq!(
            enum_member("ZE_NEXT"),
            Ok(EnumMemberLine {
                name: "ZE_NEXT".to_string(),
                value: None,
            })
        );
        assert_eq!(
            enum_member("ZE_MAKE = ZE_MAKE_VERSION(1, 3),").map(|m| m.value),
            Ok(Some("ZE_MAKE_VERSION(1, 3)".to_string()))
        );
        assert!(enum_member("A = 1, B = 2,").is_err());
        assert!(enum_member("= 3,").is_err());
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_literal("42"), Some(42));
        assert_eq!(parse_literal("-3"), Some(-3));
        assert_eq!(parse_literal("0x70000001"), Some(0x7000_0001));
        assert_eq!(parse_literal("0x7fffffff"), Some(0x7fff_ffff));
        assert_eq!(parse_literal("ZE_BIT(1)"), None);
        assert_eq!(parse_literal("-"), None);
        assert_eq!(parse_literal(""), None);
    }
}
