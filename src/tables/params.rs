//! Parameter struct decoding.

use crate::core::Param;
use crate::scanner::{recognize, HeaderSource, ScanError};

/// Read the fields of `struct_name` as the ordered parameters of `function`.
pub fn read_params(
    source: &HeaderSource,
    function: &str,
    struct_name: &str,
) -> Result<Vec<Param>, ScanError> {
    let range = source.struct_range(struct_name)?;
    let mut params: Vec<Param> = Vec::new();

    for line in source.guarded_lines(range)? {
        let parse_error = |reason: &'static str| ScanError::ParameterParse {
            file: source.name().to_string(),
            function: function.to_string(),
            line: line.number,
            text: line.text.clone(),
            reason,
        };

        let (name, ty) = recognize::param_field(&line.text).map_err(|m| parse_error(m.0))?;
        if params.iter().any(|p| p.name == name) {
            return Err(parse_error("duplicate parameter"));
        }
        params.push(Param::new(name, ty));
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_params() {
        let text = "\
typedef struct _ze_driver_get_params_t
{
    uint32_t** ppCount;
    ze_driver_handle_t** pphDrivers;   ///< [in,out]
} ze_driver_get_params_t;
";
        let src = HeaderSource::from_text("ze_api.h", text);
        let params = read_params(&src, "zeDriverGet", "ze_driver_get_params_t").unwrap();

        assert_eq!(
            params,
            vec![
                Param::new("pCount", "uint32_t*"),
                Param::new("phDrivers", "ze_driver_handle_t*"),
            ]
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        let text = "struct _x_params_t\n{\n    int* pa;\n    long* pa;\n};\n";
        let src = HeaderSource::from_text("h.h", text);
        let err = read_params(&src, "x", "_x_params_t").unwrap_err();

        assert!(matches!(
            err,
            ScanError::ParameterParse { line: 4, reason: "duplicate parameter", .. }
        ));
    }

    #[test]
    fn test_parameter_without_pointer() {
        let text = "struct _x_params_t\n{\n    int pa;\n};\n";
        let src = HeaderSource::from_text("h.h", text);
        let err = read_params(&src, "x", "_x_params_t").unwrap_err();

        assert!(matches!(err, ScanError::ParameterParse { line: 3, .. }));
    }
}
