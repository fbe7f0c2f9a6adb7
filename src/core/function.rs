//! Interceptable functions and where their callbacks live.

use serde::Serialize;

use super::guard::Guard;

/// One argument of an interceptable function, taken from its parameter struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Argument name with the pointer-field `p` prefix removed
    pub name: String,
    /// Argument type (the field type minus one level of pointer)
    #[serde(rename = "type")]
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A named, interceptable API entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    /// Business name, e.g. `zeCommandListAppendMemoryCopy`
    pub name: String,
    /// Ordered arguments
    pub params: Vec<Param>,
    /// C type of the parameter struct passed to callbacks
    pub param_struct: String,
    /// Result type passed to callbacks
    pub return_type: String,
}

impl Function {
    /// Name without the API prefix (`zeInit` -> `Init`), used to name hooks.
    pub fn short_name<'a>(&'a self, prefix: &str) -> &'a str {
        match self.name.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => rest,
            _ => &self.name,
        }
    }

    /// Human readable prototype, e.g. `zeInit(ze_init_flags_t flags)`.
    pub fn prototype(&self) -> String {
        let args: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// Location of a function's callback slot inside the nested dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackGroupPath {
    /// Field of the top-level dispatch struct, e.g. `CommandList`
    pub group_field: String,
    pub group_guard: Option<Guard>,
    /// Field of the group struct, e.g. `pfnAppendMemoryCopyCb`
    pub leaf_field: String,
    pub leaf_guard: Option<Guard>,
}

impl CallbackGroupPath {
    /// The condition under which this slot exists.
    pub fn guard(&self) -> Option<Guard> {
        Guard::compose(self.group_guard.as_ref(), self.leaf_guard.as_ref())
    }

    /// Member access path, e.g. `CommandList.pfnAppendMemoryCopyCb`.
    pub fn member_path(&self) -> String {
        format!("{}.{}", self.group_field, self.leaf_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_and_prototype() {
        let func = Function {
            name: "zeDriverGet".to_string(),
            params: vec![
                Param::new("pCount", "uint32_t*"),
                Param::new("phDrivers", "ze_driver_handle_t*"),
            ],
            param_struct: "ze_driver_get_params_t".to_string(),
            return_type: "ze_result_t".to_string(),
        };

        assert_eq!(func.short_name("ze"), "DriverGet");
        assert_eq!(func.short_name("ur"), "zeDriverGet");
        assert_eq!(
            func.prototype(),
            "zeDriverGet(uint32_t* pCount, ze_driver_handle_t* phDrivers)"
        );
    }

    #[test]
    fn test_group_path_guard() {
        let path = CallbackGroupPath {
            group_field: "CommandList".to_string(),
            group_guard: None,
            leaf_field: "pfnAppendMemoryFillCb".to_string(),
            leaf_guard: Some(Guard::defined("ZE_ENABLE_MEMORY_FILL")),
        };

        assert_eq!(path.member_path(), "CommandList.pfnAppendMemoryFillCb");
        assert_eq!(
            path.guard().unwrap().condition(),
            "defined(ZE_ENABLE_MEMORY_FILL)"
        );
    }
}
