//! Naming conventions of a vendor header dialect.
//!
//! The defaults describe the Level Zero headers; every field can be
//! overridden from the `[dialect]` section of `tracegen.toml`.

use serde::{Deserialize, Serialize};

/// A case-folding rule applied before splitting a function name into words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acronym {
    pub from: String,
    pub to: String,
}

impl Acronym {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Acronym {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Calling-convention marker present on callback typedef lines
    pub api_call_marker: String,
    /// Prefix of callback typedef names, e.g. `ze_pfn`
    pub callback_prefix: String,
    /// Suffix of callback typedef names, e.g. `Cb_t`
    pub callback_suffix: String,
    /// Prefix re-attached to the decoded business name, e.g. `ze`
    pub function_prefix: String,
    /// Top-level dispatch-table struct, e.g. `ze_callbacks_t`
    pub dispatch_table: String,
    pub param_struct_suffix: String,
    /// Result type handed to callbacks
    pub result_type: String,
    pub acronyms: Vec<Acronym>,
    /// Text introducing the header version, e.g. `version v`
    pub version_marker: String,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            api_call_marker: "ZE_APICALL".to_string(),
            callback_prefix: "ze_pfn".to_string(),
            callback_suffix: "Cb_t".to_string(),
            function_prefix: "ze".to_string(),
            dispatch_table: "ze_callbacks_t".to_string(),
            param_struct_suffix: "params_t".to_string(),
            result_type: "ze_result_t".to_string(),
            acronyms: vec![Acronym::new("CL", "Cl"), Acronym::new("IPC", "Ipc")],
            version_marker: "version v".to_string(),
        }
    }
}

impl Dialect {
    /// Parameter struct type of a function.
    ///
    /// `zeCommandListCreate` becomes `ze_command_list_create_params_t`.
    /// Acronyms are folded first so `zeCommandListAppendIPC` splits into
    /// `..._append_ipc_...` rather than one word per capital.
    pub fn param_struct_name(&self, function: &str) -> String {
        let mut name = String::with_capacity(function.len());
        let mut chars = function.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        for acronym in &self.acronyms {
            name = name.replace(&acronym.from, &acronym.to);
        }

        let mut words: Vec<String> = Vec::new();
        for c in name.chars() {
            match words.last_mut() {
                Some(word) if !c.is_ascii_uppercase() => word.push(c),
                _ => words.push(c.to_string()),
            }
        }

        let mut result = String::new();
        for word in &words {
            result.push_str(&word.to_lowercase());
            result.push('_');
        }
        result.push_str(&self.param_struct_suffix);
        result
    }

    /// Decode a callback typedef token into the business function name.
    ///
    /// Returns `None` when the token does not carry both the callback prefix
    /// and suffix.
    pub fn function_from_callback(&self, token: &str) -> Option<String> {
        let (_, rest) = token.split_once(self.callback_prefix.as_str())?;
        let (body, _) = rest.split_once(self.callback_suffix.as_str())?;
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.function_prefix, body))
    }

    /// Callback typedef name of a function, the inverse of
    /// [`Dialect::function_from_callback`].
    pub fn callback_type(&self, function: &str) -> String {
        let body = function
            .strip_prefix(self.function_prefix.as_str())
            .unwrap_or(function);
        format!("{}{}{}", self.callback_prefix, body, self.callback_suffix)
    }
}
