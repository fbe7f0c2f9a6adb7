//! Configuration file support for tracegen.
//!
//! The configuration file is looked up in this order:
//! - `--config <path>`
//! - `$TRACEGEN_CONFIG`
//! - `./tracegen.toml`, when present
//!
//! Without a file the built-in Level Zero defaults are used. Command-line
//! flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Category;
use crate::emit::EmitOptions;
use crate::scanner::{Dialect, IdEnumSpec};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "TRACEGEN_CONFIG";

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "tracegen.toml";

/// tracegen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Naming conventions of the traced headers
    pub dialect: Dialect,

    pub scan: ScanConfig,

    /// Names used in generated code
    pub output: EmitOptions,

    /// One entry per independent id space
    pub category: Vec<CategoryConfig>,

    /// Enums rendered as value-to-name functions in the tracing source
    pub converter: Vec<ConverterConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dialect: Dialect::default(),
            scan: ScanConfig::default(),
            output: EmitOptions::default(),
            category: vec![CategoryConfig::level_zero()],
            converter: vec![
                ConverterConfig::new("ze_result_t", "GetResultString"),
                ConverterConfig::new("ze_structure_type_t", "GetStructureTypeString"),
            ],
        }
    }
}

/// Header scanning settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Register functions without a dispatch-table slot one by one instead
    /// of failing
    pub tolerate_partial_coverage: bool,
}

/// Where the functions of a category come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FunctionSource {
    /// Callback typedefs of the scanned headers, in header order
    Callbacks,
    /// A vendor function-id enum carrying explicit ids
    IdEnum(IdEnumSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub domain: String,
    pub subdomain: String,
    #[serde(default = "FunctionSource::callbacks")]
    pub source: FunctionSource,
    /// Headers relative to the include directory, primary header first
    #[serde(default)]
    pub headers: Vec<String>,
    /// Overrides `--include-dir` for this category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dir: Option<PathBuf>,
    /// Names appended to the id space when no header declares them
    #[serde(default)]
    pub extra_functions: Vec<String>,
}

impl FunctionSource {
    fn callbacks() -> Self {
        FunctionSource::Callbacks
    }
}

impl CategoryConfig {
    /// The built-in Level Zero driver category.
    pub fn level_zero() -> Self {
        CategoryConfig {
            domain: "driver".to_string(),
            subdomain: "levelzero".to_string(),
            source: FunctionSource::Callbacks,
            headers: vec![
                "ze_api.h".to_string(),
                "layers/zel_tracing_register_cb.h".to_string(),
            ],
            include_dir: None,
            extra_functions: [
                "zeEventPoolGetFlags",
                "zeCommandListGetDeviceHandle",
                "zeCommandListGetContextHandle",
                "zeCommandListIsImmediate",
                "zeCommandListImmediateGetIndex",
                "zeCommandListGetOrdinal",
                "zeCommandQueueGetIndex",
                "zeCommandQueueGetOrdinal",
                "zelTracerSetEnabled",
                "zelTracerCreate",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    pub fn category(&self) -> Category {
        Category::new(&self.domain, &self.subdomain)
    }

    /// Include directory of this category, falling back to `default`.
    pub fn include_dir<'a>(&'a self, default: &'a Path) -> &'a Path {
        self.include_dir.as_deref().unwrap_or(default)
    }

    /// Whether the category's functions are traced through callbacks.
    pub fn is_traced(&self) -> bool {
        matches!(self.source, FunctionSource::Callbacks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub enum_name: String,
    pub function: String,
}

impl ConverterConfig {
    pub fn new(enum_name: impl Into<String>, function: impl Into<String>) -> Self {
        ConverterConfig {
            enum_name: enum_name.into(),
            function: function.into(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    ///
    /// A file that exists must parse.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Resolve and load the configuration of a run.
    ///
    /// An explicitly requested file must exist and parse; `./tracegen.toml`
    /// is optional but must parse when present.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        Self::load_or_default(&cwd.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.category.len(), 1);
        assert_eq!(config.category[0].category().key(), "driver_levelzero");
        assert!(config.category[0].is_traced());
        assert!(!config.scan.tolerate_partial_coverage);
        assert_eq!(config.converter[0].function, "GetResultString");
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("tracegen.toml");

        std::fs::write(
            &config_path,
            r#"
[scan]
tolerate_partial_coverage = true

[output]
id_prefix = "xpti"

[[category]]
domain = "runtime"
subdomain = "sycl"
headers = ["ur_api.h"]
source = { kind = "id_enum" }

[[converter]]
enum_name = "ur_result_t"
function = "GetUrResultString"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert!(config.scan.tolerate_partial_coverage);
        assert_eq!(config.output.id_prefix, "xpti");
        assert_eq!(config.output.registration_fn, "SetTracingAPIs");
        assert_eq!(config.dialect, Dialect::default());

        let category = &config.category[0];
        assert_eq!(category.category().key(), "runtime_sycl");
        assert_eq!(category.source, FunctionSource::IdEnum(IdEnumSpec::default()));
        assert!(category.extra_functions.is_empty());
        assert!(!category.is_traced());
        assert_eq!(config.converter, vec![ConverterConfig::new("ur_result_t", "GetUrResultString")]);
    }

    #[test]
    fn test_category_defaults_are_empty() {
        let config: Config = toml::from_str(
            r#"
[[category]]
domain = "runtime"
subdomain = "opencl"
"#,
        )
        .unwrap();

        let category = &config.category[0];
        assert!(category.is_traced());
        assert!(category.headers.is_empty());
        assert!(category.extra_functions.is_empty());
        assert_eq!(category.include_dir, None);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_rejects_malformed_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[[category]\ndomain = \"driver\"\n",
        )
        .unwrap();

        let err = Config::discover(None, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn test_category_include_dir_fallback() {
        let mut category = CategoryConfig::level_zero();
        let default = Path::new("include");
        assert_eq!(category.include_dir(default), Path::new("include"));

        category.include_dir = Some(PathBuf::from("other"));
        assert_eq!(category.include_dir(default), Path::new("other"));
    }
}
