//! Implementation of `tracegen generate`.
//!
//! A run scans every configured category, assigns or reloads its ids, renders
//! every output in memory and only then publishes them. Any error before
//! publication leaves the previous outputs untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::{ApiEntry, Category, EnumDefinition, RecordOrigin};
use crate::emit::{
    render_id_header, render_name_table, render_state_maps_header, render_state_table,
    render_tracing, render_validation, Banner, EmitOptions, HookRegistry,
};
use crate::ids::{assign_ids, ExistingIds, IdAssignment, IdError, IdEvent};
use crate::scanner::{function_ids, HeaderSource};
use crate::tables::{SymbolTables, SymbolTablesBuilder};
use crate::util::config::{CategoryConfig, Config, FunctionSource};
use crate::util::diagnostic::suggestions;
use crate::util::fs::{header_files, read_to_string, remove_file_if_exists, StagedFiles};
use crate::util::hash::{sha256_str, Fingerprint};

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Default directory of the vendor headers
    pub include_dir: PathBuf,

    /// Directory of the generated sources and tables
    pub out_dir: PathBuf,

    /// Directory of the id headers (defaults to `out_dir`)
    pub id_dir: Option<PathBuf>,

    /// Hand-written hook source
    pub hooks: Option<PathBuf>,

    /// Assign ids and rewrite the id headers
    pub regenerate: bool,

    /// Write a JSON report of the run
    pub report: Option<PathBuf>,

    /// Tolerate functions without a dispatch-table slot
    pub allow_partial: bool,
}

/// File names of every output of a run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    out_dir: PathBuf,
    id_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(out_dir: &Path, id_dir: Option<&Path>) -> Self {
        OutputLayout {
            out_dir: out_dir.to_path_buf(),
            id_dir: id_dir.unwrap_or(out_dir).to_path_buf(),
        }
    }

    /// Shims, converters and the registration routine.
    pub fn tracing(&self) -> PathBuf {
        self.out_dir.join("tracing.gen")
    }

    /// Id-to-name tables.
    pub fn name_tables(&self) -> PathBuf {
        self.out_dir.join("tracing_cb_api.gen")
    }

    pub fn state_maps(&self) -> PathBuf {
        self.out_dir.join("pti_api_ids_state_maps.h")
    }

    pub fn validation(&self) -> PathBuf {
        self.out_dir.join("tracing_base_apiid_validation_file.gen")
    }

    /// `pti_<domain>_<subdomain>_api_ids.h`
    pub fn id_header(&self, category: &Category, options: &EmitOptions) -> PathBuf {
        self.id_dir
            .join(format!("{}_{}_api_ids.h", options.id_prefix, category.key()))
    }
}

/// What a run did, written with `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub regenerated: bool,
    pub categories: Vec<CategoryReport>,
    pub files: Vec<WrittenFile>,
    /// Validation file deleted by a non-regenerating run
    pub removed: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub id_file: PathBuf,
    pub functions: usize,
    pub current: usize,
    pub residual: usize,
    /// Functions registered one by one
    pub uncovered: Vec<String>,
    pub events: Vec<IdEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub sha256: String,
}

/// One scanned category, ready for rendering.
struct ScannedCategory {
    category: Category,
    entries: Vec<ApiEntry>,
    tables: Option<SymbolTables>,
    banner: Banner,
}

/// Run the generator.
pub fn generate(config: &Config, opts: &GenerateOptions) -> Result<GenerateReport> {
    if config.category.is_empty() {
        bail!("no category configured\n{}", suggestions::NO_CATEGORY);
    }
    let traced = config.category.iter().filter(|c| c.is_traced()).count();
    if traced > 1 {
        bail!(
            "{} categories use callback tracing, at most one can own the registration routine",
            traced
        );
    }

    let layout = OutputLayout::new(&opts.out_dir, opts.id_dir.as_deref());
    let output = &config.output;
    let hooks = load_hooks(opts.hooks.as_deref(), output)?;

    let mut scanned = Vec::with_capacity(config.category.len());
    for category_config in &config.category {
        scanned.push(scan_category(config, category_config, opts)?);
    }

    let mut staged = StagedFiles::new();
    let mut rendered: Vec<(PathBuf, String)> = Vec::new();
    let mut categories = Vec::with_capacity(scanned.len());
    let mut name_tables = String::from(crate::emit::AUTOGENERATED);
    name_tables.push('\n');
    let mut state_tables = Vec::new();
    let mut validation = String::new();

    for scan in &scanned {
        let id_file = layout.id_header(&scan.category, output);
        let assignment = if opts.regenerate {
            let existing = ExistingIds::load(&id_file)?.unwrap_or_default();
            let assignment = assign_ids(&scan.category, &scan.entries, &existing)?;
            rendered.push((
                id_file.clone(),
                render_id_header(&assignment, &scan.banner, output),
            ));
            validation.push_str(&render_validation(&assignment));
            assignment
        } else {
            let existing = ExistingIds::load(&id_file)?.ok_or_else(|| IdError::MissingIdFile {
                path: id_file.clone(),
            })?;
            IdAssignment::from_existing(scan.category.clone(), &existing)
        };

        tracing::info!(
            "{}: {} functions, {} ids",
            scan.category,
            scan.entries.len(),
            assignment.records.len()
        );

        name_tables.push_str(&render_name_table(&assignment, output));
        state_tables.push(render_state_table(&assignment, output));
        categories.push(category_report(scan, id_file, assignment));
    }

    if let Some(tables) = scanned.iter().find_map(|s| s.tables.as_ref()) {
        let converters = converters(config, tables)?;
        rendered.push((
            layout.tracing(),
            render_tracing(
                tables,
                &hooks,
                &converters,
                &config.dialect.function_prefix,
                output,
            ),
        ));
    }
    rendered.push((layout.name_tables(), name_tables));
    rendered.push((layout.state_maps(), render_state_maps_header(&state_tables)));
    if opts.regenerate {
        rendered.push((layout.validation(), validation));
    }

    let files: Vec<WrittenFile> = rendered
        .iter()
        .map(|(path, text)| WrittenFile {
            path: path.clone(),
            sha256: sha256_str(text),
        })
        .collect();
    for (path, text) in &rendered {
        staged.stage(path, text)?;
    }

    let stale = layout.validation();
    let removed = (!opts.regenerate && stale.exists()).then_some(stale);
    let report = GenerateReport {
        regenerated: opts.regenerate,
        categories,
        files,
        removed,
    };
    if let Some(path) = &opts.report {
        staged.stage(path, &serde_json::to_string_pretty(&report)?)?;
    }

    let written = staged.commit()?;
    for path in &written {
        tracing::debug!("wrote {}", path.display());
    }

    if let Some(stale) = &report.removed {
        remove_file_if_exists(stale)?;
        tracing::info!("removed stale {}", stale.display());
    }

    tracing::info!("generated {} files in {}", written.len(), opts.out_dir.display());
    Ok(report)
}

fn load_hooks(path: Option<&Path>, output: &EmitOptions) -> Result<HookRegistry> {
    let Some(path) = path else {
        return Ok(HookRegistry::empty());
    };
    let text = read_to_string(path)?;
    let hooks = HookRegistry::from_source(
        &text,
        &[
            output.hook_enter_prefix.as_str(),
            output.hook_exit_prefix.as_str(),
        ],
    );
    tracing::debug!("{} hooks in {}", hooks.len(), path.display());
    Ok(hooks)
}

fn scan_category(
    config: &Config,
    category_config: &CategoryConfig,
    opts: &GenerateOptions,
) -> Result<ScannedCategory> {
    let category = category_config.category();
    let include = category_config.include_dir(&opts.include_dir);
    if category_config.headers.is_empty() {
        bail!("category {} lists no headers", category);
    }

    let headers = category_config
        .headers
        .iter()
        .map(|h| HeaderSource::open(&include.join(h)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut fingerprint = Fingerprint::new();
    for header in &headers {
        fingerprint.update_lines(header.lines().iter().map(String::as_str));
    }
    let banner = Banner {
        api_file: category_config.headers[0].clone(),
        api_version: headers[0].version_line(&config.dialect.version_marker),
        digest: Some(fingerprint.finish()),
    };

    let (mut entries, tables) = match &category_config.source {
        FunctionSource::Callbacks => {
            let enum_headers = header_files(include)?
                .iter()
                .map(|p| HeaderSource::open(p))
                .collect::<Result<Vec<_>, _>>()?;
            let tables = SymbolTablesBuilder::new(&config.dialect)
                .tolerate_partial_coverage(
                    config.scan.tolerate_partial_coverage || opts.allow_partial,
                )
                .build(&headers, &enum_headers)?;
            let entries = tables.function_names().map(ApiEntry::new).collect();
            (entries, Some(tables))
        }
        FunctionSource::IdEnum(spec) => (function_ids(&headers[0], spec)?, None),
    };

    let declared: HashSet<String> = entries.iter().map(|e| e.name.clone()).collect();
    for extra in &category_config.extra_functions {
        if !declared.contains(extra) {
            tracing::debug!("{}: adding extra function {}", category, extra);
            entries.push(ApiEntry::new(extra.as_str()));
        }
    }

    Ok(ScannedCategory {
        category,
        entries,
        tables,
        banner,
    })
}

fn converters<'a>(
    config: &'a Config,
    tables: &'a SymbolTables,
) -> Result<Vec<(&'a EnumDefinition, &'a str)>> {
    let mut out = Vec::with_capacity(config.converter.len());
    for converter in &config.converter {
        let Some(def) = tables.enum_def(&converter.enum_name) else {
            bail!(
                "enum `{}` for converter `{}` was not found in the scanned headers\n{}",
                converter.enum_name,
                converter.function,
                suggestions::MISSING_CONVERTER_ENUM
            );
        };
        out.push((def, converter.function.as_str()));
    }
    Ok(out)
}

fn category_report(
    scan: &ScannedCategory,
    id_file: PathBuf,
    assignment: IdAssignment,
) -> CategoryReport {
    let current = assignment
        .records
        .iter()
        .filter(|r| r.origin == RecordOrigin::Current)
        .count();
    CategoryReport {
        category: scan.category.clone(),
        id_file,
        functions: scan.entries.len(),
        current,
        residual: assignment.records.len() - current,
        uncovered: scan
            .tables
            .as_ref()
            .map(|t| t.uncovered.clone())
            .unwrap_or_default(),
        events: assignment.events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;
    use std::fs;
    use tempfile::TempDir;

    fn options(tmp: &TempDir, regenerate: bool) -> GenerateOptions {
        GenerateOptions {
            include_dir: fixtures::level_zero_dir(),
            out_dir: tmp.path().join("out"),
            id_dir: None,
            hooks: Some(fixtures::hooks_file()),
            regenerate,
            report: None,
            allow_partial: true,
        }
    }

    #[test]
    fn test_output_layout() {
        let layout = OutputLayout::new(Path::new("out"), Some(Path::new("ids")));
        let options = EmitOptions::default();

        assert_eq!(layout.tracing(), Path::new("out/tracing.gen"));
        assert_eq!(
            layout.id_header(&Category::new("driver", "levelzero"), &options),
            Path::new("ids/pti_driver_levelzero_api_ids.h")
        );
    }

    #[test]
    fn test_generate_then_reload() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();

        let report = generate(&config, &options(&tmp, true)).unwrap();
        let layout = OutputLayout::new(&tmp.path().join("out"), None);
        let id_file = layout.id_header(&Category::new("driver", "levelzero"), &config.output);

        let ids = fs::read_to_string(&id_file).unwrap();
        assert!(ids.contains("    zeInit_id=1,\n"));
        assert!(ids.contains("    zeCommandListImmediateAppendCommandListsExp_id=6,\n"));
        assert!(ids.contains("    zelTracerCreate_id=16,\n"));
        assert_eq!(
            report.categories[0].uncovered,
            vec!["zeCommandListImmediateAppendCommandListsExp".to_string()]
        );
        assert!(layout.validation().exists());

        let tracing = fs::read_to_string(layout.tracing()).unwrap();
        assert!(tracing.contains("static const char* GetResultString(unsigned value) {"));
        assert!(tracing.contains("  OnExitInit(params, result, global_user_data, instance_user_data);"));
        assert!(tracing.contains("  OnEnterCommandListAppendMemoryCopy(params, global_user_data, instance_user_data);"));

        let report_file = tmp.path().join("report.json");
        let mut reload_options = options(&tmp, false);
        reload_options.report = Some(report_file.clone());
        let reload = generate(&config, &reload_options).unwrap();
        assert_eq!(reload.removed, Some(layout.validation()));
        assert!(!layout.validation().exists());
        assert_eq!(fs::read_to_string(&id_file).unwrap(), ids);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_file).unwrap()).unwrap();
        assert_eq!(
            written["removed"],
            serde_json::json!(layout.validation().display().to_string())
        );
    }

    #[test]
    fn test_missing_id_file_without_regeneration() {
        let tmp = TempDir::new().unwrap();
        let err = generate(&Config::default(), &options(&tmp, false)).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<IdError>(),
            Some(IdError::MissingIdFile { .. })
        ));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_missing_converter_enum() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config
            .converter
            .push(crate::util::config::ConverterConfig::new("ze_missing_t", "GetMissingString"));

        let err = generate(&config, &options(&tmp, true)).unwrap_err();
        assert!(err.to_string().contains("enum `ze_missing_t`"));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_configured_categories_get_only_their_own_functions() {
        let tmp = TempDir::new().unwrap();
        let ur_dir = fixtures::ur_api_file().parent().unwrap().to_path_buf();
        let config: Config = toml::from_str(&format!(
            r#"
[[category]]
domain = "driver"
subdomain = "levelzero"
headers = ["ze_api.h", "layers/zel_tracing_register_cb.h"]

[[category]]
domain = "runtime"
subdomain = "sycl"
headers = ["ur_api.h"]
include_dir = '{}'
source = {{ kind = "id_enum" }}
"#,
            ur_dir.display()
        ))
        .unwrap();

        let report = generate(&config, &options(&tmp, true)).unwrap();
        assert_eq!(report.categories[0].functions, 6);
        assert_eq!(report.categories[1].functions, 3);

        let layout = OutputLayout::new(&tmp.path().join("out"), None);
        let sycl = fs::read_to_string(
            layout.id_header(&Category::new("runtime", "sycl"), &config.output),
        )
        .unwrap();
        assert!(sycl.contains("    urContextCreate_id=1,\n    urContextRetain_id=2,\n    urAdapterGet_id=5,\n"));
        assert!(!sycl.contains("zelTracerCreate"));
        assert!(!sycl.contains("zeEventPoolGetFlags"));
    }
}
