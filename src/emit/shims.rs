//! Enter/exit shims and the callback registration routine.

use crate::core::{EnumDefinition, Function, Guard};
use crate::tables::SymbolTables;

use super::converters::render_converter;
use super::hooks::HookRegistry;
use super::{EmitOptions, AUTOGENERATED};

const SHIM_PARAMS: [&str; 4] = ["params", "result", "global_user_data", "instance_user_data"];

/// Enter hooks run before the call and never see a result.
const ENTER_HOOK_ARGS: [&str; 3] = ["params", "global_user_data", "instance_user_data"];

/// The whole tracing source: converters, shims, then registration.
pub fn render_tracing(
    tables: &SymbolTables,
    hooks: &HookRegistry,
    converters: &[(&EnumDefinition, &str)],
    function_prefix: &str,
    options: &EmitOptions,
) -> String {
    let mut out = String::from(AUTOGENERATED);
    out.push('\n');
    for (def, function) in converters {
        out.push_str(&render_converter(def, function));
    }
    out.push_str(&render_shims(tables, hooks, function_prefix, options));
    out.push_str(&render_registration(tables, function_prefix, options));
    out
}

/// One enter and one exit shim per function, inside its slot's guard.
pub fn render_shims(
    tables: &SymbolTables,
    hooks: &HookRegistry,
    function_prefix: &str,
    options: &EmitOptions,
) -> String {
    let mut out = String::new();

    for function in &tables.functions {
        let guard = tables.group(&function.name).and_then(|g| g.guard());
        let short = function.short_name(function_prefix);

        out.push_str(&format!("// {}\n", function.prototype()));
        open_guard(&mut out, guard.as_ref());
        render_shim(
            &mut out,
            function,
            "OnEnter",
            &format!("{}{}", options.hook_enter_prefix, short),
            &ENTER_HOOK_ARGS,
            hooks,
        );
        render_shim(
            &mut out,
            function,
            "OnExit",
            &format!("{}{}", options.hook_exit_prefix, short),
            &SHIM_PARAMS,
            hooks,
        );
        close_guard(&mut out, guard.as_ref());
        out.push('\n');
    }

    out
}

fn render_shim(
    out: &mut String,
    function: &Function,
    suffix: &str,
    hook: &str,
    hook_args: &[&str],
    hooks: &HookRegistry,
) {
    out.push_str(&format!("static void {}{}(\n", function.name, suffix));
    out.push_str(&format!("    {}* params,\n", function.param_struct));
    out.push_str(&format!("    {} result,\n", function.return_type));
    out.push_str("    void* global_user_data,\n");
    out.push_str("    void** instance_user_data) {\n");
    let forwarded: &[&str] = if hooks.contains(hook) { hook_args } else { &[] };
    for param in SHIM_PARAMS.iter().filter(|p| !forwarded.contains(p)) {
        out.push_str(&format!("  (void){};\n", param));
    }
    if !forwarded.is_empty() {
        out.push_str(&format!("  {}({});\n", hook, forwarded.join(", ")));
    }
    out.push_str("}\n");
}

/// The routine installing every shim into the tracer.
///
/// Functions with a dispatch-table slot are assigned into the prologue and
/// epilogue tables. Functions without one are registered one by one.
pub fn render_registration(
    tables: &SymbolTables,
    function_prefix: &str,
    options: &EmitOptions,
) -> String {
    let mut out = String::new();
    let status_check = format!(
        "  {}(status == {});\n",
        options.assert_macro, options.success_value
    );

    out.push_str(&format!(
        "static void {}({} tracer) {{\n",
        options.registration_fn, options.tracer_handle
    ));
    out.push_str(&format!("  {} prologue = {{}};\n", options.core_callbacks_type));
    out.push_str(&format!("  {} epilogue = {{}};\n", options.core_callbacks_type));
    out.push('\n');

    for (function, path) in tables.mapped_functions() {
        let guard = path.guard();
        open_guard(&mut out, guard.as_ref());
        out.push_str(&format!(
            "  prologue.{} = {}OnEnter;\n",
            path.member_path(),
            function.name
        ));
        out.push_str(&format!(
            "  epilogue.{} = {}OnExit;\n",
            path.member_path(),
            function.name
        ));
        close_guard(&mut out, guard.as_ref());
    }

    out.push('\n');
    let status_type = tables
        .functions
        .first()
        .map(|f| f.return_type.as_str())
        .unwrap_or("ze_result_t");
    out.push_str(&format!("  {} status = {};\n", status_type, options.success_value));
    out.push_str(&format!(
        "  status = {}(tracer, &prologue);\n",
        options.set_prologues_fn
    ));
    out.push_str(&status_check);
    out.push_str(&format!(
        "  status = {}(tracer, &epilogue);\n",
        options.set_epilogues_fn
    ));
    out.push_str(&status_check);

    for name in &tables.uncovered {
        let Some(function) = tables.function(name) else {
            continue;
        };
        let register = format!(
            "{}{}{}",
            options.register_callback_prefix,
            function.short_name(function_prefix),
            options.register_callback_suffix
        );
        out.push('\n');
        for (flag, suffix) in [
            (&options.prologue_flag, "OnEnter"),
            (&options.epilogue_flag, "OnExit"),
        ] {
            out.push_str(&format!(
                "  status = {}(tracer, {}, {}{});\n",
                register, flag, function.name, suffix
            ));
            out.push_str(&status_check);
        }
    }

    out.push_str("}\n");
    out
}

fn open_guard(out: &mut String, guard: Option<&Guard>) {
    if let Some(guard) = guard {
        out.push_str(&format!("#if {}\n", guard));
    }
}

fn close_guard(out: &mut String, guard: Option<&Guard>) {
    if let Some(guard) = guard {
        out.push_str(&format!("#endif // {}\n", guard));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Dialect;
    use crate::tables::SymbolTablesBuilder;
    use crate::test_support::fixtures;

    fn tables(partial: bool) -> SymbolTables {
        let dialect = Dialect::default();
        let mut headers = vec![fixtures::ze_api()];
        if partial {
            headers.push(fixtures::zel_tracing());
        }
        SymbolTablesBuilder::new(&dialect)
            .tolerate_partial_coverage(partial)
            .build(&headers, &[])
            .unwrap()
    }

    #[test]
    fn test_shim_forwards_to_existing_hook() {
        let hooks = HookRegistry::from_source(fixtures::ZE_COLLECTOR_H, &["OnEnter", "OnExit"]);
        let text = render_shims(&tables(false), &hooks, "ze", &EmitOptions::default());

        assert!(text.contains(
            "static void zeCommandListAppendMemoryCopyOnEnter(\n    ze_command_list_append_memory_copy_params_t* params,\n"
        ));
        assert!(text.contains(
            "    void** instance_user_data) {\n  (void)result;\n  OnEnterCommandListAppendMemoryCopy(params, global_user_data, instance_user_data);\n}\n"
        ));
        assert!(text.contains("  OnExitInit(params, result, global_user_data, instance_user_data);\n"));
        assert!(!text.contains("OnEnterInit("));
        assert!(text.contains("  (void)instance_user_data;\n"));
    }

    #[test]
    fn test_enter_hook_does_not_receive_result() {
        let source = "static void OnEnterInit(ze_init_params_t* params, void* global_data, void** instance_data) {}\n";
        let hooks = HookRegistry::from_source(source, &["OnEnter", "OnExit"]);
        let text = render_shims(&tables(false), &hooks, "ze", &EmitOptions::default());

        assert!(text.contains("  OnEnterInit(params, global_user_data, instance_user_data);\n"));
        assert!(!text.contains("OnEnterInit(params, result"));
        assert!(!text.contains("OnExitInit("));
    }

    #[test]
    fn test_shims_keep_slot_guard() {
        let text = render_shims(&tables(false), &HookRegistry::empty(), "ze", &EmitOptions::default());

        let open = text.find("#if defined(ZE_ENABLE_MEMORY_FILL)\n").unwrap();
        let shim = text.find("static void zeCommandListAppendMemoryFillOnEnter(").unwrap();
        let close = text.find("#endif // defined(ZE_ENABLE_MEMORY_FILL)\n").unwrap();
        assert!(open < shim && shim < close);
    }

    #[test]
    fn test_registration_routine() {
        let text = render_registration(&tables(false), "ze", &EmitOptions::default());

        assert!(text.starts_with("static void SetTracingAPIs(zel_tracer_handle_t tracer) {\n"));
        assert!(text.contains("  prologue.Global.pfnInitCb = zeInitOnEnter;\n"));
        assert!(text.contains("  epilogue.Driver.pfnGetCb = zeDriverGetOnExit;\n"));
        assert!(text.contains(
            "#if defined(ZE_ENABLE_MEMORY_FILL)\n  prologue.CommandList.pfnAppendMemoryFillCb = zeCommandListAppendMemoryFillOnEnter;\n"
        ));
        assert!(text.contains("  status = zelTracerSetEpilogues(tracer, &epilogue);\n"));
        assert!(text.ends_with("  PTI_ASSERT(status == ZE_RESULT_SUCCESS);\n}\n"));
        assert!(!text.contains("RegisterCallback"));
    }

    #[test]
    fn test_uncovered_functions_register_individually() {
        let text = render_registration(&tables(true), "ze", &EmitOptions::default());

        assert!(text.contains(
            "  status = zelTracerCommandListImmediateAppendCommandListsExpRegisterCallback(tracer, ZEL_REGISTER_PROLOGUE, zeCommandListImmediateAppendCommandListsExpOnEnter);\n"
        ));
        assert!(text.contains("ZEL_REGISTER_EPILOGUE, zeCommandListImmediateAppendCommandListsExpOnExit);\n"));
    }
}
