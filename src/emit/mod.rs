//! Code emission.
//!
//! Every renderer is a pure function from scanned tables or id assignments
//! to the text of one generated file. Nothing here touches the filesystem.

pub mod converters;
pub mod hooks;
pub mod ids;
pub mod shims;
pub mod tables;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use converters::render_converter;
pub use hooks::HookRegistry;
pub use ids::{render_id_header, Banner};
pub use shims::{render_registration, render_shims, render_tracing};
pub use tables::{render_name_table, render_state_maps_header, render_state_table};
pub use validation::render_validation;

/// Names used in generated code, from the `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Prefix of generated id enums and tables (`pti_api_id_...`)
    pub id_prefix: String,
    pub hook_enter_prefix: String,
    pub hook_exit_prefix: String,
    pub registration_fn: String,
    pub tracer_handle: String,
    pub core_callbacks_type: String,
    pub set_prologues_fn: String,
    pub set_epilogues_fn: String,
    pub success_value: String,
    pub assert_macro: String,
    /// Per-function registration is `<prefix><Short><suffix>`
    pub register_callback_prefix: String,
    pub register_callback_suffix: String,
    pub prologue_flag: String,
    pub epilogue_flag: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            id_prefix: "pti".to_string(),
            hook_enter_prefix: "OnEnter".to_string(),
            hook_exit_prefix: "OnExit".to_string(),
            registration_fn: "SetTracingAPIs".to_string(),
            tracer_handle: "zel_tracer_handle_t".to_string(),
            core_callbacks_type: "zet_core_callbacks_t".to_string(),
            set_prologues_fn: "zelTracerSetPrologues".to_string(),
            set_epilogues_fn: "zelTracerSetEpilogues".to_string(),
            success_value: "ZE_RESULT_SUCCESS".to_string(),
            assert_macro: "PTI_ASSERT".to_string(),
            register_callback_prefix: "zelTracer".to_string(),
            register_callback_suffix: "RegisterCallback".to_string(),
            prologue_flag: "ZEL_REGISTER_PROLOGUE".to_string(),
            epilogue_flag: "ZEL_REGISTER_EPILOGUE".to_string(),
        }
    }
}

impl EmitOptions {
    /// Name of the id enum of a category, e.g. `pti_api_id_driver_levelzero`.
    pub fn id_enum(&self, category: &crate::core::Category) -> String {
        format!("{}_api_id_{}", self.id_prefix, category.key())
    }
}

/// Marker written at the top of every generated file.
pub(crate) const AUTOGENERATED: &str =
    "// ========= This file is autogenerated - do not modify ========\n";
