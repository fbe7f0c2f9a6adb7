//! Id-to-name and id-to-state lookup tables.

use crate::ids::IdAssignment;

use super::{EmitOptions, AUTOGENERATED};

/// `pti_api_id_<category>_func_name`: every record's id to its function
/// name. Version tags stay in the enumerator only.
pub fn render_name_table(assignment: &IdAssignment, options: &EmitOptions) -> String {
    let id_enum = options.id_enum(&assignment.category);

    let mut out = format!(
        "inline static std::map<uint32_t, const char*> {}_func_name =\n  {{\n",
        id_enum
    );
    for record in &assignment.records {
        out.push_str(&format!(
            "    {{{}::{}, \"{}\"}},\n",
            id_enum,
            record.enumerator(),
            record.function_name
        ));
    }
    out.push_str("  }; \n\n");
    out
}

/// `pti_api_id_<category>_state`: every record enabled, plus the mutex
/// guarding granularity changes of the subdomain.
pub fn render_state_table(assignment: &IdAssignment, options: &EmitOptions) -> String {
    let id_enum = options.id_enum(&assignment.category);

    let mut out = format!(
        "std::mutex {}_set_granularity_map_mtx;\n",
        assignment.category.subdomain
    );
    out.push_str(&format!(
        "inline static std::map<uint32_t, uint32_t> {}_state =\n  {{\n",
        id_enum
    ));
    for record in &assignment.records {
        out.push_str(&format!("    {{{}::{}, 1}},\n", id_enum, record.enumerator()));
    }
    out.push_str("  }; \n\n");
    out
}

/// Wrap the per-category state tables into `pti_api_ids_state_maps.h`.
pub fn render_state_maps_header(bodies: &[String]) -> String {
    let guard = "PTI_API_IDS_STATE_MAPS_H_";

    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n", guard));
    out.push_str(&format!("#define {}\n\n", guard));
    out.push_str(AUTOGENERATED);
    out.push('\n');
    out.push_str("#include <cstdint>\n");
    out.push_str("#include <map>\n");
    out.push_str("#include <mutex>\n\n");
    for body in bodies {
        out.push_str(body);
    }
    out.push_str(&format!("#endif  // {}\n", guard));
    out
}
