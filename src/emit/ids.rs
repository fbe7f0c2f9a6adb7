//! The per-category id header.

use crate::ids::IdAssignment;

use super::{EmitOptions, AUTOGENERATED};

/// Provenance lines written above the id enum.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    /// Header the ids were generated from
    pub api_file: String,
    /// The vendor's version comment, when the header carries one
    pub api_version: Option<String>,
    /// Digest of the scanned header text
    pub digest: Option<String>,
}

/// Render `pti_<category>_api_ids.h`.
///
/// Enumerators follow the records' ascending id order. The output is read
/// back by the next run, so every entry stays on its own `name_id=N,` line.
pub fn render_id_header(assignment: &IdAssignment, banner: &Banner, options: &EmitOptions) -> String {
    let category = &assignment.category;
    let id_enum = options.id_enum(category);
    let guard = format!("{}_H_", id_enum.to_uppercase());

    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n", guard));
    out.push_str(&format!("#define {}\n\n", guard));
    out.push_str(AUTOGENERATED);
    out.push_str(&format!("//    ApiFile: {}\n", banner.api_file));
    if let Some(version) = &banner.api_version {
        out.push_str(&format!("// ApiVersion: {}\n", version));
    }
    if let Some(digest) = &banner.digest {
        out.push_str(&format!("//     Digest: sha256:{}\n", digest));
    }
    out.push('\n');

    out.push_str(&format!("typedef enum _{} {{\n", id_enum));
    out.push_str(&format!("    reserved_{}_id=0,\n", category.key()));
    for record in &assignment.records {
        out.push_str(&format!("    {}={},\n", record.enumerator(), record.numeric_id));
    }
    out.push_str(&format!(" }} {};\n\n", id_enum));
    out.push_str("#endif\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiEntry, Category};
    use crate::ids::{assign_ids, ExistingIds};

    fn assignment() -> IdAssignment {
        let entries = vec![
            ApiEntry::new("zeInit"),
            ApiEntry::new("zeDriverGet"),
            ApiEntry::new("zeDriverGetProperties"),
        ];
        assign_ids(
            &Category::new("driver", "levelzero"),
            &entries,
            &ExistingIds::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_id_header_layout() {
        let banner = Banner {
            api_file: "ze_api.h".to_string(),
            api_version: Some("@version v1.3-r1.3.7".to_string()),
            digest: None,
        };
        let text = render_id_header(&assignment(), &banner, &EmitOptions::default());

        assert!(text.starts_with(
            "#ifndef PTI_API_ID_DRIVER_LEVELZERO_H_\n#define PTI_API_ID_DRIVER_LEVELZERO_H_\n"
        ));
        assert!(text.contains("//    ApiFile: ze_api.h\n// ApiVersion: @version v1.3-r1.3.7\n"));
        assert!(text.contains(
            "typedef enum _pti_api_id_driver_levelzero {\n    reserved_driver_levelzero_id=0,\n    zeInit_id=1,\n    zeDriverGet_id=2,\n    zeDriverGetProperties_id=3,\n } pti_api_id_driver_levelzero;\n"
        ));
        assert!(text.ends_with("#endif\n"));
    }

    #[test]
    fn test_id_header_reads_back() {
        let assignment = assignment();
        let banner = Banner {
            api_file: "include/ze_api.h".to_string(),
            api_version: None,
            digest: Some("ab12".to_string()),
        };
        let text = render_id_header(&assignment, &banner, &EmitOptions::default());

        let parsed = ExistingIds::parse("pti_driver_levelzero_api_ids.h", &text).unwrap();
        assert_eq!(parsed, assignment.to_existing().unwrap());
    }
}
