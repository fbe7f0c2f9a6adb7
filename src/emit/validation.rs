//! Round-trip checks of the name lookup, for the test suite.

use crate::core::RecordOrigin;
use crate::ids::IdAssignment;

/// One lookup and one comparison per current record.
///
/// Residual records are omitted: the runtime only needs to resolve names of
/// functions the header still declares.
pub fn render_validation(assignment: &IdAssignment) -> String {
    let group = assignment.category.api_group();

    let mut out = String::new();
    for record in assignment
        .records
        .iter()
        .filter(|r| r.origin == RecordOrigin::Current)
    {
        out.push_str(&format!(
            "PTI_CHECK_SUCCESS(ptiViewGetApiIdName(pti_api_group_id::PTI_API_GROUP_{},{},&api_name));\n",
            group, record.numeric_id
        ));
        out.push_str(&format!(
            "EXPECT_EQ((std::strcmp(api_name, \"{}\") == 0), true);\n",
            record.function_name
        ));
    }
    out
}
