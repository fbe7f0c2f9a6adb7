//! `tracegen validate` command

use anyhow::Result;

use crate::cli::ValidateArgs;
use tracegen::ids::FindingLevel;
use tracegen::ops::validate::{validate, ValidateOptions};
use tracegen::scanner::IdEnumSpec;

pub fn execute(args: ValidateArgs) -> Result<()> {
    let mut id_enum = IdEnumSpec::default();
    if let Some(name) = args.enum_name {
        id_enum.enum_name = name;
    }

    let options = ValidateOptions {
        id_file: args.id_file,
        vendor_header: args.vendor_header,
        id_enum,
        strict: args.strict,
    };

    let report = validate(&options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for finding in &report.findings {
            println!("{}", finding);
        }
        println!(
            "{}: {} vendor ids checked, {} warnings, {} errors",
            report.id_file.display(),
            report.checked,
            report.count(FindingLevel::Warning),
            report.count(FindingLevel::Error)
        );
    }

    report.check()?;
    Ok(())
}
