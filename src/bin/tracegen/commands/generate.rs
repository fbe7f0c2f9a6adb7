//! `tracegen generate` command

use std::path::Path;

use anyhow::Result;

use crate::cli::GenerateArgs;
use tracegen::ops::generate::{generate, GenerateOptions};
use tracegen::util::diagnostic::{emit, Diagnostic};

pub fn execute(args: GenerateArgs, config: Option<&Path>, color: bool) -> Result<()> {
    let config = super::load_config(config)?;

    let options = GenerateOptions {
        include_dir: args.include_dir,
        out_dir: args.out_dir,
        id_dir: args.id_dir,
        hooks: args.hooks,
        regenerate: args.regenerate,
        report: args.report,
        allow_partial: args.allow_partial,
    };

    let report = generate(&config, &options)?;

    for category in &report.categories {
        println!(
            "{}: {} functions, {} current ids, {} residual ids",
            category.category, category.functions, category.current, category.residual
        );
        for name in &category.uncovered {
            println!("  registered per function: {}", name);
            let warning = Diagnostic::warning(format!(
                "function `{}` has no callback group, its shims are registered one by one",
                name
            ))
            .with_context(format!("category: {}", category.category));
            emit(&warning, color);
        }
    }
    for file in &report.files {
        println!("  wrote {}", file.path.display());
    }
    if let Some(removed) = &report.removed {
        println!("  removed {}", removed.display());
    }

    Ok(())
}
