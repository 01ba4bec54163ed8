use std::path::Path;
use std::process;

use arlecchino_core::{load_bundle, CompileOptions, Diagnostic, Error};

use super::report_fatal;
use crate::OutputFormat;

pub(crate) fn cmd_check(file: &Path, options: &CompileOptions, output: OutputFormat, quiet: bool) {
    // Under fail-fast the first mistake arrives as an error; report it like
    // any other diagnostic.
    let (diagnostics, summary) = match load_bundle(file, options) {
        Ok(bundle) => {
            let summary = format!(
                "{} scenario(s), {} imported file(s)",
                bundle.root.scenarios.len(),
                bundle.imports.len()
            );
            (bundle.diagnostics, Some(summary))
        }
        Err(Error::Compile(diagnostic)) => (vec![diagnostic], None),
        Err(e) => {
            report_fatal(&e, output, quiet);
            process::exit(1);
        }
    };

    let clean = diagnostics.is_empty();
    match output {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "file": file.display().to_string(),
                "ok": clean,
                "diagnostics": diagnostics
                    .iter()
                    .map(Diagnostic::to_json_value)
                    .collect::<Vec<_>>(),
            });
            let pretty = serde_json::to_string_pretty(&result)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for d in &diagnostics {
                println!("{}", d);
            }
            if !quiet {
                if clean {
                    println!(
                        "{}: ok ({})",
                        file.display(),
                        summary.unwrap_or_default()
                    );
                } else {
                    println!("{}: {} problem(s) found", file.display(), diagnostics.len());
                }
            }
        }
    }

    if !clean {
        process::exit(1);
    }
}
