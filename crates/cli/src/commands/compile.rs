use std::path::Path;
use std::process;

use arlecchino_core::CompileOptions;

use super::{load_or_exit, report_diagnostics};
use crate::OutputFormat;

pub(crate) fn cmd_compile(
    file: &Path,
    options: &CompileOptions,
    provenance: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let bundle = load_or_exit(file, options, output, quiet);
    if !bundle.is_clean() {
        report_diagnostics(&bundle.diagnostics, output, quiet);
        process::exit(1);
    }

    let mut output_value = serde_json::json!({
        "file": bundle.root_file,
        "root": bundle.root,
        "imports": bundle.imports,
    });
    if provenance {
        output_value["provenance"] = bundle.provenance.to_json_value();
    }
    let pretty = serde_json::to_string_pretty(&output_value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}
