pub(crate) mod check;
pub(crate) mod compile;
pub(crate) mod plan;

use std::path::Path;
use std::process;

use arlecchino_core::{load_bundle, Bundle, CompileOptions, Diagnostic, Error};

use crate::OutputFormat;

/// Load `file`, exiting with status 1 on a fatal error or, in fail-fast
/// mode, on the first compile error.
pub(crate) fn load_or_exit(
    file: &Path,
    options: &CompileOptions,
    output: OutputFormat,
    quiet: bool,
) -> Bundle {
    tracing::debug!(file = %file.display(), policy = ?options.policy, "loading scenario");
    match load_bundle(file, options) {
        Ok(bundle) => bundle,
        Err(e) => {
            report_fatal(&e, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_fatal(e: &Error, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
}

pub(crate) fn report_diagnostics(diagnostics: &[Diagnostic], output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> =
                diagnostics.iter().map(Diagnostic::to_json_value).collect();
            let err_json = serde_json::to_string_pretty(&values)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                for d in diagnostics {
                    eprintln!("{}", d);
                }
            }
        }
    }
}
