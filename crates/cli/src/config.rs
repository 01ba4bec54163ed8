//! Optional CLI configuration file.
//!
//! # Example
//!
//! ```toml
//! [compile]
//! mode = "accumulate"
//! ```

use std::path::Path;

use arlecchino_core::{CompileOptions, Policy};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CliConfig {
    #[serde(default)]
    pub compile: CompileSection,
}

/// `[compile]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CompileSection {
    pub mode: Option<Policy>,
}

impl CliConfig {
    /// Options for a command whose built-in default is `default_policy`.
    /// A command-line flag beats the file, which beats the default.
    pub fn compile_options(&self, flag: Option<Policy>, default_policy: Policy) -> CompileOptions {
        CompileOptions {
            policy: flag.or(self.compile.mode).unwrap_or(default_policy),
        }
    }
}

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub(crate) fn read_config(path: &Path) -> Result<CliConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_file_beats_default() {
        let config: CliConfig = toml::from_str("[compile]\nmode = \"accumulate\"\n").unwrap();
        assert_eq!(
            config.compile_options(None, Policy::FailFast).policy,
            Policy::Accumulate
        );
        assert_eq!(
            config
                .compile_options(Some(Policy::FailFast), Policy::Accumulate)
                .policy,
            Policy::FailFast
        );
        assert_eq!(
            CliConfig::default()
                .compile_options(None, Policy::Accumulate)
                .policy,
            Policy::Accumulate
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(toml::from_str::<CliConfig>("[compile]\nmode = \"lenient\"\n").is_err());
        assert!(toml::from_str::<CliConfig>("[output]\nformat = \"json\"\n").is_err());
    }
}
