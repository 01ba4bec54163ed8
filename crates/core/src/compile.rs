//! Single-document compile pass: syntax tree -> model tree.
//!
//! This is a thin orchestrator over the root builder. Import following is a
//! caller-level concern; see [`crate::load`].

use crate::builder::{compile_root, empty_root};
use crate::compiler::{CompileOptions, Compiler};
use crate::error::{Diagnostic, Error};
use crate::model::RootModel;
use crate::provenance::ProvenanceStore;
use crate::source::{FileSystemProvider, SourceProvider};
use crate::syntax::{parse_document, SyntaxNode};

/// Output of one compile pass.
///
/// Under fail-fast a compile error aborts the pass, so `diagnostics` is
/// empty. Under accumulate it holds every recovered mistake and `root` is the
/// partial tree still produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub root: RootModel,
    pub diagnostics: Vec<Diagnostic>,
    pub provenance: ProvenanceStore,
}

impl Compilation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Compile a parsed document, resolving file references on the filesystem.
pub fn compile(
    node: &SyntaxNode,
    filename: &str,
    options: &CompileOptions,
) -> Result<Compilation, Error> {
    compile_with_provider(node, filename, &FileSystemProvider, options)
}

pub fn compile_with_provider(
    node: &SyntaxNode,
    filename: &str,
    provider: &dyn SourceProvider,
    options: &CompileOptions,
) -> Result<Compilation, Error> {
    let mut cx = Compiler::new(provider, options);
    cx.push_file_state(filename);
    let root = compile_document(node, &mut cx)?;
    cx.pop_file_state();

    let (diagnostics, provenance) = cx.finish();
    Ok(Compilation {
        root,
        diagnostics,
        provenance,
    })
}

/// Parse YAML `text` and compile it.
pub fn compile_source(
    text: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<Compilation, Error> {
    let node = parse_document(text).map_err(|message| Error::Parse {
        file: filename.to_owned(),
        message,
    })?;
    compile(&node, filename, options)
}

/// Compile the root document on the compiler's current file.
pub(crate) fn compile_document(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Result<RootModel, Error> {
    tracing::debug!(file = cx.current_file(), "compiling document");
    let result = cx.recover(None, |cx| compile_root(node, cx).map(Some));
    let root = match cx.settle(result)? {
        Some(root) => root,
        None => empty_root(node, cx),
    };
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::model::{FindStepAction, Step};

    #[test]
    fn fail_fast_reports_first_error_with_file() {
        let err = compile_source(
            "- goto: /a\n- bogus: 1\n- sleep: x\n",
            "/s/main.yml",
            &CompileOptions::default(),
        )
        .unwrap_err();
        match err {
            Error::Compile(diagnostic) => {
                assert_eq!(diagnostic.file, "/s/main.yml");
                assert!(matches!(
                    diagnostic.error,
                    CompileError::NotAllowedKey { ref key, .. } if key == "bogus"
                ));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn accumulate_collects_every_step_error() {
        let compilation = compile_source(
            "- goto: /a\n- bogus: 1\n- sleep: x\n- pause\n",
            "/s/main.yml",
            &CompileOptions::accumulate(),
        )
        .unwrap();
        assert_eq!(compilation.diagnostics.len(), 2);
        let steps = &compilation.root.scenarios[0].steps;
        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[0], Step::Goto(_)));
        assert!(matches!(steps[1], Step::Pause(_)));
    }

    #[test]
    fn accumulate_falls_back_to_empty_root() {
        let compilation =
            compile_source("description: only\n", "/s/main.yml", &CompileOptions::accumulate())
                .unwrap();
        assert!(compilation.root.scenarios.is_empty());
        assert_eq!(compilation.diagnostics.len(), 1);
        assert!(matches!(
            compilation.diagnostics[0].error,
            CompileError::RequiredKeyNotExist { .. }
        ));
        assert!(compilation
            .provenance
            .lookup(&compilation.root.configuration)
            .is_some());
    }

    #[test]
    fn quoted_empty_and_null_strings_are_values() {
        let compilation = compile_source(
            "- find: { query: '#q', action: { input: \"\" } }\n\
             - echo: \"null\"\n\
             - reserve_next_dialog_answer: { text: '' }\n",
            "/s/main.yml",
            &CompileOptions::default(),
        )
        .unwrap();
        let steps = &compilation.root.scenarios[0].steps;
        match &steps[0] {
            Step::Find(find) => match &find.actions[..] {
                [FindStepAction::TextInput(input)] => assert_eq!(input.value.source, ""),
                other => panic!("unexpected actions: {:?}", other),
            },
            other => panic!("unexpected step: {:?}", other),
        }
        match &steps[1] {
            Step::Echo(echo) => assert_eq!(echo.messages[0].source, "null"),
            other => panic!("unexpected step: {:?}", other),
        }
        match &steps[2] {
            Step::ReserveNextDialogAnswer(answer) => {
                assert_eq!(answer.text.as_ref().map(|t| t.source.as_str()), Some(""));
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn quoted_numbers_and_booleans_are_not_coerced() {
        for text in ["- sleep: \"1500\"\n", "- screenshot: { full_page: 'true' }\n"] {
            let err = compile_source(text, "/s/main.yml", &CompileOptions::default()).unwrap_err();
            match err {
                Error::Compile(diagnostic) => assert!(
                    matches!(diagnostic.error, CompileError::NotAllowedValueType { .. }),
                    "{}: {}",
                    text,
                    diagnostic
                ),
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn parse_failure_is_fatal() {
        let err = compile_source(
            "key: [unclosed",
            "/s/main.yml",
            &CompileOptions::accumulate(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
