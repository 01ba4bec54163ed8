//! Import loader: compile a root document and every document its `import`
//! steps reach, in one compile pass.

use crate::builder::compile_step_document;
use crate::compile::compile_document;
use crate::compiler::{CompileOptions, Compiler};
use crate::error::{CompileError, Diagnostic, Error};
use crate::model::{ImportStep, RootModel, Step};
use crate::provenance::ProvenanceStore;
use crate::source::{FileSystemProvider, SourceProvider};
use crate::syntax::{parse_document, SyntaxNode};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// A compiled root document plus every document it imports.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    /// Absolute path of the root document.
    pub root_file: String,
    pub root: RootModel,
    /// Imported step lists keyed by absolute path.
    pub imports: BTreeMap<String, Vec<Step>>,
    pub diagnostics: Vec<Diagnostic>,
    pub provenance: ProvenanceStore,
}

impl Bundle {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Steps an import step pulls in, if the target was loaded.
    pub fn imported_steps(&self, import: &ImportStep) -> Option<&[Step]> {
        self.imports.get(&import.file.resolved).map(Vec::as_slice)
    }
}

/// Load the root document at `root` and all transitive imports.
///
/// Uses the default [`FileSystemProvider`] for file I/O.
pub fn load_bundle(root: &Path, options: &CompileOptions) -> Result<Bundle, Error> {
    load_bundle_with_provider(root, &FileSystemProvider, options)
}

/// Load the root document and all transitive imports using the given
/// [`SourceProvider`] for file I/O.
pub fn load_bundle_with_provider(
    root: &Path,
    provider: &dyn SourceProvider,
    options: &CompileOptions,
) -> Result<Bundle, Error> {
    let read = provider.read_file(root).map_err(|source| Error::Io {
        path: root.to_string_lossy().into_owned(),
        source,
    })?;
    let root_file = read.abs_path.to_string_lossy().into_owned();
    let text = read.content.ok_or_else(|| Error::Io {
        path: root_file.clone(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    })?;
    let node = parse(&text, &root_file)?;

    let mut cx = Compiler::new(provider, options);
    cx.push_file_state(root_file.as_str());
    let root = compile_document(&node, &mut cx)?;

    let mut imports = BTreeMap::new();
    for scenario in &root.scenarios {
        follow_imports(&scenario.steps, &mut cx, &mut imports)?;
    }
    cx.pop_file_state();

    let (diagnostics, provenance) = cx.finish();
    tracing::debug!(
        file = %root_file,
        imports = imports.len(),
        diagnostics = diagnostics.len(),
        "bundle loaded"
    );
    Ok(Bundle {
        root_file,
        root,
        imports,
        diagnostics,
        provenance,
    })
}

fn parse(text: &str, file: &str) -> Result<SyntaxNode, Error> {
    parse_document(text).map_err(|message| Error::Parse {
        file: file.to_owned(),
        message,
    })
}

/// Depth-first over the import steps in `steps`. The compiler's file stack
/// doubles as the cycle-detection stack.
fn follow_imports(
    steps: &[Step],
    cx: &mut Compiler<'_>,
    imports: &mut BTreeMap<String, Vec<Step>>,
) -> Result<(), Error> {
    for step in steps {
        let Step::Import(import) = step else {
            continue;
        };
        let target = import.file.resolved.clone();
        let importer = cx.current_file().to_owned();
        let span = cx
            .provenance()
            .lookup(import)
            .map(|p| p.span)
            .unwrap_or_default();

        if let Some(start) = cx.file_stack().iter().position(|f| *f == target) {
            let mut cycle = cx.file_stack()[start..].to_vec();
            cycle.push(target);
            cx.report(&importer, CompileError::ImportCycle { span, cycle })?;
            continue;
        }
        if imports.contains_key(&target) {
            continue;
        }

        let read = cx
            .provider()
            .read_file(Path::new(&target))
            .map_err(|source| Error::Io {
                path: target.clone(),
                source,
            })?;
        let Some(text) = read.content else {
            cx.report(
                &importer,
                CompileError::UnresolvedReference {
                    span,
                    reference: import.file.path.clone(),
                },
            )?;
            continue;
        };
        let node = parse(&text, &target)?;

        tracing::debug!(from = %importer, file = %target, "loading import");
        cx.push_file_state(target.as_str());
        let result = cx.recover(None, |cx| compile_step_document(&node, cx).map(Some));
        let imported = cx.settle(result)?.unwrap_or_default();
        follow_imports(&imported, cx, imports)?;
        cx.pop_file_state();

        imports.insert(target, imported);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProvider;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn provider(files: &[(&str, &str)]) -> InMemoryProvider {
        InMemoryProvider::new(
            files
                .iter()
                .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let p = provider(&[]);
        let err = load_bundle_with_provider(
            Path::new("/s/main.yml"),
            &p,
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn diamond_imports_are_loaded_once() {
        let p = provider(&[
            ("/s/main.yml", "- import: a.yml\n- import: b.yml\n"),
            ("/s/a.yml", "- import: shared.yml\n"),
            ("/s/b.yml", "- import: shared.yml\n"),
            ("/s/shared.yml", "- pause\n"),
        ]);
        let bundle = load_bundle_with_provider(
            Path::new("/s/main.yml"),
            &p,
            &CompileOptions::default(),
        )
        .unwrap();
        assert!(bundle.is_clean());
        assert_eq!(
            bundle.imports.keys().collect::<Vec<_>>(),
            vec!["/s/a.yml", "/s/b.yml", "/s/shared.yml"]
        );
    }
}
