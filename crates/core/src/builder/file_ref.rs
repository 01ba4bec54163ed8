use crate::accessor;
use crate::compiler::Compiler;
use crate::error::Build;
use crate::model::{FileReference, NodeId};
use crate::syntax::SyntaxNode;

/// A path relative to the file being compiled.
pub fn compile_file_reference(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<FileReference> {
    let path = accessor::string(accessor::non_null(node)?)?;
    let resolved = cx.resolve_reference(path)?;
    let reference = FileReference {
        id: NodeId::UNSET,
        path: path.to_owned(),
        resolved,
    };
    Ok(cx.record(reference, node))
}
