use crate::accessor;
use crate::compiler::Compiler;
use crate::error::{Build, CompileError};
use crate::model::{NodeId, TemplateSegment, TemplateString};
use crate::syntax::SyntaxNode;

pub fn compile_template(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<TemplateString> {
    let source = accessor::string(accessor::non_null(node)?)?;
    let segments = parse_segments(source).map_err(|reason| CompileError::InvalidTemplate {
        span: node.span,
        reason,
    })?;
    let template = TemplateString {
        id: NodeId::UNSET,
        source: source.to_owned(),
        segments,
    };
    Ok(cx.record(template, node))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Split `source` on `${name}` placeholders. `$$` is a literal `$`; a `$`
/// not followed by `{` or `$` is kept as is.
pub(crate) fn parse_segments(source: &str) -> Result<Vec<TemplateSegment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(tail) = after.strip_prefix('$') {
            literal.push('$');
            rest = tail;
        } else if let Some(body) = after.strip_prefix('{') {
            let offset = source.len() - rest.len() + pos;
            let end = body
                .find('}')
                .ok_or_else(|| format!("unterminated placeholder at offset {}", offset))?;
            let name = body[..end].trim();
            if name.is_empty() {
                return Err(format!("empty placeholder at offset {}", offset));
            }
            if !name.chars().all(is_name_char) {
                return Err(format!("invalid variable name '{}'", name));
            }
            if !literal.is_empty() {
                segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(TemplateSegment::Variable(name.to_owned()));
            rest = &body[end + 1..];
        } else {
            literal.push('$');
            rest = after;
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(TemplateSegment::Literal(literal));
    }
    Ok(segments)
}
