use super::file_ref::compile_file_reference;
use super::template::compile_template;
use crate::accessor;
use crate::compiler::Compiler;
use crate::error::{Build, CompileError};
use crate::mapping::{project, Field, FieldTable};
use crate::model::{Configuration, FileReference, TemplateString, Viewport};
use crate::syntax::SyntaxNode;
use std::collections::BTreeMap;

static CONFIGURATION: FieldTable<Configuration> = FieldTable {
    construct: "configuration",
    fields: &[
        Field {
            key: "base_uri",
            target: "base_uri",
            convert: |c, n, cx| {
                c.base_uri = Some(compile_template(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "user_agent",
            target: "user_agent",
            convert: |c, n, cx| {
                c.user_agent = Some(compile_template(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "viewport",
            target: "viewport",
            convert: |c, n, cx| {
                c.viewport = Some(compile_viewport(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "variables",
            target: "direct_variables",
            convert: |c, n, cx| {
                c.direct_variables = compile_variables(n, cx)?;
                Ok(())
            },
        },
        Field {
            key: "import_variables",
            target: "import_variables",
            convert: |c, n, cx| {
                c.import_variables = compile_import_variables(n, cx)?;
                Ok(())
            },
        },
    ],
    required: &[],
};

static VIEWPORT: FieldTable<Viewport> = FieldTable {
    construct: "viewport",
    fields: &[
        Field {
            key: "width",
            target: "width",
            convert: |v, n, _| {
                v.width = Some(pixels(n)?);
                Ok(())
            },
        },
        Field {
            key: "height",
            target: "height",
            convert: |v, n, _| {
                v.height = Some(pixels(n)?);
                Ok(())
            },
        },
    ],
    required: &[],
};

pub fn compile_configuration(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Configuration> {
    let configuration = project(node, &CONFIGURATION, Configuration::default(), cx)?;
    Ok(cx.record(configuration, node))
}

fn compile_viewport(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Viewport> {
    let viewport = project(node, &VIEWPORT, Viewport::default(), cx)?;
    Ok(cx.record(viewport, node))
}

fn pixels(node: &SyntaxNode) -> Result<u32, CompileError> {
    let n = accessor::integer(node)?;
    u32::try_from(n).map_err(|_| CompileError::NotAllowedValueType {
        span: node.span,
        expected: "pixel size",
    })
}

// Variable tables are open-ended, so they bypass the field-table engine.
fn compile_variables(
    node: &SyntaxNode,
    cx: &mut Compiler<'_>,
) -> Build<BTreeMap<String, TemplateString>> {
    let mut variables = BTreeMap::new();
    for entry in accessor::mapping(node)? {
        variables.insert(entry.key.clone(), compile_template(&entry.value, cx)?);
    }
    Ok(variables)
}

fn compile_import_variables(
    node: &SyntaxNode,
    cx: &mut Compiler<'_>,
) -> Build<BTreeMap<String, FileReference>> {
    let mut variables = BTreeMap::new();
    for entry in accessor::mapping(node)? {
        variables.insert(
            entry.key.clone(),
            compile_file_reference(&entry.value, cx)?,
        );
    }
    Ok(variables)
}
