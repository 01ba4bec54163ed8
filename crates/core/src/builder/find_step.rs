use super::template::compile_template;
use crate::accessor;
use crate::compiler::Compiler;
use crate::error::Build;
use crate::mapping::{project, Field, FieldTable};
use crate::model::{ClickAction, FindStep, FindStepAction, TextInputAction};
use crate::syntax::SyntaxNode;

/// Reserved literal for the parameterless click action.
pub const CLICK: &str = "click";

static FIND_STEP: FieldTable<FindStep> = FieldTable {
    construct: "find",
    fields: &[
        Field {
            key: "query",
            target: "query",
            convert: |s, n, cx| {
                s.query = compile_template(n, cx)?;
                Ok(())
            },
        },
        Field {
            key: "with_text",
            target: "with_text",
            convert: |s, n, cx| {
                s.with_text = Some(compile_template(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "action",
            target: "actions",
            convert: |s, n, cx| {
                s.actions = compile_actions(n, cx)?;
                Ok(())
            },
        },
        Field {
            key: "find",
            target: "child",
            convert: |s, n, cx| {
                s.child = Some(Box::new(compile_find_body(n, cx)?));
                Ok(())
            },
        },
    ],
    required: &["query"],
};

static TEXT_INPUT: FieldTable<TextInputAction> = FieldTable {
    construct: "input action",
    fields: &[Field {
        key: "input",
        target: "value",
        convert: |a, n, cx| {
            a.value = compile_template(n, cx)?;
            Ok(())
        },
    }],
    required: &["input"],
};

/// Project a find body without provenance; the caller records it.
pub(crate) fn project_find_body(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<FindStep> {
    let node = accessor::non_null(node)?;
    project(node, &FIND_STEP, FindStep::default(), cx)
}

/// A nested find body, recorded at its own mapping.
pub fn compile_find_body(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<FindStep> {
    let step = project_find_body(node, cx)?;
    Ok(cx.record(step, node))
}

pub fn compile_actions(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Vec<FindStepAction>> {
    accessor::normalize_one_or_many(node)
        .into_iter()
        .map(|item| compile_action(item, cx))
        .collect()
}

fn compile_action(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<FindStepAction> {
    let action = if node.value() == Some(CLICK) {
        FindStepAction::Click(ClickAction::default())
    } else {
        FindStepAction::TextInput(project(node, &TEXT_INPUT, TextInputAction::default(), cx)?)
    };
    Ok(cx.record(action, node))
}
