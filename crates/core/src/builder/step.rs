//! Step builders.
//!
//! A step is a single-key mapping naming its kind (`goto: /login`) or a
//! bare scalar naming a kind that needs no value (`pause`). Builders in
//! [`STEP_KINDS`] receive the value node (null for the bare form) and return
//! the step without provenance; [`compile_step`] records it at the whole
//! step node.

use super::file_ref::compile_file_reference;
use super::find_step::project_find_body;
use super::template::compile_template;
use crate::accessor;
use crate::compiler::Compiler;
use crate::error::{Build, CompileError};
use crate::mapping::{project, Field, FieldTable};
use crate::model::{
    EchoStep, GotoStep, ImportStep, NodeId, PauseStep, ReserveNextDialogAnswerStep,
    RunScriptStep, ScreenshotStep, SleepStep, Step, WaitForNavigationStep,
};
use crate::syntax::{SyntaxKind, SyntaxNode};

type StepBuilder = fn(&SyntaxNode, &mut Compiler<'_>) -> Build<Step>;

static STEP_KINDS: &[(&str, StepBuilder)] = &[
    ("goto", goto),
    ("find", find),
    ("screenshot", screenshot),
    ("wait_for_navigation", wait_for_navigation),
    ("sleep", sleep),
    ("pause", pause),
    ("reserve_next_dialog_answer", reserve_next_dialog_answer),
    ("echo", echo),
    ("run_script", run_script),
    ("import", import),
];

pub fn step_kinds() -> Vec<String> {
    STEP_KINDS.iter().map(|(k, _)| (*k).to_owned()).collect()
}

/// Compile a step sequence. Each step is recovered on its own so one bad
/// step does not hide its siblings.
pub fn compile_steps(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Vec<Step>> {
    let items = accessor::sequence(node)?;
    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        if let Some(step) = cx.recover(None, |cx| compile_step(item, cx).map(Some))? {
            steps.push(step);
        }
    }
    Ok(steps)
}

pub fn compile_step(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    let bare_value;
    let (key, key_span, value) = match &node.kind {
        SyntaxKind::Scalar { text: name, .. } => {
            bare_value = SyntaxNode::null().with_span(node.span);
            (name.as_str(), node.span, &bare_value)
        }
        SyntaxKind::Mapping(entries) => match entries.as_slice() {
            [entry] => (entry.key.as_str(), entry.key_span, &entry.value),
            [] => {
                return Err(CompileError::NotAllowedValueType {
                    span: node.span,
                    expected: "step",
                }
                .into())
            }
            _ => {
                return Err(CompileError::AmbiguousStep {
                    span: node.span,
                    keys: entries.iter().map(|e| e.key.clone()).collect(),
                }
                .into())
            }
        },
        _ => {
            return Err(CompileError::NotAllowedValueType {
                span: node.span,
                expected: "step",
            }
            .into())
        }
    };

    let build = STEP_KINDS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, b)| *b)
        .ok_or_else(|| CompileError::NotAllowedKey {
            span: key_span,
            construct: "step",
            key: key.to_owned(),
            allowed: step_kinds(),
        })?;
    let step = build(value, cx)?;
    Ok(cx.record(step, node))
}

/// Compile an imported document: a step sequence, or a mapping whose only
/// key is `steps`.
pub fn compile_step_document(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Vec<Step>> {
    static STEP_DOCUMENT: FieldTable<Vec<Step>> = FieldTable {
        construct: "step document",
        fields: &[Field {
            key: "steps",
            target: "steps",
            convert: |steps, n, cx| {
                *steps = compile_steps(n, cx)?;
                Ok(())
            },
        }],
        required: &["steps"],
    };

    if accessor::is_sequence(node) {
        compile_steps(node, cx)
    } else {
        project(node, &STEP_DOCUMENT, Vec::new(), cx)
    }
}

// ──────────────────────────────────────────────
// Step kinds
// ──────────────────────────────────────────────

fn goto(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    Ok(Step::Goto(GotoStep {
        id: NodeId::UNSET,
        url_fragment: compile_template(value, cx)?,
    }))
}

fn find(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    Ok(Step::Find(project_find_body(value, cx)?))
}

static SCREENSHOT: FieldTable<ScreenshotStep> = FieldTable {
    construct: "screenshot",
    fields: &[
        Field {
            key: "name",
            target: "name",
            convert: |s, n, cx| {
                s.name = Some(compile_template(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "full_page",
            target: "full_page",
            convert: |s, n, _| {
                s.full_page = accessor::boolean(n)?;
                Ok(())
            },
        },
    ],
    required: &[],
};

fn screenshot(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    let step = match &value.kind {
        SyntaxKind::Null => ScreenshotStep::default(),
        SyntaxKind::Scalar { .. } => ScreenshotStep {
            name: Some(compile_template(value, cx)?),
            ..ScreenshotStep::default()
        },
        _ => project(value, &SCREENSHOT, ScreenshotStep::default(), cx)?,
    };
    Ok(Step::Screenshot(step))
}

static WAIT_FOR_NAVIGATION: FieldTable<WaitForNavigationStep> = FieldTable {
    construct: "wait_for_navigation",
    fields: &[Field {
        key: "timeout",
        target: "timeout",
        convert: |s, n, _| {
            s.timeout = Some(accessor::integer(n)?);
            Ok(())
        },
    }],
    required: &[],
};

fn wait_for_navigation(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    let step = if value.is_null() {
        WaitForNavigationStep::default()
    } else {
        project(value, &WAIT_FOR_NAVIGATION, WaitForNavigationStep::default(), cx)?
    };
    Ok(Step::WaitForNavigation(step))
}

fn sleep(value: &SyntaxNode, _cx: &mut Compiler<'_>) -> Build<Step> {
    let time = accessor::integer(accessor::non_null(value)?)?;
    Ok(Step::Sleep(SleepStep {
        id: NodeId::UNSET,
        time,
    }))
}

fn pause(value: &SyntaxNode, _cx: &mut Compiler<'_>) -> Build<Step> {
    if !value.is_null() {
        return Err(CompileError::NotAllowedValueType {
            span: value.span,
            expected: "null",
        }
        .into());
    }
    Ok(Step::Pause(PauseStep::default()))
}

static DIALOG_ANSWER: FieldTable<ReserveNextDialogAnswerStep> = FieldTable {
    construct: "reserve_next_dialog_answer",
    fields: &[
        Field {
            key: "accept",
            target: "is_accept",
            convert: |s, n, _| {
                s.is_accept = accessor::boolean(n)?;
                Ok(())
            },
        },
        Field {
            key: "text",
            target: "text",
            convert: |s, n, cx| {
                s.text = Some(compile_template(n, cx)?);
                Ok(())
            },
        },
    ],
    required: &[],
};

fn reserve_next_dialog_answer(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    let step = match &value.kind {
        SyntaxKind::Null => ReserveNextDialogAnswerStep::default(),
        SyntaxKind::Scalar { .. } => ReserveNextDialogAnswerStep {
            text: Some(compile_template(value, cx)?),
            ..ReserveNextDialogAnswerStep::default()
        },
        _ => project(
            value,
            &DIALOG_ANSWER,
            ReserveNextDialogAnswerStep::default(),
            cx,
        )?,
    };
    Ok(Step::ReserveNextDialogAnswer(step))
}

fn echo(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    let value = accessor::non_null(value)?;
    let messages = accessor::normalize_one_or_many(value)
        .into_iter()
        .map(|item| compile_template(item, cx))
        .collect::<Build<Vec<_>>>()?;
    Ok(Step::Echo(EchoStep {
        id: NodeId::UNSET,
        messages,
    }))
}

fn run_script(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    Ok(Step::RunScript(RunScriptStep {
        id: NodeId::UNSET,
        script_file: compile_file_reference(value, cx)?,
    }))
}

fn import(value: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Step> {
    Ok(Step::Import(ImportStep {
        id: NodeId::UNSET,
        file: compile_file_reference(value, cx)?,
    }))
}
