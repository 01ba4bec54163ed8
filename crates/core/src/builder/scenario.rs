use super::configuration::compile_configuration;
use super::step::compile_steps;
use crate::accessor;
use crate::compiler::Compiler;
use crate::error::Build;
use crate::mapping::{project, Field, FieldTable};
use crate::model::Scenario;
use crate::syntax::SyntaxNode;

pub(crate) static SCENARIO: FieldTable<Scenario> = FieldTable {
    construct: "scenario",
    fields: &[
        Field {
            key: "configuration",
            target: "configuration",
            convert: |s, n, cx| {
                s.configuration = Some(compile_configuration(n, cx)?);
                Ok(())
            },
        },
        Field {
            key: "description",
            target: "description",
            convert: |s, n, _| {
                s.description = Some(accessor::string(n)?.to_owned());
                Ok(())
            },
        },
        Field {
            key: "steps",
            target: "steps",
            convert: |s, n, cx| {
                s.steps = compile_steps(n, cx)?;
                Ok(())
            },
        },
    ],
    required: &["steps"],
};

pub fn compile_scenario(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Scenario> {
    let scenario = project(node, &SCENARIO, Scenario::default(), cx)?;
    Ok(cx.record(scenario, node))
}

/// One scenario or a sequence of them. Each is recovered on its own.
pub fn compile_scenarios(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Vec<Scenario>> {
    let node = accessor::non_null(node)?;
    let mut scenarios = Vec::new();
    for item in accessor::normalize_one_or_many(node) {
        if let Some(scenario) = cx.recover(None, |cx| compile_scenario(item, cx).map(Some))? {
            scenarios.push(scenario);
        }
    }
    Ok(scenarios)
}
