//! Root document builder.
//!
//! A document is one of three shapes:
//!
//! - a suite: a mapping with a `scenario` key (one scenario or many) and an
//!   optional shared `configuration`;
//! - a single scenario mapping (`steps`, optional `configuration` and
//!   `description`), which becomes a one-scenario root;
//! - a bare step sequence, which becomes a one-scenario root with no
//!   configuration.

use super::configuration::compile_configuration;
use super::scenario::{compile_scenarios, SCENARIO};
use super::step::compile_steps;
use crate::accessor;
use crate::compiler::Compiler;
use crate::error::Build;
use crate::mapping::{project, Field, FieldTable};
use crate::model::{Configuration, NodeId, RootModel, Scenario};
use crate::syntax::SyntaxNode;

static SUITE: FieldTable<RootModel> = FieldTable {
    construct: "suite",
    fields: &[
        Field {
            key: "configuration",
            target: "configuration",
            convert: |r, n, cx| {
                r.configuration = compile_configuration(n, cx)?;
                Ok(())
            },
        },
        Field {
            key: "scenario",
            target: "scenarios",
            convert: |r, n, cx| {
                r.scenarios = compile_scenarios(n, cx)?;
                Ok(())
            },
        },
    ],
    required: &["scenario"],
};

pub fn is_suite(node: &SyntaxNode) -> bool {
    accessor::has_key(node, "scenario")
}

pub fn compile_root(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<RootModel> {
    let mut root = if is_suite(node) {
        project(node, &SUITE, RootModel::default(), cx)?
    } else {
        let scenario = compile_implicit_scenario(node, cx)?;
        RootModel {
            id: NodeId::UNSET,
            configuration: Configuration::default(),
            scenarios: vec![scenario],
        }
    };
    if root.configuration.id.is_unset() {
        root.configuration = cx.record(Configuration::default(), node);
    }
    Ok(cx.record(root, node))
}

fn compile_implicit_scenario(node: &SyntaxNode, cx: &mut Compiler<'_>) -> Build<Scenario> {
    let scenario = if accessor::is_sequence(node) {
        Scenario {
            steps: compile_steps(node, cx)?,
            ..Scenario::default()
        }
    } else {
        project(node, &SCENARIO, Scenario::default(), cx)?
    };
    Ok(cx.record(scenario, node))
}

/// Stand-in root for a document that failed to compile as a whole.
pub fn empty_root(node: &SyntaxNode, cx: &mut Compiler<'_>) -> RootModel {
    let configuration = cx.record(Configuration::default(), node);
    cx.record(
        RootModel {
            id: NodeId::UNSET,
            configuration,
            scenarios: Vec::new(),
        },
        node,
    )
}
