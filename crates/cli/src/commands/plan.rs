//! `arlecchino plan`: walk each scenario through the step dispatch boundary
//! and print one line per step. Imported steps are expanded in place.

use std::convert::Infallible;
use std::path::Path;
use std::process;

use arlecchino_core::model::{
    EchoStep, FindStep, FindStepAction, GotoStep, ImportStep, PauseStep,
    ReserveNextDialogAnswerStep, RunScriptStep, ScreenshotStep, SleepStep,
    WaitForNavigationStep,
};
use arlecchino_core::{execute_scenario, execute_step, Bundle, CompileOptions, StepExecutor};

use super::{load_or_exit, report_diagnostics};
use crate::OutputFormat;

pub(crate) fn cmd_plan(file: &Path, options: &CompileOptions, output: OutputFormat, quiet: bool) {
    let bundle = load_or_exit(file, options, output, quiet);
    if !bundle.is_clean() {
        report_diagnostics(&bundle.diagnostics, output, quiet);
        process::exit(1);
    }

    let plans: Vec<ScenarioPlan> = (0..bundle.root.scenarios.len())
        .map(|i| plan_scenario(&bundle, i))
        .collect();

    match output {
        OutputFormat::Json => {
            let value: Vec<serde_json::Value> = plans
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "description": p.description,
                        "baseUri": p.base_uri,
                        "steps": p.lines,
                    })
                })
                .collect();
            let pretty = serde_json::to_string_pretty(&serde_json::json!({ "scenarios": value }))
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for (i, plan) in plans.iter().enumerate() {
                let mut header = format!("scenario {}", i + 1);
                if let Some(description) = &plan.description {
                    header.push_str(&format!(": {}", description));
                }
                if let Some(base_uri) = &plan.base_uri {
                    header.push_str(&format!(" [{}]", base_uri));
                }
                println!("{}", header);
                for line in &plan.lines {
                    println!("  {}", line);
                }
            }
        }
    }
}

struct ScenarioPlan {
    description: Option<String>,
    base_uri: Option<String>,
    lines: Vec<String>,
}

fn plan_scenario(bundle: &Bundle, index: usize) -> ScenarioPlan {
    let scenario = &bundle.root.scenarios[index];
    let base_uri = bundle
        .root
        .effective_configuration(index)
        .and_then(|c| c.base_uri)
        .map(|t| t.source);

    let mut printer = PlanPrinter {
        bundle,
        active: vec![bundle.root_file.clone()],
        depth: 0,
        lines: Vec::new(),
    };
    match execute_scenario(&mut printer, scenario) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    ScenarioPlan {
        description: scenario.description.clone(),
        base_uri,
        lines: printer.lines,
    }
}

/// Executor that describes steps instead of running them.
struct PlanPrinter<'a> {
    bundle: &'a Bundle,
    /// Imported files currently being expanded, to stop at cycles.
    active: Vec<String>,
    depth: usize,
    lines: Vec<String>,
}

impl PlanPrinter<'_> {
    fn line(&mut self, text: String) -> Result<(), Infallible> {
        self.push(text);
        Ok(())
    }

    fn push(&mut self, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), text));
    }

    fn describe_find(&mut self, step: &FindStep) {
        let mut text = format!("find {}", step.query.source);
        if let Some(with_text) = &step.with_text {
            text.push_str(&format!(" with text \"{}\"", with_text.source));
        }
        let actions: Vec<String> = step
            .actions
            .iter()
            .map(|a| match a {
                FindStepAction::Click(_) => "click".to_owned(),
                FindStepAction::TextInput(input) => format!("input \"{}\"", input.value.source),
            })
            .collect();
        if !actions.is_empty() {
            text.push_str(&format!(" -> {}", actions.join(", ")));
        }
        self.push(text);
        if let Some(child) = &step.child {
            self.depth += 1;
            self.describe_find(child);
            self.depth -= 1;
        }
    }
}

impl StepExecutor for PlanPrinter<'_> {
    type Error = Infallible;

    fn goto(&mut self, step: &GotoStep) -> Result<(), Infallible> {
        self.line(format!("goto {}", step.url_fragment.source))
    }

    fn find(&mut self, step: &FindStep) -> Result<(), Infallible> {
        self.describe_find(step);
        Ok(())
    }

    fn screenshot(&mut self, step: &ScreenshotStep) -> Result<(), Infallible> {
        let mut text = "screenshot".to_owned();
        if let Some(name) = &step.name {
            text.push_str(&format!(" {}", name.source));
        }
        if step.full_page {
            text.push_str(" (full page)");
        }
        self.line(text)
    }

    fn wait_for_navigation(&mut self, step: &WaitForNavigationStep) -> Result<(), Infallible> {
        match step.timeout {
            Some(ms) => self.line(format!("wait_for_navigation {}ms", ms)),
            None => self.line("wait_for_navigation".to_owned()),
        }
    }

    fn sleep(&mut self, step: &SleepStep) -> Result<(), Infallible> {
        self.line(format!("sleep {}ms", step.time))
    }

    fn pause(&mut self, _step: &PauseStep) -> Result<(), Infallible> {
        self.line("pause".to_owned())
    }

    fn reserve_next_dialog_answer(
        &mut self,
        step: &ReserveNextDialogAnswerStep,
    ) -> Result<(), Infallible> {
        let mut text = format!(
            "reserve_next_dialog_answer {}",
            if step.is_accept { "accept" } else { "dismiss" }
        );
        if let Some(answer) = &step.text {
            text.push_str(&format!(" \"{}\"", answer.source));
        }
        self.line(text)
    }

    fn echo(&mut self, step: &EchoStep) -> Result<(), Infallible> {
        let messages: Vec<&str> = step.messages.iter().map(|m| m.source.as_str()).collect();
        self.line(format!("echo {}", messages.join(" | ")))
    }

    fn run_script(&mut self, step: &RunScriptStep) -> Result<(), Infallible> {
        self.line(format!("run_script {}", step.script_file.path))
    }

    fn import(&mut self, step: &ImportStep) -> Result<(), Infallible> {
        self.line(format!("import {}", step.file.path))?;
        let target = &step.file.resolved;
        if self.active.contains(target) {
            return Ok(());
        }
        let bundle = self.bundle;
        let Some(steps) = bundle.imported_steps(step) else {
            return Ok(());
        };
        self.active.push(target.clone());
        self.depth += 1;
        for imported in steps {
            execute_step(self, imported)?;
        }
        self.depth -= 1;
        self.active.pop();
        Ok(())
    }
}
