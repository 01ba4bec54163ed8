//! Step dispatch boundary.
//!
//! An execution engine implements [`StepExecutor`]; [`execute_step`] routes
//! each compiled step to the matching method with an exhaustive match, so
//! adding a step kind is a compile error until every executor handles it.

use crate::model::{
    EchoStep, FindStep, GotoStep, ImportStep, PauseStep, ReserveNextDialogAnswerStep,
    RunScriptStep, Scenario, ScreenshotStep, SleepStep, Step, WaitForNavigationStep,
};

pub trait StepExecutor {
    type Error;

    fn goto(&mut self, step: &GotoStep) -> Result<(), Self::Error>;
    fn find(&mut self, step: &FindStep) -> Result<(), Self::Error>;
    fn screenshot(&mut self, step: &ScreenshotStep) -> Result<(), Self::Error>;
    fn wait_for_navigation(&mut self, step: &WaitForNavigationStep) -> Result<(), Self::Error>;
    fn sleep(&mut self, step: &SleepStep) -> Result<(), Self::Error>;
    fn pause(&mut self, step: &PauseStep) -> Result<(), Self::Error>;
    fn reserve_next_dialog_answer(
        &mut self,
        step: &ReserveNextDialogAnswerStep,
    ) -> Result<(), Self::Error>;
    fn echo(&mut self, step: &EchoStep) -> Result<(), Self::Error>;
    fn run_script(&mut self, step: &RunScriptStep) -> Result<(), Self::Error>;
    fn import(&mut self, step: &ImportStep) -> Result<(), Self::Error>;
}

pub fn execute_step<E: StepExecutor + ?Sized>(executor: &mut E, step: &Step) -> Result<(), E::Error> {
    match step {
        Step::Goto(s) => executor.goto(s),
        Step::Find(s) => executor.find(s),
        Step::Screenshot(s) => executor.screenshot(s),
        Step::WaitForNavigation(s) => executor.wait_for_navigation(s),
        Step::Sleep(s) => executor.sleep(s),
        Step::Pause(s) => executor.pause(s),
        Step::ReserveNextDialogAnswer(s) => executor.reserve_next_dialog_answer(s),
        Step::Echo(s) => executor.echo(s),
        Step::RunScript(s) => executor.run_script(s),
        Step::Import(s) => executor.import(s),
    }
}

/// Run `scenario`'s steps in order, stopping at the first executor error.
pub fn execute_scenario<E: StepExecutor + ?Sized>(
    executor: &mut E,
    scenario: &Scenario,
) -> Result<(), E::Error> {
    for step in &scenario.steps {
        execute_step(executor, step)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileOptions;
    use crate::compile::compile_source;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn hit(&mut self, name: &'static str) -> Result<(), String> {
            self.calls.push(name);
            if self.fail_on == Some(name) {
                return Err(format!("{} failed", name));
            }
            Ok(())
        }
    }

    impl StepExecutor for Recorder {
        type Error = String;

        fn goto(&mut self, _: &GotoStep) -> Result<(), String> {
            self.hit("goto")
        }
        fn find(&mut self, _: &FindStep) -> Result<(), String> {
            self.hit("find")
        }
        fn screenshot(&mut self, _: &ScreenshotStep) -> Result<(), String> {
            self.hit("screenshot")
        }
        fn wait_for_navigation(&mut self, _: &WaitForNavigationStep) -> Result<(), String> {
            self.hit("wait_for_navigation")
        }
        fn sleep(&mut self, _: &SleepStep) -> Result<(), String> {
            self.hit("sleep")
        }
        fn pause(&mut self, _: &PauseStep) -> Result<(), String> {
            self.hit("pause")
        }
        fn reserve_next_dialog_answer(
            &mut self,
            _: &ReserveNextDialogAnswerStep,
        ) -> Result<(), String> {
            self.hit("reserve_next_dialog_answer")
        }
        fn echo(&mut self, _: &EchoStep) -> Result<(), String> {
            self.hit("echo")
        }
        fn run_script(&mut self, _: &RunScriptStep) -> Result<(), String> {
            self.hit("run_script")
        }
        fn import(&mut self, _: &ImportStep) -> Result<(), String> {
            self.hit("import")
        }
    }

    const EVERY_STEP: &str = "\
- goto: /login
- find: { query: '#user', action: click }
- screenshot
- wait_for_navigation
- sleep: 10
- pause
- reserve_next_dialog_answer
- echo: hello
- run_script: ./setup.js
- import: ./shared.yml
";

    #[test]
    fn every_step_kind_reaches_its_method() {
        let compilation =
            compile_source(EVERY_STEP, "/s/main.yml", &CompileOptions::default()).unwrap();
        let mut recorder = Recorder::default();
        execute_scenario(&mut recorder, &compilation.root.scenarios[0]).unwrap();
        assert_eq!(
            recorder.calls,
            vec![
                "goto",
                "find",
                "screenshot",
                "wait_for_navigation",
                "sleep",
                "pause",
                "reserve_next_dialog_answer",
                "echo",
                "run_script",
                "import",
            ]
        );
    }

    #[test]
    fn execution_stops_at_first_error() {
        let compilation =
            compile_source(EVERY_STEP, "/s/main.yml", &CompileOptions::default()).unwrap();
        let mut recorder = Recorder {
            fail_on: Some("sleep"),
            ..Recorder::default()
        };
        let err = execute_scenario(&mut recorder, &compilation.root.scenarios[0]).unwrap_err();
        assert_eq!(err, "sleep failed");
        assert_eq!(recorder.calls.len(), 5);
    }
}
