//! Compiled scenario model.
//!
//! These records are what the builders produce and what an execution engine
//! consumes. They hold no syntax nodes: each record carries a [`NodeId`]
//! that keys its entry in the [`ProvenanceStore`](crate::ProvenanceStore).

use serde::Serialize;
use std::collections::BTreeMap;

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// Identity of a model node within one compile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const UNSET: NodeId = NodeId(u32::MAX);

    pub fn is_unset(self) -> bool {
        self == NodeId::UNSET
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::UNSET
    }
}

pub trait ModelNode {
    fn id(&self) -> NodeId;
    fn set_id(&mut self, id: NodeId);
    fn kind(&self) -> &'static str;
    /// Direct model-node children, in tree order.
    fn for_each_child(&self, _visit: &mut dyn FnMut(&dyn ModelNode)) {}
}

/// Visit `node` and every descendant, depth-first, parents before children.
pub fn walk(node: &dyn ModelNode, visit: &mut dyn FnMut(&dyn ModelNode)) {
    visit(node);
    node.for_each_child(&mut |child| walk(child, &mut *visit));
}

macro_rules! model_node {
    ($ty:ident) => {
        model_node!($ty, |_node, _visit| {});
    };
    ($ty:ident, |$node:ident, $visit:ident| $body:block) => {
        impl ModelNode for $ty {
            fn id(&self) -> NodeId {
                self.id
            }
            fn set_id(&mut self, id: NodeId) {
                self.id = id;
            }
            fn kind(&self) -> &'static str {
                stringify!($ty)
            }
            #[allow(unused_variables)]
            fn for_each_child(&self, $visit: &mut dyn FnMut(&dyn ModelNode)) {
                let $node = self;
                $body
            }
        }
    };
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A string with `${name}` placeholders, split into segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateString {
    #[serde(skip)]
    pub id: NodeId,
    pub source: String,
    pub segments: Vec<TemplateSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TemplateSegment {
    Literal(String),
    Variable(String),
}

impl TemplateString {
    /// A template with no placeholders.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![TemplateSegment::Literal(text.clone())]
        };
        TemplateString {
            id: NodeId::UNSET,
            source: text,
            segments,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Variable(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }
}

model_node!(TemplateString);

/// A path as written in the document plus its resolved location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileReference {
    #[serde(skip)]
    pub id: NodeId,
    pub path: String,
    pub resolved: String,
}

model_node!(FileReference);

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

model_node!(Viewport);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<TemplateString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<TemplateString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub direct_variables: BTreeMap<String, TemplateString>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub import_variables: BTreeMap<String, FileReference>,
}

model_node!(Configuration, |node, visit| {
    if let Some(base_uri) = &node.base_uri {
        visit(base_uri);
    }
    if let Some(user_agent) = &node.user_agent {
        visit(user_agent);
    }
    if let Some(viewport) = &node.viewport {
        visit(viewport);
    }
    for value in node.direct_variables.values() {
        visit(value);
    }
    for file in node.import_variables.values() {
        visit(file);
    }
});

impl Configuration {
    /// Layer `overlay` on top of `self`. The result is a synthesized value
    /// and has no provenance of its own.
    pub fn merge(&self, overlay: &Configuration) -> Configuration {
        let viewport = match (&self.viewport, &overlay.viewport) {
            (Some(base), Some(top)) => Some(Viewport {
                id: NodeId::UNSET,
                width: top.width.or(base.width),
                height: top.height.or(base.height),
            }),
            (base, top) => top.clone().or_else(|| base.clone()),
        };
        let mut direct_variables = self.direct_variables.clone();
        direct_variables.extend(overlay.direct_variables.clone());
        let mut import_variables = self.import_variables.clone();
        import_variables.extend(overlay.import_variables.clone());

        Configuration {
            id: NodeId::UNSET,
            base_uri: overlay.base_uri.clone().or_else(|| self.base_uri.clone()),
            user_agent: overlay
                .user_agent
                .clone()
                .or_else(|| self.user_agent.clone()),
            viewport,
            direct_variables,
            import_variables,
        }
    }
}

// ──────────────────────────────────────────────
// Root and scenarios
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootModel {
    #[serde(skip)]
    pub id: NodeId,
    pub configuration: Configuration,
    pub scenarios: Vec<Scenario>,
}

model_node!(RootModel, |node, visit| {
    visit(&node.configuration);
    for scenario in &node.scenarios {
        visit(scenario);
    }
});

impl RootModel {
    /// Root configuration overlaid with scenario `index`'s own.
    pub fn effective_configuration(&self, index: usize) -> Option<Configuration> {
        let scenario = self.scenarios.get(index)?;
        Some(match &scenario.configuration {
            Some(own) => self.configuration.merge(own),
            None => self.configuration.merge(&Configuration::default()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scenario {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
    pub steps: Vec<Step>,
}

model_node!(Scenario, |node, visit| {
    if let Some(configuration) = &node.configuration {
        visit(configuration);
    }
    for step in &node.steps {
        visit(step);
    }
});

// ──────────────────────────────────────────────
// Steps
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    Goto(GotoStep),
    Find(FindStep),
    Screenshot(ScreenshotStep),
    WaitForNavigation(WaitForNavigationStep),
    Sleep(SleepStep),
    Pause(PauseStep),
    ReserveNextDialogAnswer(ReserveNextDialogAnswerStep),
    Echo(EchoStep),
    RunScript(RunScriptStep),
    Import(ImportStep),
}

impl Step {
    fn inner(&self) -> &dyn ModelNode {
        match self {
            Step::Goto(s) => s,
            Step::Find(s) => s,
            Step::Screenshot(s) => s,
            Step::WaitForNavigation(s) => s,
            Step::Sleep(s) => s,
            Step::Pause(s) => s,
            Step::ReserveNextDialogAnswer(s) => s,
            Step::Echo(s) => s,
            Step::RunScript(s) => s,
            Step::Import(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ModelNode {
        match self {
            Step::Goto(s) => s,
            Step::Find(s) => s,
            Step::Screenshot(s) => s,
            Step::WaitForNavigation(s) => s,
            Step::Sleep(s) => s,
            Step::Pause(s) => s,
            Step::ReserveNextDialogAnswer(s) => s,
            Step::Echo(s) => s,
            Step::RunScript(s) => s,
            Step::Import(s) => s,
        }
    }
}

impl ModelNode for Step {
    fn id(&self) -> NodeId {
        self.inner().id()
    }
    fn set_id(&mut self, id: NodeId) {
        self.inner_mut().set_id(id);
    }
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }
    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn ModelNode)) {
        self.inner().for_each_child(visit);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoStep {
    #[serde(skip)]
    pub id: NodeId,
    pub url_fragment: TemplateString,
}

model_node!(GotoStep, |node, visit| {
    visit(&node.url_fragment);
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindStep {
    #[serde(skip)]
    pub id: NodeId,
    pub query: TemplateString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_text: Option<TemplateString>,
    pub actions: Vec<FindStepAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<FindStep>>,
}

model_node!(FindStep, |node, visit| {
    visit(&node.query);
    if let Some(with_text) = &node.with_text {
        visit(with_text);
    }
    for action in &node.actions {
        visit(action);
    }
    if let Some(child) = &node.child {
        visit(child.as_ref());
    }
});

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FindStepAction {
    Click(ClickAction),
    TextInput(TextInputAction),
}

impl ModelNode for FindStepAction {
    fn id(&self) -> NodeId {
        match self {
            FindStepAction::Click(a) => a.id,
            FindStepAction::TextInput(a) => a.id,
        }
    }
    fn set_id(&mut self, id: NodeId) {
        match self {
            FindStepAction::Click(a) => a.id = id,
            FindStepAction::TextInput(a) => a.id = id,
        }
    }
    fn kind(&self) -> &'static str {
        match self {
            FindStepAction::Click(a) => a.kind(),
            FindStepAction::TextInput(a) => a.kind(),
        }
    }
    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn ModelNode)) {
        match self {
            FindStepAction::Click(a) => a.for_each_child(visit),
            FindStepAction::TextInput(a) => a.for_each_child(visit),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClickAction {
    #[serde(skip)]
    pub id: NodeId,
}

model_node!(ClickAction);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextInputAction {
    #[serde(skip)]
    pub id: NodeId,
    pub value: TemplateString,
}

model_node!(TextInputAction, |node, visit| {
    visit(&node.value);
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotStep {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TemplateString>,
    pub full_page: bool,
}

model_node!(ScreenshotStep, |node, visit| {
    if let Some(name) = &node.name {
        visit(name);
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaitForNavigationStep {
    #[serde(skip)]
    pub id: NodeId,
    /// Milliseconds; the engine's default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

model_node!(WaitForNavigationStep);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SleepStep {
    #[serde(skip)]
    pub id: NodeId,
    /// Milliseconds.
    pub time: u64,
}

model_node!(SleepStep);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PauseStep {
    #[serde(skip)]
    pub id: NodeId,
}

model_node!(PauseStep);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveNextDialogAnswerStep {
    #[serde(skip)]
    pub id: NodeId,
    pub is_accept: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TemplateString>,
}

impl Default for ReserveNextDialogAnswerStep {
    fn default() -> Self {
        ReserveNextDialogAnswerStep {
            id: NodeId::UNSET,
            is_accept: true,
            text: None,
        }
    }
}

model_node!(ReserveNextDialogAnswerStep, |node, visit| {
    if let Some(text) = &node.text {
        visit(text);
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EchoStep {
    #[serde(skip)]
    pub id: NodeId,
    pub messages: Vec<TemplateString>,
}

model_node!(EchoStep, |node, visit| {
    for message in &node.messages {
        visit(message);
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScriptStep {
    #[serde(skip)]
    pub id: NodeId,
    pub script_file: FileReference,
}

model_node!(RunScriptStep, |node, visit| {
    visit(&node.script_file);
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportStep {
    #[serde(skip)]
    pub id: NodeId,
    pub file: FileReference,
}

model_node!(ImportStep, |node, visit| {
    visit(&node.file);
});
