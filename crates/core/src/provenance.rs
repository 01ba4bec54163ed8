//! Out-of-band provenance for model nodes.
//!
//! Model records carry only a [`NodeId`]; the store maps that id to the
//! file and span the record was built from.

use crate::model::{ModelNode, NodeId};
use crate::syntax::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub file: String,
    pub span: Span,
    /// Model node kind, e.g. `"FindStep"`.
    pub kind: &'static str,
}

/// Identity-keyed provenance table, owned by a single compile pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceStore {
    entries: Vec<Provenance>,
}

impl ProvenanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `node` a fresh id and remember where it came from.
    pub fn record<T: ModelNode>(&mut self, mut node: T, file: &str, span: Span) -> T {
        let id = NodeId(self.entries.len() as u32);
        self.entries.push(Provenance {
            file: file.to_owned(),
            span,
            kind: node.kind(),
        });
        node.set_id(id);
        node
    }

    pub fn lookup(&self, node: &dyn ModelNode) -> Option<&Provenance> {
        self.get(node.id())
    }

    pub fn get(&self, id: NodeId) -> Option<&Provenance> {
        if id.is_unset() {
            return None;
        }
        self.entries.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Provenance)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, p)| (NodeId(i as u32), p))
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .iter()
            .map(|(id, p)| {
                serde_json::json!({
                    "id":    id.0,
                    "kind":  p.kind,
                    "file":  p.file,
                    "start": p.span.start,
                    "end":   p.span.end,
                })
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}
