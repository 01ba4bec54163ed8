//! Generic mapping engine: project a syntax mapping onto a typed record
//! through a static field table.
//!
//! Each construct declares one [`FieldTable`]. The table is the complete set
//! of keys accepted at that nesting level; any other key is rejected.
//! Failures are raised in document order as entries are visited, and the
//! missing-required-keys check runs last, so a mapping with both an unknown
//! key and a missing required key reports the unknown key.

use crate::accessor;
use crate::compiler::Compiler;
use crate::error::{Build, CompileError};
use crate::syntax::SyntaxNode;

/// Conversion from an entry's value into the record's target field.
pub type Convert<T> = fn(&mut T, &SyntaxNode, &mut Compiler<'_>) -> Build<()>;

pub struct Field<T: 'static> {
    /// Key as written in the document.
    pub key: &'static str,
    /// Record field the conversion writes.
    pub target: &'static str,
    pub convert: Convert<T>,
}

pub struct FieldTable<T: 'static> {
    /// Construct name used in diagnostics, e.g. `"find"`.
    pub construct: &'static str,
    pub fields: &'static [Field<T>],
    pub required: &'static [&'static str],
}

impl<T> FieldTable<T> {
    pub fn field(&self, key: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn allowed_keys(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.key.to_owned()).collect()
    }
}

/// Project `node` onto a record that starts out as `defaults`.
pub fn project<T>(
    node: &SyntaxNode,
    table: &FieldTable<T>,
    defaults: T,
    cx: &mut Compiler<'_>,
) -> Build<T> {
    let entries = accessor::mapping(node)?;
    let mut missing: Vec<&str> = table.required.to_vec();
    let mut record = defaults;

    for entry in entries {
        missing.retain(|k| *k != entry.key);
        if table.required.contains(&entry.key.as_str()) {
            accessor::non_null_entry(entry)?;
        }
        let field = table
            .field(&entry.key)
            .ok_or_else(|| CompileError::NotAllowedKey {
                span: entry.key_span,
                construct: table.construct,
                key: entry.key.clone(),
                allowed: table.allowed_keys(),
            })?;
        tracing::trace!(
            construct = table.construct,
            key = field.key,
            target = field.target,
            "projecting field"
        );
        (field.convert)(&mut record, &entry.value, cx)?;
    }

    if !missing.is_empty() {
        return Err(CompileError::RequiredKeyNotExist {
            span: node.span,
            construct: table.construct,
            missing: missing.into_iter().map(str::to_owned).collect(),
        }
        .into());
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Policy;
    use crate::error::BuildError;
    use crate::source::InMemoryProvider;
    use crate::CompileOptions;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        alpha: Option<String>,
        beta: Option<String>,
        gamma: Option<String>,
        delta: Option<String>,
    }

    static PROBE: FieldTable<Probe> = FieldTable {
        construct: "probe",
        fields: &[
            Field {
                key: "a",
                target: "alpha",
                convert: |p, n, _| {
                    p.alpha = Some(accessor::string(n)?.to_owned());
                    Ok(())
                },
            },
            Field {
                key: "b",
                target: "beta",
                convert: |p, n, _| {
                    p.beta = Some(accessor::string(n)?.to_owned());
                    Ok(())
                },
            },
            Field {
                key: "c",
                target: "gamma",
                convert: |p, n, _| {
                    p.gamma = Some(accessor::string(n)?.to_owned());
                    Ok(())
                },
            },
            Field {
                key: "d",
                target: "delta",
                convert: |p, n, _| {
                    p.delta = Some(accessor::string(n)?.to_owned());
                    Ok(())
                },
            },
        ],
        required: &["a", "b", "c"],
    };

    const KEYS: [&str; 4] = ["a", "b", "c", "d"];

    fn run(node: &SyntaxNode, defaults: Probe) -> Result<Probe, CompileError> {
        let provider = InMemoryProvider::new(HashMap::new());
        let options = CompileOptions {
            policy: Policy::FailFast,
        };
        let mut cx = Compiler::new(&provider, &options);
        match project(node, &PROBE, defaults, &mut cx) {
            Ok(p) => Ok(p),
            Err(BuildError::Compile(e)) => Err(e),
            Err(BuildError::Fatal(e)) => panic!("unexpected fatal error: {}", e),
        }
    }

    fn doc(keys: &[&str]) -> SyntaxNode {
        SyntaxNode::mapping(
            keys.iter()
                .map(|k| (k.to_string(), SyntaxNode::scalar(format!("value-{}", k)))),
        )
    }

    #[test]
    fn empty_mapping_without_required_keys_yields_defaults() {
        static EMPTY: FieldTable<Probe> = FieldTable {
            construct: "empty",
            fields: &[],
            required: &[],
        };
        let provider = InMemoryProvider::new(HashMap::new());
        let mut cx = Compiler::new(&provider, &CompileOptions::default());
        let defaults = Probe {
            delta: Some("preset".into()),
            ..Probe::default()
        };
        let node = SyntaxNode::mapping(Vec::<(String, SyntaxNode)>::new());
        let p = project(&node, &EMPTY, defaults, &mut cx).unwrap();
        assert_eq!(p.delta.as_deref(), Some("preset"));
        assert!(p.alpha.is_none());
    }

    #[test]
    fn projected_fields_override_defaults() {
        let defaults = Probe {
            delta: Some("preset".into()),
            ..Probe::default()
        };
        let p = run(&doc(&["a", "b", "c", "d"]), defaults).unwrap();
        assert_eq!(p.delta.as_deref(), Some("value-d"));

        let defaults = Probe {
            delta: Some("preset".into()),
            ..Probe::default()
        };
        let p = run(&doc(&["a", "b", "c"]), defaults).unwrap();
        assert_eq!(p.delta.as_deref(), Some("preset"));
    }

    #[test]
    fn non_mapping_is_rejected() {
        let err = run(&SyntaxNode::scalar("nope"), Probe::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NotAllowedValueType {
                expected: "mapping",
                ..
            }
        ));
    }

    #[test]
    fn null_required_value_is_rejected() {
        let node = SyntaxNode::mapping([
            ("a", SyntaxNode::null()),
            ("b", SyntaxNode::scalar("x")),
            ("c", SyntaxNode::scalar("y")),
        ]);
        let err = run(&node, Probe::default()).unwrap_err();
        assert!(matches!(err, CompileError::NoRequiredValue { .. }));
    }

    #[test]
    fn unknown_key_wins_over_missing_required_keys() {
        let err = run(&doc(&["zzz"]), Probe::default()).unwrap_err();
        assert!(matches!(err, CompileError::NotAllowedKey { ref key, .. } if key == "zzz"));
    }

    proptest! {
        #[test]
        fn exact_keys_set_every_target_field(
            order in Just(KEYS.to_vec()).prop_shuffle()
        ) {
            let p = run(&doc(&order), Probe::default()).unwrap();
            prop_assert_eq!(p, Probe {
                alpha: Some("value-a".into()),
                beta: Some("value-b".into()),
                gamma: Some("value-c".into()),
                delta: Some("value-d".into()),
            });
        }

        #[test]
        fn unknown_key_lists_every_allowed_key(
            order in Just(KEYS.to_vec()).prop_shuffle(),
            position in 0usize..=4,
        ) {
            let mut keys = order.clone();
            keys.insert(position, "bogus");
            let err = run(&doc(&keys), Probe::default()).unwrap_err();
            match err {
                CompileError::NotAllowedKey { key, allowed, .. } => {
                    prop_assert_eq!(key, "bogus");
                    prop_assert_eq!(allowed, vec!["a", "b", "c", "d"]);
                }
                other => prop_assert!(false, "unexpected error: {:?}", other),
            }
        }

        #[test]
        fn missing_required_keys_are_reported_together(
            omitted in proptest::sample::subsequence(vec!["a", "b", "c"], 1..=3),
            shuffled in Just(KEYS.to_vec()).prop_shuffle(),
        ) {
            let present: Vec<&str> = shuffled
                .into_iter()
                .filter(|k| !omitted.contains(k))
                .collect();
            let err = run(&doc(&present), Probe::default()).unwrap_err();
            match err {
                CompileError::RequiredKeyNotExist { missing, .. } => {
                    prop_assert_eq!(missing, omitted);
                }
                other => prop_assert!(false, "unexpected error: {:?}", other),
            }
        }
    }
}
