//! Type-checked node accessors.
//!
//! Each accessor either hands back the node narrowed to the required shape
//! or fails with a [`CompileError`] pointing at it. They are the leaf
//! validation primitives the builders compose.

use crate::error::CompileError;
use crate::syntax::{MappingEntry, SyntaxNode, ValueObject};

fn not_allowed(node: &SyntaxNode, expected: &'static str) -> CompileError {
    CompileError::NotAllowedValueType {
        span: node.span,
        expected,
    }
}

pub fn mapping(node: &SyntaxNode) -> Result<&[MappingEntry], CompileError> {
    node.entries().ok_or_else(|| not_allowed(node, "mapping"))
}

pub fn sequence(node: &SyntaxNode) -> Result<&[SyntaxNode], CompileError> {
    node.items().ok_or_else(|| not_allowed(node, "sequence"))
}

/// Value of a mapping entry, which must not be null.
pub fn non_null_entry(entry: &MappingEntry) -> Result<&SyntaxNode, CompileError> {
    if entry.value.is_null() {
        return Err(CompileError::NoRequiredValue { span: entry.span() });
    }
    Ok(&entry.value)
}

pub fn non_null(node: &SyntaxNode) -> Result<&SyntaxNode, CompileError> {
    if node.is_null() {
        return Err(CompileError::NoRequiredValue { span: node.span });
    }
    Ok(node)
}

/// Any non-null scalar is acceptable as a string.
pub fn string(node: &SyntaxNode) -> Result<&str, CompileError> {
    node.value().ok_or_else(|| not_allowed(node, "string"))
}

pub fn number(node: &SyntaxNode) -> Result<f64, CompileError> {
    match node.value_object() {
        Some(ValueObject::Number(n)) => Ok(n),
        _ => Err(not_allowed(node, "number")),
    }
}

/// A non-negative whole number (milliseconds, pixels).
pub fn integer(node: &SyntaxNode) -> Result<u64, CompileError> {
    match node.value_object() {
        Some(ValueObject::Number(n)) if n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => {
            Ok(n as u64)
        }
        _ => Err(not_allowed(node, "non-negative integer")),
    }
}

pub fn boolean(node: &SyntaxNode) -> Result<bool, CompileError> {
    match node.value_object() {
        Some(ValueObject::Bool(b)) => Ok(b),
        _ => Err(not_allowed(node, "boolean")),
    }
}

// ──────────────────────────────────────────────
// Predicates
// ──────────────────────────────────────────────

pub fn has_key(node: &SyntaxNode, key: &str) -> bool {
    node.entries()
        .is_some_and(|entries| entries.iter().any(|e| e.key == key))
}

pub fn is_sequence(node: &SyntaxNode) -> bool {
    node.items().is_some()
}

pub fn pick<'a>(node: &'a SyntaxNode, key: &str) -> Option<&'a SyntaxNode> {
    node.entries()?
        .iter()
        .find(|e| e.key == key)
        .map(|e| &e.value)
}

/// `x` and `[x, y]` both become a list of nodes.
pub fn normalize_one_or_many(node: &SyntaxNode) -> Vec<&SyntaxNode> {
    match node.items() {
        Some(items) => items.iter().collect(),
        None => vec![node],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_rejects_scalar() {
        let err = mapping(&SyntaxNode::scalar("x")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NotAllowedValueType {
                expected: "mapping",
                ..
            }
        ));
    }

    #[test]
    fn sequence_accepts_sequence() {
        let node = SyntaxNode::sequence([SyntaxNode::scalar("a")]);
        assert_eq!(sequence(&node).unwrap().len(), 1);
        assert!(sequence(&SyntaxNode::null()).is_err());
    }

    #[test]
    fn non_null_entry_rejects_null_value() {
        let entry = MappingEntry::new("query", SyntaxNode::null());
        assert!(matches!(
            non_null_entry(&entry),
            Err(CompileError::NoRequiredValue { .. })
        ));
        let entry = MappingEntry::new("query", SyntaxNode::scalar("Login"));
        assert_eq!(non_null_entry(&entry).unwrap().value(), Some("Login"));
    }

    #[test]
    fn string_accepts_any_scalar() {
        assert_eq!(string(&SyntaxNode::scalar("42")).unwrap(), "42");
        assert!(string(&SyntaxNode::null()).is_err());
        assert!(string(&SyntaxNode::mapping(Vec::<(String, SyntaxNode)>::new())).is_err());
    }

    #[test]
    fn number_integer_and_boolean() {
        assert_eq!(number(&SyntaxNode::scalar("2.5")).unwrap(), 2.5);
        assert!(number(&SyntaxNode::scalar("abc")).is_err());

        assert_eq!(integer(&SyntaxNode::scalar("1000")).unwrap(), 1000);
        assert!(integer(&SyntaxNode::scalar("2.5")).is_err());
        assert!(integer(&SyntaxNode::scalar("-1")).is_err());

        assert!(boolean(&SyntaxNode::scalar("false")).is_ok_and(|b| !b));
        assert!(boolean(&SyntaxNode::scalar("yes")).is_err());
    }

    #[test]
    fn predicates() {
        let node = SyntaxNode::mapping([("scenario", SyntaxNode::null())]);
        assert!(has_key(&node, "scenario"));
        assert!(!has_key(&node, "steps"));
        assert!(!has_key(&SyntaxNode::scalar("scenario"), "scenario"));
        assert!(pick(&node, "scenario").is_some_and(SyntaxNode::is_null));
        assert!(!is_sequence(&node));
    }

    #[test]
    fn normalize_wraps_single_value() {
        let one = SyntaxNode::scalar("click");
        assert_eq!(normalize_one_or_many(&one).len(), 1);

        let many = SyntaxNode::sequence([SyntaxNode::scalar("click"), SyntaxNode::scalar("x")]);
        let items = normalize_one_or_many(&many);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].value(), Some("x"));
    }
}
