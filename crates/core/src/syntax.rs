//! Syntax tree handed to the compiler.
//!
//! [`SyntaxNode`] is the boundary type between the YAML parser and the model
//! builders. [`parse_document`] adapts the position-annotated tree produced by
//! `marked-yaml`; tests and other front ends may build nodes directly with the
//! constructors on [`SyntaxNode`].

use serde::Serialize;

// ──────────────────────────────────────────────
// Positions
// ──────────────────────────────────────────────

/// A 1-based line/column position in a source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// ──────────────────────────────────────────────
// Nodes
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxKind {
    Null,
    /// `plain` is false for quoted and block scalars, which are always
    /// strings.
    Scalar { text: String, plain: bool },
    Mapping(Vec<MappingEntry>),
    Sequence(Vec<SyntaxNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
}

/// One `key: value` pair of a mapping, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: String,
    pub key_span: Span,
    pub value: SyntaxNode,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, value: SyntaxNode) -> Self {
        MappingEntry {
            key: key.into(),
            key_span: value.span,
            value,
        }
    }

    /// Span from the key through the end of the value.
    pub fn span(&self) -> Span {
        self.key_span.to(self.value.span)
    }
}

/// Typed reading of a scalar under the YAML 1.2 core schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueObject<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, span: Span) -> Self {
        SyntaxNode { kind, span }
    }

    pub fn null() -> Self {
        SyntaxNode::new(SyntaxKind::Null, Span::default())
    }

    /// A plain (unquoted) scalar.
    pub fn scalar(text: impl Into<String>) -> Self {
        SyntaxNode::new(
            SyntaxKind::Scalar {
                text: text.into(),
                plain: true,
            },
            Span::default(),
        )
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        SyntaxNode::new(
            SyntaxKind::Scalar {
                text: text.into(),
                plain: false,
            },
            Span::default(),
        )
    }

    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, SyntaxNode)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| MappingEntry::new(k, v))
            .collect();
        SyntaxNode::new(SyntaxKind::Mapping(entries), Span::default())
    }

    pub fn sequence(items: impl IntoIterator<Item = SyntaxNode>) -> Self {
        SyntaxNode::new(
            SyntaxKind::Sequence(items.into_iter().collect()),
            Span::default(),
        )
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, SyntaxKind::Null)
    }

    /// Raw text of a scalar node.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            SyntaxKind::Scalar { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[MappingEntry]> {
        match &self.kind {
            SyntaxKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[SyntaxNode]> {
        match &self.kind {
            SyntaxKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Typed value of a null or scalar node; `None` for collections. Only
    /// plain scalars resolve to booleans and numbers.
    pub fn value_object(&self) -> Option<ValueObject<'_>> {
        match &self.kind {
            SyntaxKind::Null => Some(ValueObject::Null),
            SyntaxKind::Scalar { text, plain: true } => Some(resolve_scalar(text)),
            SyntaxKind::Scalar { text, plain: false } => Some(ValueObject::String(text)),
            _ => None,
        }
    }

    /// Human-readable shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match &self.kind {
            SyntaxKind::Null => "null",
            SyntaxKind::Scalar { .. } => "scalar",
            SyntaxKind::Mapping(_) => "mapping",
            SyntaxKind::Sequence(_) => "sequence",
        }
    }
}

fn resolve_scalar(text: &str) -> ValueObject<'_> {
    match text {
        "true" | "True" | "TRUE" => return ValueObject::Bool(true),
        "false" | "False" | "FALSE" => return ValueObject::Bool(false),
        _ => {}
    }
    if looks_numeric(text) {
        if let Ok(n) = text.parse::<f64>() {
            return ValueObject::Number(n);
        }
    }
    ValueObject::String(text)
}

// `f64::from_str` also accepts "inf", "NaN" and friends, which YAML treats
// as plain strings.
fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let digits = digits.strip_prefix('.').unwrap_or(digits);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_null_text(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

// ──────────────────────────────────────────────
// marked-yaml adapter
// ──────────────────────────────────────────────

/// Key the adapter nests non-mapping documents under.
const NESTING_KEY: &str = "__document__";

/// Parse YAML text into a [`SyntaxNode`] tree.
///
/// The error is the parser's message; callers attach the filename.
pub fn parse_document(text: &str) -> Result<SyntaxNode, String> {
    match marked_yaml::parse_yaml(0, text) {
        Ok(node) => Ok(convert(&node, Shift::NONE)),
        Err(direct) => parse_nested(text).ok_or_else(|| direct.to_string()),
    }
}

// marked-yaml may reject a top level that is not a mapping. Such documents
// are parsed again one level down, under a synthetic key, and their
// positions shifted back. Leading directives and the `---` marker only mean
// something at column 1, so they are blanked out before nesting.
fn parse_nested(text: &str) -> Option<SyntaxNode> {
    let mut nested = format!("{}:\n", NESTING_KEY);
    let mut in_prologue = true;
    for line in text.lines() {
        if in_prologue && is_prologue_line(line) {
            nested.push('\n');
            continue;
        }
        in_prologue = false;
        nested.push_str("  ");
        nested.push_str(line);
        nested.push('\n');
    }
    let node = marked_yaml::parse_yaml(0, nested).ok()?;
    let value = node.as_mapping()?.get_node(NESTING_KEY)?;
    Some(convert(value, Shift { lines: 1, columns: 2 }))
}

/// Directive, `---` marker, comment or blank line ahead of the content.
fn is_prologue_line(line: &str) -> bool {
    let trimmed = line.trim_end();
    if trimmed.starts_with('%') {
        return true;
    }
    if let Some(rest) = trimmed.strip_prefix("---") {
        let rest = rest.trim_start();
        return rest.is_empty() || rest.starts_with('#');
    }
    let trimmed = trimmed.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

#[derive(Clone, Copy)]
struct Shift {
    lines: u32,
    columns: u32,
}

impl Shift {
    const NONE: Shift = Shift {
        lines: 0,
        columns: 0,
    };
}

fn convert(node: &marked_yaml::Node, shift: Shift) -> SyntaxNode {
    let span = convert_span(node.span(), shift);
    match node {
        marked_yaml::Node::Scalar(scalar) => {
            let text = scalar.as_str();
            let plain = scalar.may_coerce();
            if plain && is_null_text(text) {
                SyntaxNode::new(SyntaxKind::Null, span)
            } else {
                let text = text.to_owned();
                SyntaxNode::new(SyntaxKind::Scalar { text, plain }, span)
            }
        }
        marked_yaml::Node::Mapping(mapping) => {
            let entries = mapping
                .iter()
                .map(|(key, value)| MappingEntry {
                    key: key.as_str().to_owned(),
                    key_span: convert_span(key.span(), shift),
                    value: convert(value, shift),
                })
                .collect();
            SyntaxNode::new(SyntaxKind::Mapping(entries), span)
        }
        marked_yaml::Node::Sequence(sequence) => {
            let items = sequence.iter().map(|item| convert(item, shift)).collect();
            SyntaxNode::new(SyntaxKind::Sequence(items), span)
        }
    }
}

fn convert_span(span: &marked_yaml::Span, shift: Shift) -> Span {
    let start = span
        .start()
        .map(|m| convert_marker(m, shift))
        .unwrap_or_default();
    let end = span.end().map(|m| convert_marker(m, shift)).unwrap_or(start);
    Span::new(start, end)
}

fn convert_marker(marker: &marked_yaml::Marker, shift: Shift) -> Position {
    Position::new(
        (marker.line() as u32).saturating_sub(shift.lines),
        (marker.column() as u32).saturating_sub(shift.columns),
    )
}
