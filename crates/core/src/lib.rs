#![allow(clippy::result_large_err)]
//! arlecchino-core: scenario compiler core library.
//!
//! Compiles YAML scenario documents into a typed model tree that an
//! execution engine walks to drive a browser session.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`compile()`] / [`compile_source()`] -- compile one document
//! - [`load_bundle()`] -- compile a document and everything it imports
//! - [`CompileOptions`], [`Policy`] -- fail-fast vs accumulate
//! - [`Error`], [`CompileError`], [`Diagnostic`] -- error types
//! - [`ProvenanceStore`] -- model node -> file and span
//! - Model types: [`RootModel`], [`Scenario`], [`Configuration`], [`Step`]
//! - [`StepExecutor`] -- the dispatch boundary for execution engines
//!
//! The mapping engine and construct builders are public for callers that
//! compile fragments on their own.

pub mod accessor;
pub mod builder;
pub mod compile;
pub mod compiler;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod load;
pub mod mapping;
pub mod model;
pub mod provenance;
pub mod source;
pub mod syntax;

// ── Convenience re-exports: key types ────────────────────────────────

pub use compiler::{CompileOptions, Compiler};
pub use diagnostics::Policy;
pub use error::{CompileError, Diagnostic, Error};
pub use model::{
    walk, Configuration, FindStep, FindStepAction, ModelNode, NodeId, RootModel, Scenario, Step,
    TemplateString,
};
pub use provenance::{Provenance, ProvenanceStore};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use syntax::{parse_document, Span, SyntaxNode};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use compile::{compile, compile_source, compile_with_provider, Compilation};
pub use dispatch::{execute_scenario, execute_step, StepExecutor};
pub use load::{load_bundle, load_bundle_with_provider, Bundle};
