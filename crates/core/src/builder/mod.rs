//! Construct builders: one per model construct, each turning a syntax node
//! into a model record through the accessors and the field-table engine.

pub mod configuration;
pub mod file_ref;
pub mod find_step;
pub mod root;
pub mod scenario;
pub mod step;
pub mod template;

pub use configuration::compile_configuration;
pub use file_ref::compile_file_reference;
pub use find_step::{compile_actions, compile_find_body};
pub use root::{compile_root, empty_root, is_suite};
pub use scenario::{compile_scenario, compile_scenarios};
pub use step::{compile_step, compile_step_document, compile_steps, step_kinds};
pub use template::compile_template;
