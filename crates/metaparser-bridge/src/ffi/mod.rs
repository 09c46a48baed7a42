//! INSTEAD binding and its C ABI
//!
//! - `sys`: raw libinstead / Lua declarations
//! - `engine`: `InsteadEngine`, the `Engine` implementation
//! - `exports`: handle-based `metaparser_*` symbols for C callers

pub mod engine;
pub mod exports;
pub mod sys;

pub use engine::InsteadEngine;
pub use exports::MetaparserAdapter;
