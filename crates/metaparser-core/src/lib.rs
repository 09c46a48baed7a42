//! # metaparser-core
//!
//! Core types and traits for the Metaparser bridge.
//!
//! This crate provides the pieces shared by every engine binding:
//! - The `Engine` capability table the INSTEAD interpreter is reached through
//! - Extension hooks and the host callbacks scripts can invoke
//! - Restart / save / load request latches
//! - Bridge configuration and error types

pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod flags;

pub use config::BridgeConfig;
pub use engine::{
    CommandOutput, Engine, Extension, ExtensionContext, HostFunction, STATUS_OK, Status,
};
pub use error::{MetaparserError, Result};
pub use extension::{HostCallbacks, MetaparserExtension};
pub use flags::{GameFlags, Latch, MenuKind};
