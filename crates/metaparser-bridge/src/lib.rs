//! Boundary layer between a managed-runtime caller and the INSTEAD engine
//!
//! This crate provides:
//! - `BoundaryAdapter`: the entry points callers use, with request latches
//! - An async interactor and a play-through session on top of it
//! - Markup parsing and save slot bookkeeping for front ends
//! - The INSTEAD binding with C ABI exports (feature `instead`)
//! - JNI exports for the Android app (feature `jni`)

pub mod adapter;
pub mod interactor;
pub mod layout;
pub mod logging;
pub mod markup;
pub mod marshal;
pub mod session;

#[cfg(feature = "instead")]
pub mod ffi;
#[cfg(feature = "jni")]
pub mod android;

#[cfg(test)]
mod lua_engine;
#[cfg(test)]
mod test_engine;

pub use adapter::BoundaryAdapter;
pub use interactor::{EngineInteractor, MetaparserInteractor};
pub use layout::{SaveSlot, StorageLayout};
pub use markup::{Paragraph, Span, Style, StyledText, parse_markup};
pub use session::{GameSession, Outcome, Turn};
