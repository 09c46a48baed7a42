//! C ABI entry points
//!
//! Callers hold an opaque adapter handle. Strings passed in may be null or
//! malformed; strings handed out must be released with
//! [`metaparser_string_free`].

use super::engine::InsteadEngine;
use crate::adapter::BoundaryAdapter;
use crate::logging::init_logging;
use crate::marshal::{into_c_string, text_arg};
use std::ffi::{CString, c_char, c_int};
use tracing::warn;

/// Adapter type behind the C handle
pub type MetaparserAdapter = BoundaryAdapter<InsteadEngine>;

/// Create an adapter. Returns null if one already exists in this process.
#[unsafe(no_mangle)]
pub extern "C" fn metaparser_adapter_new() -> *mut MetaparserAdapter {
    init_logging();
    match InsteadEngine::acquire() {
        Some(engine) => Box::into_raw(Box::new(BoundaryAdapter::new(engine))),
        None => {
            warn!("INSTEAD engine already owned by another adapter");
            std::ptr::null_mut()
        }
    }
}

/// Destroy an adapter created by [`metaparser_adapter_new`].
///
/// # Safety
/// `adapter` must be null or a handle not yet freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_adapter_free(adapter: *mut MetaparserAdapter) {
    if !adapter.is_null() {
        drop(unsafe { Box::from_raw(adapter) });
    }
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_register_extension(adapter: *mut MetaparserAdapter) -> c_int {
    match unsafe { adapter.as_mut() } {
        Some(adapter) => adapter.register_extension(),
        None => -1,
    }
}

/// # Safety
/// `adapter` must be a live handle; the strings null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_init(
    adapter: *mut MetaparserAdapter,
    directory: *const c_char,
    game_directory: *const c_char,
) -> c_int {
    let Some(adapter) = (unsafe { adapter.as_mut() }) else {
        return -1;
    };
    let directory = unsafe { text_arg(directory) };
    let game_directory = unsafe { text_arg(game_directory) };
    adapter.initialize(&directory, &game_directory)
}

/// Run a command. Returns the response (null if the engine produced none)
/// and stores the engine status in `rc` when it is non-null.
///
/// # Safety
/// `adapter` must be a live handle, `command` null or NUL-terminated,
/// `rc` null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_command(
    adapter: *mut MetaparserAdapter,
    command: *const c_char,
    rc: *mut c_int,
) -> *mut c_char {
    let Some(adapter) = (unsafe { adapter.as_mut() }) else {
        return std::ptr::null_mut();
    };
    let command = unsafe { text_arg(command) };
    let output = adapter.submit_command(&command);
    if let Some(rc) = unsafe { rc.as_mut() } {
        *rc = output.status;
    }
    output
        .response
        .map_or(std::ptr::null_mut(), |text| into_c_string(text).into_raw())
}

/// Current engine error text, or null.
///
/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_error(adapter: *const MetaparserAdapter) -> *mut c_char {
    unsafe { adapter.as_ref() }
        .and_then(|adapter| adapter.fetch_last_error())
        .map_or(std::ptr::null_mut(), |text| into_c_string(text).into_raw())
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_load(adapter: *mut MetaparserAdapter) -> c_int {
    match unsafe { adapter.as_mut() } {
        Some(adapter) => adapter.load(),
        None => -1,
    }
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_done(adapter: *mut MetaparserAdapter) {
    if let Some(adapter) = unsafe { adapter.as_mut() } {
        adapter.shutdown();
    }
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_is_restart(adapter: *const MetaparserAdapter) -> c_int {
    unsafe { adapter.as_ref() }.is_some_and(|a| a.poll_restart_flag()) as c_int
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_is_save(adapter: *const MetaparserAdapter) -> c_int {
    unsafe { adapter.as_ref() }.is_some_and(|a| a.poll_save_flag()) as c_int
}

/// # Safety
/// `adapter` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_is_load(adapter: *const MetaparserAdapter) -> c_int {
    unsafe { adapter.as_ref() }.is_some_and(|a| a.poll_load_flag()) as c_int
}

/// Release a string returned by this library.
///
/// # Safety
/// `text` must be null or a pointer returned by this library, freed once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn metaparser_string_free(text: *mut c_char) {
    if !text.is_null() {
        drop(unsafe { CString::from_raw(text) });
    }
}
