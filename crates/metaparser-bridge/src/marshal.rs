//! Text marshalling across the C boundary
//!
//! Caller input is never rejected: a null pointer reads as empty text and
//! invalid UTF-8 is replaced lossily. Output strings lose interior NULs.

use std::borrow::Cow;
use std::ffi::{CStr, CString, c_char};

/// Read caller text from a possibly-null C string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer valid for the
/// duration of the returned borrow.
pub unsafe fn text_arg<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        return Cow::Borrowed("");
    }
    // SAFETY: non-null and NUL-terminated per the caller contract
    let bytes = unsafe { CStr::from_ptr(ptr) };
    bytes.to_string_lossy()
}

/// Convert engine text into a C string, dropping interior NULs
pub fn into_c_string(text: String) -> CString {
    match CString::new(text) {
        Ok(s) => s,
        Err(e) => {
            let mut bytes = e.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    }
}
