//! `Engine` implementation over libinstead
//!
//! The library keeps one interpreter per process and calls its extension hook
//! without any context pointer, so the pending extension and the boxed host
//! functions live in statics here. Host functions themselves reach their Rust
//! closure through a Lua upvalue.

use super::sys::{self, InsteadExt, ListNode, LuaState};
use crate::marshal::into_c_string;
use metaparser_core::{
    CommandOutput, Engine, Extension, ExtensionContext, HostFunction, STATUS_OK, Status,
};
use std::ffi::{CStr, c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, error, warn};

static ACQUIRED: AtomicBool = AtomicBool::new(false);
static PENDING_EXTENSION: Mutex<Option<Arc<dyn Extension>>> = Mutex::new(None);
static HOST_FUNCTIONS: Mutex<Vec<Box<HostFunction>>> = Mutex::new(Vec::new());
static EXT_HOOK: OnceLock<ExtHook> = OnceLock::new();

/// Heap-pinned `instead_ext` handed to the library once
struct ExtHook(*mut InsteadExt);

// SAFETY: the pointer is written once and only ever passed back to the library
unsafe impl Send for ExtHook {}
unsafe impl Sync for ExtHook {}

impl ExtHook {
    fn new() -> Self {
        let ext = Box::new(InsteadExt {
            list: ListNode {
                next: std::ptr::null_mut(),
                prev: std::ptr::null_mut(),
            },
            init: Some(extension_init),
            done: None,
            err: None,
            cmd: None,
        });
        Self(Box::into_raw(ext))
    }
}

/// Handle to the process-wide INSTEAD interpreter
pub struct InsteadEngine {
    _private: (),
}

impl InsteadEngine {
    /// Claim the interpreter. Returns `None` while another handle is alive.
    pub fn acquire() -> Option<Self> {
        ACQUIRED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { _private: () })
    }
}

impl Drop for InsteadEngine {
    fn drop(&mut self) {
        ACQUIRED.store(false, Ordering::SeqCst);
    }
}

unsafe extern "C" fn extension_init() -> c_int {
    let extension = PENDING_EXTENSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let Some(extension) = extension else {
        return STATUS_OK;
    };

    // SAFETY: the library runs extension hooks after creating its Lua state
    let state = unsafe { sys::instead_lua() };
    let mut ctx = InsteadContext { state };
    match panic::catch_unwind(AssertUnwindSafe(|| extension.init(&mut ctx))) {
        Ok(rc) => rc,
        Err(_) => {
            error!("Extension init panicked");
            -1
        }
    }
}

unsafe extern "C" fn call_host_function(state: *mut LuaState) -> c_int {
    // SAFETY: the closure was created with the boxed function as its only upvalue
    let function = unsafe { sys::lua_touserdata(state, sys::lua_upvalueindex(1)) }
        as *const HostFunction;
    if function.is_null() {
        return 0;
    }
    // SAFETY: boxes in HOST_FUNCTIONS outlive the Lua state that references them
    let function = unsafe { &*function };
    let args = unsafe { script_args(state) };

    if panic::catch_unwind(AssertUnwindSafe(|| function(args.as_slice()))).is_err() {
        error!("Host function panicked");
    }
    0
}

/// Leading string arguments of the current call; stops at the first non-string
unsafe fn script_args(state: *mut LuaState) -> Vec<String> {
    let top = unsafe { sys::lua_gettop(state) };
    let mut args = Vec::new();
    for idx in 1..=top {
        let ptr = unsafe { sys::lua_tolstring(state, idx, std::ptr::null_mut()) };
        if ptr.is_null() {
            break;
        }
        args.push(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned());
    }
    args
}

/// Extension context backed by the live interpreter
struct InsteadContext {
    state: *mut LuaState,
}

impl ExtensionContext for InsteadContext {
    fn load_file(&mut self, path: &str) -> Status {
        let path_c = into_c_string(path.to_string());
        // SAFETY: NUL-terminated, the library copies what it needs
        let rc = unsafe { sys::instead_loadfile(path_c.as_ptr().cast_mut()) };
        debug!("instead_loadfile({}) -> {}", path, rc);
        rc
    }

    fn register_function(&mut self, name: &str, function: HostFunction) -> Status {
        if self.state.is_null() {
            warn!("No Lua state while registering {}", name);
            return -1;
        }
        let name_c = into_c_string(name.to_string());
        let boxed = Box::new(function);
        let ptr = &*boxed as *const HostFunction as *mut c_void;
        HOST_FUNCTIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(boxed);

        // SAFETY: valid state; the box stays put until instead_done
        unsafe {
            sys::lua_pushlightuserdata(self.state, ptr);
            sys::lua_pushcclosure(self.state, call_host_function, 1);
            sys::lua_setfield(self.state, sys::LUA_GLOBALSINDEX, name_c.as_ptr());
        }
        debug!("Registered host function {}", name);
        STATUS_OK
    }
}

impl Engine for InsteadEngine {
    fn register_extension(&mut self, extension: Arc<dyn Extension>) -> Status {
        *PENDING_EXTENSION
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(extension);

        let mut fresh = false;
        let hook = EXT_HOOK.get_or_init(|| {
            fresh = true;
            ExtHook::new()
        });
        if !fresh {
            // Hook already in the library's list; the new extension takes over
            return STATUS_OK;
        }
        // SAFETY: the hook is leaked and never freed
        unsafe { sys::instead_extension(hook.0) }
    }

    fn set_directory(&mut self, dir: &str) -> Status {
        let dir_c = into_c_string(dir.to_string());
        unsafe { sys::setdir(dir_c.as_ptr()) }
    }

    fn init(&mut self, game_dir: &str) -> Status {
        let game_c = into_c_string(game_dir.to_string());
        unsafe { sys::instead_init(game_c.as_ptr()) }
    }

    fn command(&mut self, cmd: &str) -> CommandOutput {
        let cmd_c = into_c_string(cmd.to_string());
        let mut rc: c_int = 0;
        // SAFETY: the library does not keep the command buffer
        let ptr = unsafe { sys::instead_cmd(cmd_c.as_ptr().cast_mut(), &mut rc) };
        if ptr.is_null() {
            return CommandOutput::new(None, rc);
        }
        // The response is malloc'd by the library and owned by us from here
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { libc::free(ptr as *mut c_void) };
        CommandOutput::new(Some(text), rc)
    }

    fn last_error(&self) -> Option<String> {
        let ptr: *const c_char = unsafe { sys::instead_err() };
        if ptr.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    fn load(&mut self) -> Status {
        unsafe { sys::instead_load(std::ptr::null_mut()) }
    }

    fn done(&mut self) {
        unsafe { sys::instead_done() };
        // Lua state is gone, nothing references the closures any more
        HOST_FUNCTIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
