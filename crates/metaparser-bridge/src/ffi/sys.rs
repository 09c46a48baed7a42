//! Raw declarations for libinstead and the Lua 5.1 C API it embeds

use std::ffi::{c_char, c_int, c_void};

/// Opaque `lua_State`
#[repr(C)]
pub struct LuaState {
    _private: [u8; 0],
}

pub type LuaCFunction = unsafe extern "C" fn(state: *mut LuaState) -> c_int;

/// Intrusive list hook at the head of `struct instead_ext`
#[repr(C)]
pub struct ListNode {
    pub next: *mut ListNode,
    pub prev: *mut ListNode,
}

/// `struct instead_ext` from instead.h
#[repr(C)]
pub struct InsteadExt {
    pub list: ListNode,
    pub init: Option<unsafe extern "C" fn() -> c_int>,
    pub done: Option<unsafe extern "C" fn() -> c_int>,
    pub err: Option<unsafe extern "C" fn() -> c_int>,
    pub cmd: Option<unsafe extern "C" fn(cmd: *const c_char) -> c_int>,
}

/// Pseudo-index of the globals table in Lua 5.1
pub const LUA_GLOBALSINDEX: c_int = -10002;

/// `lua_upvalueindex(i)` from lua.h
pub const fn lua_upvalueindex(i: c_int) -> c_int {
    LUA_GLOBALSINDEX - i
}

#[link(name = "instead")]
unsafe extern "C" {
    pub fn instead_extension(ext: *mut InsteadExt) -> c_int;
    pub fn instead_init(path: *const c_char) -> c_int;
    pub fn instead_load(name: *mut c_char) -> c_int;
    pub fn instead_cmd(cmd: *mut c_char, rc: *mut c_int) -> *mut c_char;
    pub fn instead_err() -> *mut c_char;
    pub fn instead_done();
    pub fn instead_loadfile(path: *mut c_char) -> c_int;
    pub fn instead_lua() -> *mut LuaState;
    pub fn setdir(path: *const c_char) -> c_int;
}

#[link(name = "lua")]
unsafe extern "C" {
    pub fn lua_gettop(state: *mut LuaState) -> c_int;
    pub fn lua_tolstring(state: *mut LuaState, idx: c_int, len: *mut usize) -> *const c_char;
    pub fn lua_touserdata(state: *mut LuaState, idx: c_int) -> *mut c_void;
    pub fn lua_pushlightuserdata(state: *mut LuaState, p: *mut c_void);
    pub fn lua_pushcclosure(state: *mut LuaState, f: LuaCFunction, n: c_int);
    pub fn lua_setfield(state: *mut LuaState, idx: c_int, k: *const c_char);
}
