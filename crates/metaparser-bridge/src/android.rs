//! JNI exports for the Android front end
//!
//! The Kotlin side declares these as plain `external fun`s without a handle,
//! so the adapter lives in a process slot created on first use.

#![allow(non_snake_case)]

use crate::adapter::BoundaryAdapter;
use crate::ffi::InsteadEngine;
use crate::logging::init_logging;
use jni::JNIEnv;
use jni::objects::{JObject, JString};
use jni::sys::{jint, jstring};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

static ADAPTER: Mutex<Option<BoundaryAdapter<InsteadEngine>>> = Mutex::new(None);

fn with_adapter<R>(fallback: R, f: impl FnOnce(&mut BoundaryAdapter<InsteadEngine>) -> R) -> R {
    let mut slot = ADAPTER.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        init_logging();
        match InsteadEngine::acquire() {
            Some(engine) => {
                info!("Created JNI engine adapter");
                *slot = Some(BoundaryAdapter::new(engine));
            }
            None => {
                warn!("INSTEAD engine already owned outside the JNI slot");
                return fallback;
            }
        }
    }
    match slot.as_mut() {
        Some(adapter) => f(adapter),
        None => fallback,
    }
}

/// Null or undecodable strings read as empty text
fn java_text(env: &mut JNIEnv, text: &JString) -> String {
    if text.is_null() {
        return String::new();
    }
    env.get_string(text).map(String::from).unwrap_or_default()
}

fn java_string(env: &mut JNIEnv, text: Option<String>) -> jstring {
    let Some(text) = text else {
        return std::ptr::null_mut();
    };
    match env.new_string(text) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            warn!("Failed to create Java string: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_registerExtension<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    with_adapter(-1, |adapter| adapter.register_extension())
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_insteadInit<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    directory: JString<'local>,
    game_directory: JString<'local>,
) -> jint {
    let directory = java_text(&mut env, &directory);
    let game_directory = java_text(&mut env, &game_directory);
    with_adapter(-1, |adapter| adapter.initialize(&directory, &game_directory))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_insteadErr<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    // Kotlin declares a non-null String here
    let error = with_adapter(None, |adapter| adapter.fetch_last_error()).unwrap_or_default();
    java_string(&mut env, Some(error))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_insteadLoad<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    with_adapter(-1, |adapter| adapter.load())
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_insteadCommand<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    command: JString<'local>,
) -> jstring {
    let command = java_text(&mut env, &command);
    let response = with_adapter(None, |adapter| adapter.submit_command(&command).response);
    java_string(&mut env, response)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_insteadDone<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    with_adapter((), |adapter| adapter.shutdown());
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_isRestart<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    with_adapter(false, |adapter| adapter.poll_restart_flag()) as jint
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_isSave<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    with_adapter(false, |adapter| adapter.poll_save_flag()) as jint
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_emunix_metaparser_interactor_engine_MetaparserInteractor_isLoad<
    'local,
>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    with_adapter(false, |adapter| adapter.poll_load_flag()) as jint
}
