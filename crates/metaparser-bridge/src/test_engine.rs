//! In-process engine double for async tests
//!
//! Echoes commands back and fires the registered host functions for a few
//! magic inputs. Unlike the Lua double it is `Send`, so it can sit behind the
//! interactor's blocking pool.

use metaparser_core::{
    CommandOutput, Engine, Extension, ExtensionContext, HostFunction, STATUS_OK, Status,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static WORKING_DIR: Mutex<()> = Mutex::new(());

/// Holds the process working directory for one test and restores it on drop
pub struct WorkingDirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> Self {
        let lock = WORKING_DIR.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

/// Shared record of engine calls
#[derive(Clone, Default)]
pub struct EngineLog(Arc<Mutex<Vec<String>>>);

impl EngineLog {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Only the `command` calls, without the prefix
    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("command ").map(str::to_string))
            .collect()
    }
}

#[derive(Default)]
struct FunctionTable(HashMap<String, HostFunction>);

impl ExtensionContext for FunctionTable {
    fn load_file(&mut self, _path: &str) -> Status {
        STATUS_OK
    }

    fn register_function(&mut self, name: &str, function: HostFunction) -> Status {
        self.0.insert(name.to_string(), function);
        STATUS_OK
    }
}

pub struct EchoEngine {
    log: EngineLog,
    extension: Option<Arc<dyn Extension>>,
    functions: FunctionTable,
    error: Option<String>,
    extension_rc: Status,
    init_rc: Status,
    load_error: Option<String>,
    change_directory: bool,
}

impl EchoEngine {
    pub fn new(log: EngineLog) -> Self {
        Self {
            log,
            extension: None,
            functions: FunctionTable::default(),
            error: None,
            extension_rc: STATUS_OK,
            init_rc: STATUS_OK,
            load_error: None,
            change_directory: false,
        }
    }

    /// Follow libinstead: `set_directory` and `init` move the process working
    /// directory, `init` into the game directory
    pub fn change_directory(mut self) -> Self {
        self.change_directory = true;
        self
    }

    pub fn fail_extension(mut self, rc: Status) -> Self {
        self.extension_rc = rc;
        self
    }

    pub fn fail_init(mut self, rc: Status) -> Self {
        self.init_rc = rc;
        self
    }

    pub fn fail_load(mut self, error: &str) -> Self {
        self.load_error = Some(error.to_string());
        self
    }

    fn call(&self, name: &str, args: &[&str]) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        if let Some(function) = self.functions.0.get(name) {
            function(args.as_slice());
        }
    }
}

impl Engine for EchoEngine {
    fn register_extension(&mut self, extension: Arc<dyn Extension>) -> Status {
        self.log.push("register_extension".into());
        self.extension = Some(extension);
        self.extension_rc
    }

    fn set_directory(&mut self, dir: &str) -> Status {
        self.log.push(format!("set_directory {}", dir));
        if self.change_directory && std::env::set_current_dir(dir).is_err() {
            return -1;
        }
        STATUS_OK
    }

    fn init(&mut self, game_dir: &str) -> Status {
        self.log.push(format!("init {}", game_dir));
        if self.init_rc != STATUS_OK {
            return self.init_rc;
        }
        if self.change_directory && std::env::set_current_dir(game_dir).is_err() {
            return -2;
        }
        self.functions = FunctionTable::default();
        match self.extension.clone() {
            Some(extension) => extension.init(&mut self.functions),
            None => STATUS_OK,
        }
    }

    fn command(&mut self, cmd: &str) -> CommandOutput {
        self.log.push(format!("command {}", cmd));
        if cmd.contains("fail") {
            self.error = Some("no such command".into());
            return CommandOutput::new(None, 1);
        }
        if cmd.contains("restart") {
            self.call("instead_restart", &[]);
        } else if cmd.contains("menu save") {
            self.call("instead_menu", &["save"]);
        } else if cmd.contains("menu load") {
            self.call("instead_menu", &["load"]);
        }
        self.error = None;
        CommandOutput::new(Some(format!("echo: {}", cmd)), STATUS_OK)
    }

    fn last_error(&self) -> Option<String> {
        self.error.clone()
    }

    fn load(&mut self) -> Status {
        self.log.push("load".into());
        match &self.load_error {
            Some(error) => {
                self.error = Some(error.clone());
                1
            }
            None => STATUS_OK,
        }
    }

    fn done(&mut self) {
        self.log.push("done".into());
    }
}
