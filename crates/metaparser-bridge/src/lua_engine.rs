//! Script-backed engine double
//!
//! Runs real Lua so extension scripts and host callbacks are exercised the way
//! the interpreter would run them: game scripts call `instead_restart()` and
//! `instead_menu(...)` from inside a command.

use metaparser_core::{
    CommandOutput, Engine, Extension, ExtensionContext, HostFunction, STATUS_OK, Status,
};
use mlua::{Function, Lua, Variadic};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TINY_LUA: &str = r#"
tiny = { version = 3 }
"#;

const METAPARSER_LUA: &str = r#"
metaparser = { prefix = "@metaparser" }
"#;

const MAIN_LUA: &str = r#"
function on_command(cmd)
    if cmd == "look" then
        return "You see a small room."
    elseif cmd == "restart" then
        instead_restart()
        return "Restarting..."
    elseif cmd == "save" then
        instead_menu("save")
        return ""
    elseif cmd == "load" then
        instead_menu("load")
        return ""
    elseif cmd == "crash" then
        error("boom")
    elseif cmd == "" then
        return ""
    end
    return "You said: " .. cmd
end
"#;

/// Lay out `stead/` and `game/` in a fresh temp directory
pub fn write_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("stead")).unwrap();
    std::fs::create_dir_all(dir.path().join("game")).unwrap();
    std::fs::write(dir.path().join("stead/tiny3.lua"), TINY_LUA).unwrap();
    std::fs::write(dir.path().join("stead/metaparser.lua"), METAPARSER_LUA).unwrap();
    std::fs::write(dir.path().join("game/main3.lua"), MAIN_LUA).unwrap();
    dir
}

/// Engine that runs `main3.lua` from the game directory in an embedded Lua
pub struct ScriptedEngine {
    lua: Option<Lua>,
    root: PathBuf,
    extension: Option<Arc<dyn Extension>>,
    error: Option<String>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            lua: None,
            root: PathBuf::from("."),
            extension: None,
            error: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lua.is_some()
    }
}

fn run_file(lua: &Lua, path: &Path, name: &str) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", name, e))?;
    lua.load(source)
        .set_name(name)
        .exec()
        .map_err(|e| e.to_string())
}

struct LuaContext<'a> {
    lua: &'a Lua,
    root: &'a Path,
    error: &'a mut Option<String>,
}

impl ExtensionContext for LuaContext<'_> {
    fn load_file(&mut self, path: &str) -> Status {
        match run_file(self.lua, &self.root.join(path), path) {
            Ok(()) => STATUS_OK,
            Err(e) => {
                *self.error = Some(e);
                1
            }
        }
    }

    fn register_function(&mut self, name: &str, function: HostFunction) -> Status {
        let installed = self
            .lua
            .create_function(move |_, args: Variadic<String>| {
                function(args.as_slice());
                Ok(())
            })
            .and_then(|f| self.lua.globals().set(name, f));
        match installed {
            Ok(()) => STATUS_OK,
            Err(e) => {
                *self.error = Some(e.to_string());
                1
            }
        }
    }
}

impl Engine for ScriptedEngine {
    fn register_extension(&mut self, extension: Arc<dyn Extension>) -> Status {
        self.extension = Some(extension);
        STATUS_OK
    }

    fn set_directory(&mut self, dir: &str) -> Status {
        self.root = PathBuf::from(dir);
        STATUS_OK
    }

    fn init(&mut self, game_dir: &str) -> Status {
        let lua = Lua::new();
        if let Some(extension) = self.extension.clone() {
            let mut ctx = LuaContext {
                lua: &lua,
                root: &self.root,
                error: &mut self.error,
            };
            let rc = extension.init(&mut ctx);
            if rc != STATUS_OK {
                return rc;
            }
        }
        if let Err(e) = run_file(&lua, &Path::new(game_dir).join("main3.lua"), "main3.lua") {
            self.error = Some(e);
            return 1;
        }
        self.lua = Some(lua);
        STATUS_OK
    }

    fn command(&mut self, cmd: &str) -> CommandOutput {
        let result = match &self.lua {
            Some(lua) => lua
                .globals()
                .get::<Function>("on_command")
                .and_then(|f| f.call::<String>(cmd))
                .map_err(|e| e.to_string()),
            None => Err("engine is not running".to_string()),
        };
        match result {
            Ok(text) => {
                self.error = None;
                CommandOutput::new(Some(text), STATUS_OK)
            }
            Err(e) => {
                self.error = Some(e);
                CommandOutput::new(None, 1)
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        self.error.clone()
    }

    fn load(&mut self) -> Status {
        if self.is_running() { STATUS_OK } else { 1 }
    }

    fn done(&mut self) {
        self.lua = None;
    }
}
