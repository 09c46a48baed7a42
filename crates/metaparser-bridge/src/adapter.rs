//! Boundary adapter between a caller and the engine
//!
//! Every entry point forwards to the engine and hands its status back untouched.
//! The only state kept here is the set of request latches the extension raises.

use metaparser_core::{
    CommandOutput, Engine, GameFlags, MetaparserExtension, Status,
    extension::DEFAULT_SCRIPTS,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Adapter owning an engine and the latches its scripts raise
pub struct BoundaryAdapter<E: Engine> {
    engine: E,
    flags: Arc<GameFlags>,
    scripts: Vec<String>,
}

impl<E: Engine> BoundaryAdapter<E> {
    /// Adapter loading the default extension scripts
    pub fn new(engine: E) -> Self {
        Self::with_scripts(engine, DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect())
    }

    /// Adapter loading a custom set of extension scripts
    pub fn with_scripts(engine: E, scripts: Vec<String>) -> Self {
        Self {
            engine,
            flags: Arc::new(GameFlags::new()),
            scripts,
        }
    }

    /// Register the Metaparser extension with the engine
    pub fn register_extension(&mut self) -> Status {
        let host = Arc::clone(&self.flags);
        let extension = MetaparserExtension::with_scripts(host, self.scripts.clone());
        let rc = self.engine.register_extension(Arc::new(extension));
        debug!("register_extension -> {}", rc);
        rc
    }

    /// Set the working directory and start the engine against the game directory
    pub fn initialize(&mut self, working_dir: &str, game_dir: &str) -> Status {
        info!("Initializing engine: dir={:?} game={:?}", working_dir, game_dir);
        let rc = self.engine.set_directory(working_dir);
        if rc != 0 {
            warn!("setdir({:?}) returned {}", working_dir, rc);
        }
        // Requests from a previous run must not leak into the new one
        self.flags.clear();
        let rc = self.engine.init(game_dir);
        debug!("instead_init -> {}", rc);
        rc
    }

    /// Forward a command and return the engine's response and status
    pub fn submit_command(&mut self, command: &str) -> CommandOutput {
        let output = self.engine.command(command);
        debug!(
            "[Caller→Engine] cmd={:?} rc={} response_len={:?}",
            command,
            output.status,
            output.response.as_ref().map(String::len)
        );
        output
    }

    /// Current engine error text, if any
    pub fn fetch_last_error(&self) -> Option<String> {
        self.engine.last_error()
    }

    pub fn load(&mut self) -> Status {
        let rc = self.engine.load();
        debug!("instead_load -> {}", rc);
        rc
    }

    pub fn shutdown(&mut self) {
        info!("Shutting engine down");
        self.engine.done();
    }

    /// Whether a script requested a restart since the last poll
    pub fn poll_restart_flag(&self) -> bool {
        self.flags.take_restart()
    }

    /// Whether a script requested the save menu since the last poll
    pub fn poll_save_flag(&self) -> bool {
        self.flags.take_save()
    }

    /// Whether a script requested the load menu since the last poll
    pub fn poll_load_flag(&self) -> bool {
        self.flags.take_load()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_engine::{ScriptedEngine, write_fixture};

    fn started_adapter(dir: &tempfile::TempDir) -> BoundaryAdapter<ScriptedEngine> {
        let mut adapter = BoundaryAdapter::new(ScriptedEngine::new());
        assert_eq!(adapter.register_extension(), 0);
        let root = dir.path().to_str().unwrap();
        let game = dir.path().join("game");
        assert_eq!(adapter.initialize(root, game.to_str().unwrap()), 0);
        assert_eq!(adapter.load(), 0);
        adapter
    }

    #[test]
    fn test_command_passes_response_through() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        let output = adapter.submit_command("look");
        assert_eq!(output.status, 0);
        assert_eq!(output.response.as_deref(), Some("You see a small room."));
    }

    #[test]
    fn test_restart_flag_set_once_by_script() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.submit_command("restart");
        assert!(adapter.poll_restart_flag());
        assert!(!adapter.poll_restart_flag());
        assert!(!adapter.poll_save_flag());
        assert!(!adapter.poll_load_flag());
    }

    #[test]
    fn test_save_menu_sets_only_save_flag() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.submit_command("save");
        assert!(adapter.poll_save_flag());
        assert!(!adapter.poll_load_flag());
        assert!(!adapter.poll_save_flag());
    }

    #[test]
    fn test_load_menu_sets_only_load_flag() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.submit_command("load");
        assert!(adapter.poll_load_flag());
        assert!(!adapter.poll_save_flag());
        assert!(!adapter.poll_restart_flag());
    }

    #[test]
    fn test_polls_without_trigger_return_false() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.submit_command("look");
        for _ in 0..3 {
            assert!(!adapter.poll_restart_flag());
            assert!(!adapter.poll_save_flag());
            assert!(!adapter.poll_load_flag());
        }
    }

    #[test]
    fn test_each_trigger_latches_again() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.submit_command("restart");
        assert!(adapter.poll_restart_flag());
        adapter.submit_command("restart");
        assert!(adapter.poll_restart_flag());
        assert!(!adapter.poll_restart_flag());
    }

    #[test]
    fn test_script_error_surfaces_as_last_error() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);
        assert_eq!(adapter.fetch_last_error(), None);

        let output = adapter.submit_command("crash");
        assert!(output.response.is_none());
        assert_ne!(output.status, 0);
        let err = adapter.fetch_last_error().expect("error text");
        assert!(err.contains("boom"), "unexpected error: {}", err);
    }

    #[test]
    fn test_missing_extension_script_fails_init() {
        let dir = write_fixture();
        std::fs::remove_file(dir.path().join("stead/metaparser.lua")).unwrap();

        let mut adapter = BoundaryAdapter::new(ScriptedEngine::new());
        adapter.register_extension();
        let root = dir.path().to_str().unwrap();
        let game = dir.path().join("game");
        assert_ne!(adapter.initialize(root, game.to_str().unwrap()), 0);
        assert!(adapter.fetch_last_error().is_some());
    }

    #[test]
    fn test_empty_command_is_forwarded() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        let output = adapter.submit_command("");
        assert_eq!(output.status, 0);
        assert_eq!(output.response.as_deref(), Some(""));
    }

    #[test]
    fn test_shutdown_reaches_engine() {
        let dir = write_fixture();
        let mut adapter = started_adapter(&dir);

        adapter.shutdown();
        assert!(!adapter.engine().is_running());
    }
}
