//! Engine capability table
//!
//! The interpreter is an opaque collaborator. Everything the bridge needs from it
//! goes through [`Engine`]; everything the engine may call back into goes through
//! [`ExtensionContext`] while an [`Extension`] initialises.

use std::sync::Arc;

/// Integer status code as reported by the engine. Zero means success.
pub type Status = i32;

/// Status the engine reports on success
pub const STATUS_OK: Status = 0;

/// Result of a single engine command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Response text, `None` when the engine produced no buffer
    pub response: Option<String>,
    /// Engine status code for the command
    pub status: Status,
}

impl CommandOutput {
    pub fn new(response: Option<String>, status: Status) -> Self {
        Self { response, status }
    }
}

/// A host function callable from game scripts.
///
/// Arguments arrive as text, in call order. Scripts ignore the return value.
pub type HostFunction = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Engine operations available while an extension initialises
pub trait ExtensionContext {
    /// Load and run a script file, path relative to the working directory
    fn load_file(&mut self, path: &str) -> Status;

    /// Install a named function into the engine's global function table
    fn register_function(&mut self, name: &str, function: HostFunction) -> Status;
}

/// Hook the engine runs once its script state exists
pub trait Extension: Send + Sync {
    fn init(&self, ctx: &mut dyn ExtensionContext) -> Status;
}

/// Entry points of the wrapped interpreter
///
/// Implementations forward to the real engine and report its status codes
/// unchanged. None of the calls are reentrant.
pub trait Engine {
    /// Hand the engine an extension to run during `init`
    fn register_extension(&mut self, extension: Arc<dyn Extension>) -> Status;

    /// Change the process working directory the engine resolves paths against
    fn set_directory(&mut self, dir: &str) -> Status;

    /// Start the engine against a game directory
    fn init(&mut self, game_dir: &str) -> Status;

    /// Run one command and return the response with its status
    fn command(&mut self, cmd: &str) -> CommandOutput;

    /// Current engine error text, if any
    fn last_error(&self) -> Option<String>;

    /// Load the game (start or resume)
    fn load(&mut self) -> Status;

    /// Shut the engine down
    fn done(&mut self);
}
