//! The Metaparser engine extension
//!
//! Loads the parser scripts on top of the stock library and installs the two
//! functions game scripts use to talk to the host UI.

use crate::engine::{Extension, ExtensionContext, HostFunction, STATUS_OK, Status};
use crate::flags::{GameFlags, MenuKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Script files loaded at extension init, relative to the working directory
pub const DEFAULT_SCRIPTS: [&str; 2] = ["stead/tiny3.lua", "stead/metaparser.lua"];

/// Script function that asks the host to restart the game
pub const RESTART_FUNCTION: &str = "instead_restart";

/// Script function that asks the host to open the save or load menu
pub const MENU_FUNCTION: &str = "instead_menu";

/// Host side of the script callbacks
pub trait HostCallbacks: Send + Sync {
    /// A script requested a restart
    fn restart(&self);

    /// A script requested a menu
    fn menu(&self, kind: MenuKind);
}

impl HostCallbacks for GameFlags {
    fn restart(&self) {
        self.request_restart();
    }

    fn menu(&self, kind: MenuKind) {
        self.request_menu(kind);
    }
}

/// Extension that loads the Metaparser scripts and wires the callbacks
pub struct MetaparserExtension {
    scripts: Vec<String>,
    host: Arc<dyn HostCallbacks>,
}

impl MetaparserExtension {
    /// Extension with the default script set
    pub fn new(host: Arc<dyn HostCallbacks>) -> Self {
        Self::with_scripts(host, DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect())
    }

    /// Extension loading a custom script set, in order
    pub fn with_scripts(host: Arc<dyn HostCallbacks>, scripts: Vec<String>) -> Self {
        Self { scripts, host }
    }

    fn restart_function(&self) -> HostFunction {
        let host = Arc::clone(&self.host);
        Arc::new(move |_args: &[String]| {
            debug!("script requested restart");
            host.restart();
        })
    }

    fn menu_function(&self) -> HostFunction {
        let host = Arc::clone(&self.host);
        Arc::new(move |args: &[String]| {
            let Some(arg) = args.first() else {
                warn!("Ignoring {}() without a menu name", MENU_FUNCTION);
                return;
            };
            match MenuKind::parse(arg) {
                Some(kind) => {
                    debug!("script requested {:?} menu", kind);
                    host.menu(kind);
                }
                None => warn!("Ignoring unknown menu request: {}", arg),
            }
        })
    }
}

impl Extension for MetaparserExtension {
    fn init(&self, ctx: &mut dyn ExtensionContext) -> Status {
        for script in &self.scripts {
            let rc = ctx.load_file(script);
            if rc != STATUS_OK {
                warn!("Failed to load {} (code {})", script, rc);
                return rc;
            }
        }

        let rc = ctx.register_function(RESTART_FUNCTION, self.restart_function());
        if rc != STATUS_OK {
            return rc;
        }
        ctx.register_function(MENU_FUNCTION, self.menu_function())
    }
}
