//! Async engine interactor
//!
//! Wraps the boundary adapter in the game-level operations a front end needs
//! (start, send input, save, load) and turns engine status codes into errors.
//! Engine calls block, so each one runs on tokio's blocking pool.

use crate::adapter::BoundaryAdapter;
use crate::layout::StorageLayout;
use async_trait::async_trait;
use metaparser_core::{BridgeConfig, Engine, MetaparserError, Result, STATUS_OK};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Game-level operations on the engine
#[async_trait]
pub trait EngineInteractor: Send + Sync {
    /// Register the extension, start the engine and load the game.
    /// Must be called before anything else.
    async fn init(&self) -> Result<()>;

    /// Finish working with the engine
    async fn done(&self) -> Result<()>;

    /// Resume from the autosave if there is one, otherwise start from the beginning
    async fn start_game(&self) -> Result<String>;

    /// Send player input to the parser
    async fn process_user_input(&self, text: &str) -> Result<String>;

    /// Save to the named slot, or to the autosave when the name is missing or blank
    async fn save_game(&self, name: Option<&str>) -> Result<String>;

    /// Load a named save
    async fn load_game(&self, name: &str) -> Result<String>;

    /// Whether the game asked for a restart during the last command
    async fn is_restart_from_game(&self) -> Result<bool>;

    /// Whether the game asked for the save menu during the last command
    async fn is_save_from_game(&self) -> Result<bool>;

    /// Whether the game asked for the load menu during the last command
    async fn is_load_from_game(&self) -> Result<bool>;

    /// Directory layout the engine runs in
    fn layout(&self) -> &StorageLayout;
}

/// Interactor driving a [`BoundaryAdapter`] on the blocking pool
pub struct MetaparserInteractor<E: Engine + Send + 'static> {
    adapter: Arc<Mutex<BoundaryAdapter<E>>>,
    layout: StorageLayout,
    command_prefix: String,
}

impl<E: Engine + Send + 'static> MetaparserInteractor<E> {
    pub fn new(engine: E, config: &BridgeConfig) -> Self {
        Self {
            adapter: Arc::new(Mutex::new(BoundaryAdapter::with_scripts(
                engine,
                config.scripts.clone(),
            ))),
            layout: StorageLayout::new(config),
            command_prefix: config.command_prefix.clone(),
        }
    }

    /// Run a closure against the adapter on the blocking pool
    async fn with_adapter<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut BoundaryAdapter<E>) -> Result<R> + Send + 'static,
    {
        let adapter = Arc::clone(&self.adapter);
        tokio::task::spawn_blocking(move || {
            let mut guard = adapter
                .lock()
                .map_err(|_| MetaparserError::Task("Engine adapter lock poisoned".into()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| MetaparserError::Task(format!("Engine task failed: {}", e)))?
    }

    /// Send a raw engine command; a missing response is an error
    async fn command(&self, text: String) -> Result<String> {
        self.with_adapter(move |adapter| {
            let output = adapter.submit_command(&text);
            match output.response {
                Some(response) => Ok(response),
                None => {
                    let err = adapter.fetch_last_error().unwrap_or_default();
                    error!("Command {:?} failed: {}", text, err);
                    Err(MetaparserError::Command(err))
                }
            }
        })
        .await
    }

    /// Save-relative name: saves live next to the game directory
    fn save_target(name: &str) -> String {
        format!("../{}", name)
    }
}

/// Player input is wrapped in quotes, so embedded quotes are dropped
pub fn sanitize_input(text: &str) -> String {
    text.replace('"', "")
}

#[async_trait]
impl<E: Engine + Send + 'static> EngineInteractor for MetaparserInteractor<E> {
    async fn init(&self) -> Result<()> {
        let dir = self.layout.root().to_string_lossy().into_owned();
        let game_dir = self.layout.game_dir().to_string_lossy().into_owned();

        self.with_adapter(move |adapter| {
            let rc = adapter.register_extension();
            if rc != STATUS_OK {
                return Err(MetaparserError::Extension(rc));
            }

            let rc = adapter.initialize(&dir, &game_dir);
            if rc != STATUS_OK {
                return Err(MetaparserError::Init(rc));
            }

            if adapter.load() != STATUS_OK {
                let err = adapter.fetch_last_error().unwrap_or_default();
                error!("Engine load failed: {}", err);
                return Err(MetaparserError::Load(err));
            }
            Ok(())
        })
        .await?;

        info!("instead init successful");
        Ok(())
    }

    async fn done(&self) -> Result<()> {
        self.with_adapter(|adapter| {
            adapter.shutdown();
            Ok(())
        })
        .await
    }

    async fn start_game(&self) -> Result<String> {
        if self.layout.has_autosave() {
            debug!("Resuming from autosave");
            self.command(format!(
                "load {}",
                Self::save_target(self.layout.autosave_name())
            ))
            .await
        } else {
            self.command("look".to_string()).await
        }
    }

    async fn process_user_input(&self, text: &str) -> Result<String> {
        self.command(format!(
            "{} \"{}\"",
            self.command_prefix,
            sanitize_input(text)
        ))
        .await
    }

    async fn save_game(&self, name: Option<&str>) -> Result<String> {
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.layout.autosave_name(),
        };
        self.command(format!("save {}", Self::save_target(name))).await
    }

    async fn load_game(&self, name: &str) -> Result<String> {
        self.command(format!("load {}", Self::save_target(name))).await
    }

    async fn is_restart_from_game(&self) -> Result<bool> {
        self.with_adapter(|adapter| Ok(adapter.poll_restart_flag())).await
    }

    async fn is_save_from_game(&self) -> Result<bool> {
        self.with_adapter(|adapter| Ok(adapter.poll_save_flag())).await
    }

    async fn is_load_from_game(&self) -> Result<bool> {
        self.with_adapter(|adapter| Ok(adapter.poll_load_flag())).await
    }

    fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}
