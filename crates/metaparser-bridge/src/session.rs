//! Play-through driver
//!
//! Keeps the transcript and reacts to the requests scripts raise after each
//! turn: a restart is carried out here, menu requests are handed to the front end.

use crate::interactor::{EngineInteractor, sanitize_input};
use crate::layout::SaveSlot;
use crate::markup::Paragraph;
use metaparser_core::Result;
use tracing::{info, warn};

/// What the front end should do after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading input
    Continue,
    /// The game restarted; the transcript was reset
    Restarted,
    /// The game asked for the save menu
    ShowSaveMenu,
    /// The game asked for the load menu
    ShowLoadMenu,
}

/// Result of one turn
#[derive(Debug, Clone)]
pub struct Turn {
    pub paragraph: Paragraph,
    pub outcome: Outcome,
}

/// A running game with its transcript
pub struct GameSession<I: EngineInteractor> {
    interactor: I,
    history: Vec<Paragraph>,
    started: bool,
}

impl<I: EngineInteractor> GameSession<I> {
    pub fn new(interactor: I) -> Self {
        Self {
            interactor,
            history: Vec::new(),
            started: false,
        }
    }

    pub fn history(&self) -> &[Paragraph] {
        &self.history
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start the engine and show the opening text. Idempotent.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.interactor.init().await?;
        let response = self.interactor.start_game().await?;
        self.push("", &response);
        self.started = true;
        Ok(())
    }

    /// Send player input and report what the game asked for
    pub async fn send_text(&mut self, input: &str) -> Result<Turn> {
        let text = sanitize_input(input);
        let response = self.interactor.process_user_input(&text).await?;
        let paragraph = self.push(&format!("> {}", text), &response);

        // Drain every latch so a request never leaks into the next turn
        let restart = self.interactor.is_restart_from_game().await?;
        let save = self.interactor.is_save_from_game().await?;
        let load = self.interactor.is_load_from_game().await?;

        let outcome = if restart {
            self.restart().await?;
            Outcome::Restarted
        } else if save {
            Outcome::ShowSaveMenu
        } else if load {
            Outcome::ShowLoadMenu
        } else {
            Outcome::Continue
        };
        Ok(Turn { paragraph, outcome })
    }

    /// Save to a slot, or to the autosave when `name` is `None`
    pub async fn save_state(&mut self, name: Option<&str>) -> Result<()> {
        self.interactor.save_game(name).await?;
        if let Some(name) = name {
            info!("Game saved to {}", name);
        }
        Ok(())
    }

    /// Restart the engine and load a save
    pub async fn load_state(&mut self, name: &str) -> Result<()> {
        self.history.clear();
        self.interactor.done().await?;
        self.interactor.init().await?;
        let response = self.interactor.load_game(name).await?;
        info!("Game loaded from {}", name);
        self.push("", &response);
        Ok(())
    }

    /// Throw the autosave away and start over
    pub async fn restart(&mut self) -> Result<()> {
        if let Err(e) = self.interactor.layout().clear_autosave() {
            warn!("Restarting with stale autosave: {}", e);
        }
        self.history.clear();
        self.interactor.done().await?;
        self.interactor.init().await?;
        let response = self.interactor.start_game().await?;
        self.push("", &response);
        Ok(())
    }

    /// Numbered save slots with their timestamps
    pub fn save_slots(&self) -> Vec<SaveSlot> {
        self.interactor.layout().save_slots()
    }

    /// Autosave and stop the engine
    pub async fn finish(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        self.interactor.save_game(None).await?;
        self.interactor.done().await?;
        self.started = false;
        Ok(())
    }

    fn push(&mut self, command: &str, response: &str) -> Paragraph {
        let paragraph = Paragraph::new(command, response);
        self.history.push(paragraph.clone());
        paragraph
    }
}
