//! Request latches raised by game scripts
//!
//! A script asks the host UI to restart the game or to open the save/load menu.
//! The engine runs the script synchronously inside a command, so the request is
//! latched and the caller drains it right after the command returns.

use std::sync::atomic::{AtomicBool, Ordering};

/// A boolean that is set by a callback and cleared on the next read
#[derive(Debug, Default)]
pub struct Latch(AtomicBool);

impl Latch {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Raise the latch
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return the current value and reset it to false
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Menu a script may ask the host to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Save,
    Load,
}

impl MenuKind {
    /// Parse the argument scripts pass to `instead_menu`
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "save" => Some(MenuKind::Save),
            "load" => Some(MenuKind::Load),
            _ => None,
        }
    }
}

/// Restart / save / load latches owned by one adapter
#[derive(Debug, Default)]
pub struct GameFlags {
    restart: Latch,
    save: Latch,
    load: Latch,
}

impl GameFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_restart(&self) {
        self.restart.raise();
    }

    pub fn request_menu(&self, kind: MenuKind) {
        match kind {
            MenuKind::Save => self.save.raise(),
            MenuKind::Load => self.load.raise(),
        }
    }

    pub fn take_restart(&self) -> bool {
        self.restart.take()
    }

    pub fn take_save(&self) -> bool {
        self.save.take()
    }

    pub fn take_load(&self) -> bool {
        self.load.take()
    }

    /// Drop every pending request
    pub fn clear(&self) {
        self.restart.take();
        self.save.take();
        self.load.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_reads_true_once() {
        let latch = Latch::new();
        assert!(!latch.take());

        latch.raise();
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn test_double_raise_is_single_request() {
        let latch = Latch::new();
        latch.raise();
        latch.raise();
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn test_menu_kind_parse() {
        assert_eq!(MenuKind::parse("save"), Some(MenuKind::Save));
        assert_eq!(MenuKind::parse("load"), Some(MenuKind::Load));
        assert_eq!(MenuKind::parse("SAVE"), None);
        assert_eq!(MenuKind::parse(""), None);
    }

    #[test]
    fn test_flags_are_independent() {
        let flags = GameFlags::new();
        flags.request_menu(MenuKind::Save);

        assert!(!flags.take_restart());
        assert!(!flags.take_load());
        assert!(flags.take_save());
        assert!(!flags.take_save());
    }

    #[test]
    fn test_clear_drops_pending_requests() {
        let flags = GameFlags::new();
        flags.request_restart();
        flags.request_menu(MenuKind::Load);
        flags.clear();

        assert!(!flags.take_restart());
        assert!(!flags.take_load());
    }
}
