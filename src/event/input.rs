// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Terminal keyboard through crossterm.
//!
//! crossterm keeps the termios settings it found when raw mode was enabled
//! and puts them back on `disable_raw_mode`. It also decodes the arrow key
//! escape sequences (`ESC [ A` .. `ESC [ D`) for us.

use crate::{
    error::Result,
    event::{Key, KeyboardBackend},
};
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::Once;
use std::time::Duration;

static RESTORE_HOOK: Once = Once::new();

/// Convert a crossterm event to a Key. Releases and non-key events are
/// `Key::None`; Ctrl-C counts as Escape because raw mode swallows SIGINT.
pub fn key_from_event(e: &CEvent) -> Key {
    let CEvent::Key(key) = e else {
        return Key::None;
    };
    if key.kind == KeyEventKind::Release {
        return Key::None;
    }
    match key.code {
        CKeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Escape,
        CKeyCode::Up => Key::Up,
        CKeyCode::Down => Key::Down,
        CKeyCode::Left => Key::Left,
        CKeyCode::Right => Key::Right,
        CKeyCode::Esc => Key::Escape,
        CKeyCode::Enter => Key::Enter,
        CKeyCode::Char(' ') => Key::Space,
        CKeyCode::Char(c) => Key::Char(c),
        _ => Key::None,
    }
}

/// The process terminal.
#[derive(Debug, Default)]
pub struct CrosstermKeyboard;

impl CrosstermKeyboard {
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardBackend for CrosstermKeyboard {
    fn enable_raw_mode(&mut self) -> Result<()> {
        enable_raw_mode()?;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        disable_raw_mode()?;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    fn read_key(&mut self) -> Result<Key> {
        Ok(key_from_event(&event::read()?))
    }

    fn install_restore_hook(&mut self) {
        RESTORE_HOOK.call_once(|| {
            let prev = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = disable_raw_mode();
                prev(info);
            }));
        });
    }
}
