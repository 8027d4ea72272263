// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Keyboard input.
//!
//! Keys come from a [`KeyboardBackend`]: the real terminal through crossterm
//! (input.rs, feature `crossterm`) or a [`ScriptedKeyboard`] fed by the
//! caller. [`Keyboard`] owns the backend, switches it to raw mode and
//! remembers which keys arrived during the last `update`.
//!
//! Polling never blocks: with nothing pending `poll` returns `Key::None`.

use crate::error::Result;
use log::{debug, info};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

#[cfg(term_input)]
mod input;
#[cfg(term_input)]
pub use input::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Key {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Space,
    Char(char),
}

/// Raw terminal operations, one layer below [`Keyboard`].
pub trait KeyboardBackend {
    /// Non-canonical, no echo. The previous mode is kept for restore.
    fn enable_raw_mode(&mut self) -> Result<()>;

    fn disable_raw_mode(&mut self) -> Result<()>;

    /// Is a key ready within `timeout`.
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Reads and decodes one pending event; unknown input is `Key::None`.
    fn read_key(&mut self) -> Result<Key>;

    /// Makes sure a panic leaves the terminal usable.
    fn install_restore_hook(&mut self) {}
}

/// Backend replaying a fixed list of keys, for tests and headless runs.
#[derive(Debug, Default)]
pub struct ScriptedKeyboard {
    keys: VecDeque<Key>,
    raw: bool,
    restores: usize,
}

impl ScriptedKeyboard {
    pub fn new<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// How many times raw mode was switched off.
    pub fn restores(&self) -> usize {
        self.restores
    }

    pub fn pending(&self) -> usize {
        self.keys.len()
    }
}

impl KeyboardBackend for ScriptedKeyboard {
    fn enable_raw_mode(&mut self) -> Result<()> {
        self.raw = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.raw = false;
        self.restores += 1;
        Ok(())
    }

    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.keys.is_empty())
    }

    fn read_key(&mut self) -> Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::None))
    }
}

pub struct Keyboard<B: KeyboardBackend> {
    backend: B,
    raw: bool,
    pressed: HashSet<Key>,
    last: Key,
}

impl<B: KeyboardBackend> Keyboard<B> {
    /// Wraps `backend` without touching the terminal mode.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            raw: false,
            pressed: HashSet::new(),
            last: Key::None,
        }
    }

    /// Switches the terminal to raw mode and installs the panic restore
    /// hook.
    pub fn init(backend: B) -> Result<Self> {
        let mut kb = Self::new(backend);
        kb.backend.install_restore_hook();
        kb.backend.enable_raw_mode()?;
        kb.raw = true;
        info!("keyboard raw mode on");
        Ok(kb)
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Next pending key or `Key::None`, never waits.
    pub fn poll(&mut self) -> Result<Key> {
        if self.backend.poll(Duration::ZERO)? {
            self.backend.read_key()
        } else {
            Ok(Key::None)
        }
    }

    /// True if the next pending key is Escape.
    pub fn check_escape(&mut self) -> Result<bool> {
        Ok(self.poll()? == Key::Escape)
    }

    /// Drains every pending key. Afterwards `key_down` answers for the keys
    /// read here and `last_key` is the most recent one.
    pub fn update(&mut self) -> Result<()> {
        self.pressed.clear();
        self.last = Key::None;
        loop {
            match self.poll()? {
                Key::None => {
                    if !self.backend.poll(Duration::ZERO)? {
                        break;
                    }
                }
                k => {
                    self.pressed.insert(k);
                    self.last = k;
                }
            }
        }
        if !self.pressed.is_empty() {
            debug!("keys {:?}", self.pressed);
        }
        Ok(())
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn last_key(&self) -> Key {
        self.last
    }

    /// Restores the terminal. Safe to call any number of times.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.raw {
            self.raw = false;
            self.pressed.clear();
            self.backend.disable_raw_mode()?;
            info!("keyboard raw mode off");
        }
        Ok(())
    }
}

impl<B: KeyboardBackend> Drop for Keyboard<B> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
