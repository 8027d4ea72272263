// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Context encapsulates the state of one drawing session: the surface,
//! the keyboard and the frame clock. Nothing here is global, two contexts
//! can live side by side.

#[cfg(term_input)]
use crate::event::CrosstermKeyboard;
#[cfg(term_input)]
use crate::render::surface::SurfaceSource;
use crate::{
    error::{FbglError, Result},
    event::{Key, Keyboard, KeyboardBackend},
    render::surface::Surface,
    util::FrameClock,
};
use log::info;

pub struct Context<B: KeyboardBackend> {
    pub surface: Surface,
    pub keyboard: Keyboard<B>,
    pub clock: FrameClock,
}

#[cfg(term_input)]
impl Context<CrosstermKeyboard> {
    /// Opens `source` and puts the terminal in raw mode.
    pub fn open(source: SurfaceSource, fps: u32) -> Result<Self> {
        let surface = Surface::open(source)?;
        let keyboard = Keyboard::init(CrosstermKeyboard::new())?;
        Ok(Self::new(surface, keyboard, fps))
    }
}

impl<B: KeyboardBackend> Context<B> {
    pub fn new(surface: Surface, keyboard: Keyboard<B>, fps: u32) -> Self {
        Self {
            surface,
            keyboard,
            clock: FrameClock::new(fps),
        }
    }

    /// Calls `frame` once per frame with the most recent key until Escape
    /// arrives, `frame` returns false, or input fails. The keyboard is
    /// restored and the surface closed on every way out.
    pub fn run<F>(&mut self, mut frame: F) -> Result<()>
    where
        F: FnMut(&mut Self, Key) -> bool,
    {
        info!(
            "run loop start, {}x{} @ {:?} per frame",
            self.surface.width(),
            self.surface.height(),
            self.clock.tick_rate()
        );
        let looped = self.run_frames(&mut frame);
        info!(
            "run loop end after {} frames, last fps {:.1}",
            self.clock.frames(),
            self.clock.fps()
        );
        let restored = self.keyboard.cleanup();
        let closed = match self.surface.close() {
            Err(FbglError::AlreadyClosed) => Ok(()),
            other => other,
        };
        looped.and(restored).and(closed)
    }

    fn run_frames<F>(&mut self, frame: &mut F) -> Result<()>
    where
        F: FnMut(&mut Self, Key) -> bool,
    {
        loop {
            self.keyboard.update()?;
            if self.keyboard.key_down(Key::Escape) {
                return Ok(());
            }
            let key = self.keyboard.last_key();
            if !frame(self, key) {
                return Ok(());
            }
            self.clock.wait_next_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScriptedKeyboard;
    use crate::render::surface::SurfaceSource;

    fn ctx(keys: Vec<Key>) -> Context<ScriptedKeyboard> {
        let s = Surface::open(SurfaceSource::Memory { width: 4, height: 4 }).unwrap();
        let kb = Keyboard::init(ScriptedKeyboard::new(keys)).unwrap();
        Context::new(s, kb, 1000)
    }

    #[test]
    fn test_run_stops_on_escape() {
        let mut c = ctx(vec![Key::Escape]);
        let mut frames = 0;
        c.run(|_, _| {
            frames += 1;
            true
        })
        .unwrap();
        assert_eq!(frames, 0);
        assert!(!c.keyboard.is_raw());
        assert!(!c.surface.is_open());
    }

    #[test]
    fn test_run_stops_when_closure_says_so() {
        let mut c = ctx(vec![Key::Right]);
        let mut seen = Vec::new();
        c.run(|ctx, key| {
            seen.push(key);
            ctx.surface.fill(1);
            seen.len() < 3
        })
        .unwrap();
        assert_eq!(seen, vec![Key::Right, Key::None, Key::None]);
        assert_eq!(c.clock.frames(), 2);
        assert_eq!(c.keyboard.backend().restores(), 1);
    }

    #[test]
    fn test_run_tolerates_closed_surface() {
        let mut c = ctx(vec![]);
        c.run(|ctx, _| {
            ctx.surface.close().unwrap();
            false
        })
        .unwrap();
        assert!(!c.keyboard.is_raw());
    }
}
