//! Terminal bell as the sound device.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use survival_shooter::platform::{AudioSink, Sound};

/// Rings the bell when the player is hurt or the session ends.
/// Shots and kills stay silent.
pub struct TerminalBell {
    enabled: bool,
    pending: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: false,
        }
    }

    pub fn flush<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        if std::mem::take(&mut self.pending) {
            out.queue(Print('\x07'))?;
            out.flush()?;
        }
        Ok(())
    }
}

impl AudioSink for TerminalBell {
    fn play(&mut self, sound: Sound) {
        log::trace!("sound {sound:?}");
        match sound {
            Sound::PlayerHurt | Sound::GameOver | Sound::GameClear => {
                self.pending |= self.enabled;
            }
            Sound::Shot | Sound::EnemyDown => {}
        }
    }
}
