//! G-code command representation shared between generation and streaming.

use serde::{Deserialize, Serialize};

/// Class of a G-code command.
///
/// The blocking sender applies a per-class settle delay after each
/// command; slow controllers need extra time after Z moves and laser
/// power changes. Buffered streaming ignores the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandClass {
    /// Modal setup (G90, G21, G17, ...)
    Setup,
    /// Rapid positioning move (G0)
    Rapid,
    /// Z-axis move (pen lift / plunge)
    ZMove,
    /// Laser or spindle on (M3)
    LaserOn,
    /// Laser or spindle off (M5)
    LaserOff,
    /// Drawing move at feed rate (G1 in XY)
    Draw,
}

/// A single G-code line with its command class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcodeCommand {
    /// The command text, without trailing newline.
    pub text: String,
    /// Command class for delay selection.
    pub class: CommandClass,
}

impl GcodeCommand {
    /// Creates a command from text and class.
    pub fn new(text: impl Into<String>, class: CommandClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

impl std::fmt::Display for GcodeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
