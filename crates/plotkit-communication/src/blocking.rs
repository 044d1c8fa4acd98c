//! Blocking send with per-class settle delays.
//!
//! The simple protocol for slow or unbuffered controllers: write one
//! command, wait for its response, then sleep a class-specific delay
//! before the next command. Z moves and laser power changes get longer
//! settle times than plain draw moves.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::port::DevicePort;
use plotkit_core::{CommandClass, GcodeCommand, Result};

/// Settle delay after each command, selected by command class.
#[derive(Debug, Clone)]
pub struct CommandDelays {
    pub setup: Duration,
    pub rapid: Duration,
    pub z_move: Duration,
    pub laser: Duration,
    pub draw: Duration,
}

impl Default for CommandDelays {
    fn default() -> Self {
        Self {
            setup: Duration::from_millis(50),
            rapid: Duration::from_millis(20),
            z_move: Duration::from_millis(200),
            laser: Duration::from_millis(100),
            draw: Duration::from_millis(5),
        }
    }
}

impl CommandDelays {
    fn for_class(&self, class: CommandClass) -> Duration {
        match class {
            CommandClass::Setup => self.setup,
            CommandClass::Rapid => self.rapid,
            CommandClass::ZMove => self.z_move,
            CommandClass::LaserOn | CommandClass::LaserOff => self.laser,
            CommandClass::Draw => self.draw,
        }
    }
}

/// Sends commands one at a time, waiting for each response.
pub struct BlockingSender {
    delays: CommandDelays,
    read_timeout: Duration,
}

impl Default for BlockingSender {
    fn default() -> Self {
        Self {
            delays: CommandDelays::default(),
            read_timeout: Duration::from_secs(5),
        }
    }
}

impl BlockingSender {
    pub fn new(delays: CommandDelays, read_timeout: Duration) -> Self {
        Self {
            delays,
            read_timeout,
        }
    }

    /// Sends one command and waits for its response, then sleeps the
    /// class delay. A missing response is logged but not fatal; some
    /// controllers stay silent on modal commands.
    pub fn send(&self, port: &mut dyn DevicePort, command: &GcodeCommand) -> Result<()> {
        port.write_line(&command.text)?;
        match port.read_line(self.read_timeout)? {
            Some(response) => {
                debug!(command = %command.text, %response, "command acknowledged");
            }
            None => {
                warn!(command = %command.text, "no response before timeout");
            }
        }
        thread::sleep(self.delays.for_class(command.class));
        Ok(())
    }

    /// Sends a whole program sequentially.
    pub fn send_all(&self, port: &mut dyn DevicePort, commands: &[GcodeCommand]) -> Result<()> {
        for command in commands {
            self.send(port, command)?;
        }
        Ok(())
    }
}
