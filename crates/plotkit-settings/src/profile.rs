//! Machine profiles.
//!
//! A profile is the full device description: bed and canvas
//! dimensions, Z heights, feed rates, laser settings, controller
//! flavor, and the serial connection parameters. All fields carry
//! serde defaults so profiles written by older versions still load.

use serde::{Deserialize, Serialize};

use plotkit_core::{CanvasTransform, ConfigError, ControllerFlavor, Result, Units};

/// A named machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfile {
    /// Display name; also the storage key.
    pub name: String,

    /// Machine bed width in mm.
    pub bed_width: f64,
    /// Machine bed height in mm.
    pub bed_height: f64,
    /// Canvas width in px that maps onto the bed.
    pub canvas_width: f64,
    /// Canvas height in px that maps onto the bed.
    pub canvas_height: f64,

    /// Measurement units for G-code output.
    pub units: Units,

    /// Z height for travel moves.
    pub travel_height: f64,
    /// Z height while drawing.
    pub draw_height: f64,
    /// Emit Z lift/plunge sequencing.
    pub z_axis_enabled: bool,

    /// Feed rate for drawing moves, units/min.
    pub draw_feed: f64,
    /// Feed rate hint for travel; rapids usually ignore it.
    pub travel_feed: f64,

    /// Spindle power for M3.
    pub laser_power: u32,
    /// Emit M3/M5 laser sequencing.
    pub laser_enabled: bool,

    /// Controller command dialect.
    pub controller: ControllerFlavor,
    /// Maximum unacknowledged commands during streaming.
    pub stream_ceiling: usize,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Last used serial port, if any.
    pub port: Option<String>,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            bed_width: 400.0,
            bed_height: 300.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            units: Units::Mm,
            travel_height: 5.0,
            draw_height: 0.0,
            z_axis_enabled: false,
            draw_feed: 1000.0,
            travel_feed: 3000.0,
            laser_power: 300,
            laser_enabled: true,
            controller: ControllerFlavor::Grbl,
            stream_ceiling: 8,
            baud_rate: 115_200,
            port: None,
        }
    }
}

impl MachineProfile {
    /// The canvas/machine transform this profile describes.
    pub fn transform(&self) -> CanvasTransform {
        CanvasTransform::new(
            self.canvas_width,
            self.canvas_height,
            self.bed_width,
            self.bed_height,
        )
    }

    /// Rejects profiles that would produce degenerate transforms or an
    /// unusable stream.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidProfile {
                reason: "profile name is empty".to_string(),
            }
            .into());
        }
        for (label, value) in [
            ("bed_width", self.bed_width),
            ("bed_height", self.bed_height),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidProfile {
                    reason: format!("{label} must be positive, got {value}"),
                }
                .into());
            }
        }
        if self.draw_feed <= 0.0 {
            return Err(ConfigError::InvalidProfile {
                reason: format!("draw_feed must be positive, got {}", self.draw_feed),
            }
            .into());
        }
        if self.stream_ceiling == 0 {
            return Err(ConfigError::InvalidProfile {
                reason: "stream_ceiling must be at least 1".to_string(),
            }
            .into());
        }
        if self.z_axis_enabled && self.travel_height <= self.draw_height {
            return Err(ConfigError::InvalidProfile {
                reason: format!(
                    "travel_height ({}) must sit above draw_height ({})",
                    self.travel_height, self.draw_height
                ),
            }
            .into());
        }
        Ok(())
    }
}
