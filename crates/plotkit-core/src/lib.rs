//! # PlotKit Core
//!
//! Core types, traits, and utilities shared across PlotKit crates:
//! the unified error taxonomy, measurement units, the canvas/machine
//! coordinate transform, and the G-code command representation.

pub mod error;
pub mod gcode;
pub mod machine;
pub mod units;

pub use error::{ConfigError, DeviceError, Error, GeometryError, Result};
pub use gcode::{CommandClass, GcodeCommand};
pub use machine::{CanvasTransform, ControllerFlavor};
pub use units::Units;
