//! Measurement units.

use serde::{Deserialize, Serialize};

/// Linear units used by machine profiles and G-code output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (G21)
    #[default]
    Mm,
    /// Inches (G20)
    In,
}

impl Units {
    /// The G-code modal command selecting this unit system.
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Mm => "G21",
            Units::In => "G20",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Mm => write!(f, "mm"),
            Units::In => write!(f, "in"),
        }
    }
}
