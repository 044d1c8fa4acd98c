//! Machine-space utilities shared by the designer and the device layer.
//!
//! Canvas space is pixel-based with the origin at the top-left and Y
//! pointing down; machine space is physical millimeters with the origin
//! at the bottom-left and Y pointing up. The two are related by a
//! linear scale plus a Y flip.

use serde::{Deserialize, Serialize};

/// Controller command dialect.
///
/// Determines the position-query command and the shape of position
/// responses. The streaming protocol (`"ok"` acknowledgments) is the
/// same for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControllerFlavor {
    /// GRBL-style: `?` status query, `<...MPos:x,y,z...>` responses.
    #[default]
    Grbl,
    /// Marlin-style: `M114` query, `X:.. Y:.. Z:..` responses.
    Marlin,
}

impl std::fmt::Display for ControllerFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grbl => write!(f, "grbl"),
            Self::Marlin => write!(f, "marlin"),
        }
    }
}

/// Linear scale-and-flip transform between canvas and machine space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Machine bed width in mm.
    pub bed_width: f64,
    /// Machine bed height in mm.
    pub bed_height: f64,
}

impl Default for CanvasTransform {
    /// An 800x600 px canvas over a 400x300 mm bed.
    fn default() -> Self {
        Self::new(800.0, 600.0, 400.0, 300.0)
    }
}

impl CanvasTransform {
    /// Creates a transform for the given canvas and bed dimensions.
    pub fn new(canvas_width: f64, canvas_height: f64, bed_width: f64, bed_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            bed_width,
            bed_height,
        }
    }

    /// Canvas point (px, y-down) to machine point (mm, y-up).
    pub fn to_machine(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.bed_width / self.canvas_width,
            self.bed_height - y * self.bed_height / self.canvas_height,
        )
    }

    /// Machine point (mm, y-up) back to canvas point (px, y-down).
    pub fn to_canvas(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            mx * self.canvas_width / self.bed_width,
            (self.bed_height - my) * self.canvas_height / self.bed_height,
        )
    }
}
