//! Live carving: pointer gestures driven straight to the device.
//!
//! The session is a small state machine. Arming sends the modal setup
//! and makes sure the laser is off; each pointer-down rapids to the
//! pointer position, plunges if the machine has a Z axis, and fires
//! the laser; pointer-moves become feed moves at the carve feed rate;
//! pointer-up shuts the laser off, raises the head, and hands the
//! finished stroke back so the caller can insert it on the canvas.

use tracing::{debug, info};

use crate::port::DevicePort;
use plotkit_core::{CanvasTransform, DeviceError, Result};

/// Where a live-carve session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveState {
    /// Created, nothing sent yet.
    Idle,
    /// Setup sent, laser off, waiting for a pointer-down.
    Armed,
    /// Laser on, pointer moves are being carved.
    Drawing,
    /// Session finished; no further commands accepted.
    Closed,
}

impl CarveState {
    fn name(self) -> &'static str {
        match self {
            CarveState::Idle => "idle",
            CarveState::Armed => "armed",
            CarveState::Drawing => "drawing",
            CarveState::Closed => "closed",
        }
    }
}

/// Parameters for a live-carve session.
#[derive(Debug, Clone)]
pub struct CarveParams {
    pub transform: CanvasTransform,
    /// Feed rate for carving moves, mm/min.
    pub feed: f64,
    /// Laser power for M3.
    pub power: u32,
    /// Emit Z lift/plunge around each stroke.
    pub z_axis_enabled: bool,
    /// Z height between strokes.
    pub travel_height: f64,
    /// Z height while carving.
    pub draw_height: f64,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            transform: CanvasTransform::default(),
            feed: 800.0,
            power: 300,
            z_axis_enabled: false,
            travel_height: 5.0,
            draw_height: 0.0,
        }
    }
}

/// A carved stroke in canvas coordinates.
pub type CarvedStroke = Vec<(f64, f64)>;

/// A live-carve session over an exclusively borrowed port.
pub struct LiveCarve<'a> {
    port: &'a mut dyn DevicePort,
    params: CarveParams,
    state: CarveState,
    current: CarvedStroke,
}

impl<'a> LiveCarve<'a> {
    pub fn new(port: &'a mut dyn DevicePort, params: CarveParams) -> Self {
        Self {
            port,
            params,
            state: CarveState::Idle,
            current: Vec::new(),
        }
    }

    pub fn state(&self) -> CarveState {
        self.state
    }

    fn require(&self, expected: CarveState, to: CarveState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DeviceError::InvalidTransition {
                from: self.state.name(),
                to: to.name(),
            }
            .into())
        }
    }

    fn raise(&mut self) -> Result<()> {
        if self.params.z_axis_enabled {
            self.port
                .write_line(&format!("G0 Z{:.3}", self.params.travel_height))?;
        }
        Ok(())
    }

    /// Sends modal setup and ensures the laser is off and the head is
    /// raised.
    pub fn arm(&mut self) -> Result<()> {
        self.require(CarveState::Idle, CarveState::Armed)?;
        self.port.write_line("G21")?;
        self.port.write_line("G90")?;
        self.port.write_line("M5")?;
        self.raise()?;
        self.state = CarveState::Armed;
        info!("live carve armed");
        Ok(())
    }

    /// Rapids to the pointer position, plunges, and fires the laser.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<()> {
        self.require(CarveState::Armed, CarveState::Drawing)?;
        let (mx, my) = self.params.transform.to_machine(x, y);
        self.port.write_line(&format!("G0 X{mx:.3} Y{my:.3}"))?;
        if self.params.z_axis_enabled {
            self.port.write_line(&format!(
                "G1 Z{:.3} F{:.0}",
                self.params.draw_height, self.params.feed
            ))?;
        }
        self.port
            .write_line(&format!("M3 S{}", self.params.power))?;
        self.current = vec![(x, y)];
        self.state = CarveState::Drawing;
        debug!(x, y, "stroke started");
        Ok(())
    }

    /// Carves to the new pointer position.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<()> {
        self.require(CarveState::Drawing, CarveState::Drawing)?;
        let (mx, my) = self.params.transform.to_machine(x, y);
        self.port
            .write_line(&format!("G1 X{mx:.3} Y{my:.3} F{:.0}", self.params.feed))?;
        self.current.push((x, y));
        Ok(())
    }

    /// Ends the stroke: laser off, head raised, back to armed. Returns
    /// the carved stroke in canvas coordinates for the caller to add
    /// to the canvas.
    pub fn pointer_up(&mut self) -> Result<CarvedStroke> {
        self.require(CarveState::Drawing, CarveState::Armed)?;
        self.port.write_line("M5")?;
        self.raise()?;
        self.state = CarveState::Armed;
        let stroke = std::mem::take(&mut self.current);
        debug!(points = stroke.len(), "stroke ended");
        Ok(stroke)
    }

    /// Closes the session. A stroke in progress is terminated first
    /// and returned.
    pub fn close(mut self) -> Result<Option<CarvedStroke>> {
        let leftover = if self.state == CarveState::Drawing {
            self.port.write_line("M5")?;
            self.raise()?;
            Some(std::mem::take(&mut self.current))
        } else {
            None
        };
        self.state = CarveState::Closed;
        info!("live carve closed");
        Ok(leftover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockPort;
    use plotkit_core::Error;

    fn params() -> CarveParams {
        CarveParams {
            transform: CanvasTransform::new(100.0, 100.0, 100.0, 100.0),
            feed: 600.0,
            power: 250,
            ..CarveParams::default()
        }
    }

    #[test]
    fn full_gesture_produces_the_expected_command_sequence() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        carve.arm().unwrap();
        carve.pointer_down(10.0, 10.0).unwrap();
        carve.pointer_move(20.0, 10.0).unwrap();
        carve.pointer_move(20.0, 20.0).unwrap();
        let stroke = carve.pointer_up().unwrap();
        carve.close().unwrap();

        assert_eq!(stroke, vec![(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);

        let written = port.written();
        assert_eq!(written[..3], ["G21", "G90", "M5"]);
        // Canvas (10,10) on a square 100/100 mapping flips Y to 90.
        assert_eq!(written[3], "G0 X10.000 Y90.000");
        assert_eq!(written[4], "M3 S250");
        assert_eq!(written[5], "G1 X20.000 Y90.000 F600");
        assert_eq!(written[6], "G1 X20.000 Y80.000 F600");
        assert_eq!(written[7], "M5");
    }

    #[test]
    fn z_axis_brackets_each_stroke() {
        let mut port = MockPort::acking();
        let mut p = params();
        p.z_axis_enabled = true;
        let mut carve = LiveCarve::new(&mut port, p);
        carve.arm().unwrap();
        carve.pointer_down(0.0, 0.0).unwrap();
        carve.pointer_up().unwrap();

        let written = port.written();
        // Raise on arm, plunge after the rapid, raise after laser-off.
        assert_eq!(written[3], "G0 Z5.000");
        assert_eq!(written[5], "G1 Z0.000 F600");
        assert_eq!(written.last().map(String::as_str), Some("G0 Z5.000"));
    }

    #[test]
    fn moves_before_pointer_down_are_rejected() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        carve.arm().unwrap();
        let err = carve.pointer_move(5.0, 5.0).unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::InvalidTransition { from: "armed", .. })
        ));
    }

    #[test]
    fn drawing_requires_arming_first() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        assert!(carve.pointer_down(0.0, 0.0).is_err());
        assert_eq!(carve.state(), CarveState::Idle);
    }

    #[test]
    fn double_pointer_down_is_rejected() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        carve.arm().unwrap();
        carve.pointer_down(0.0, 0.0).unwrap();
        assert!(carve.pointer_down(1.0, 1.0).is_err());
    }

    #[test]
    fn close_mid_stroke_turns_the_laser_off_and_returns_the_stroke() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        carve.arm().unwrap();
        carve.pointer_down(0.0, 0.0).unwrap();
        let leftover = carve.close().unwrap();
        assert_eq!(leftover, Some(vec![(0.0, 0.0)]));
        assert_eq!(port.written().last().map(String::as_str), Some("M5"));
    }

    #[test]
    fn separate_gestures_become_separate_strokes() {
        let mut port = MockPort::acking();
        let mut carve = LiveCarve::new(&mut port, params());
        carve.arm().unwrap();
        carve.pointer_down(0.0, 0.0).unwrap();
        carve.pointer_move(5.0, 0.0).unwrap();
        let first = carve.pointer_up().unwrap();
        carve.pointer_down(50.0, 50.0).unwrap();
        carve.pointer_move(55.0, 50.0).unwrap();
        let second = carve.pointer_up().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_ne!(first, second);
    }
}
