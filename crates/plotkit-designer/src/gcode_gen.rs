//! G-code program synthesis from canvas shapes.
//!
//! Every shape is flattened to a point chain, mapped into machine
//! space through the canvas transform (which flips Y), and emitted as
//! a rapid to the chain start followed by feed moves, bracketed by the
//! laser and Z sequencing the output parameters ask for. Freehand
//! stroke segments sharing a group id are stitched into one chain so
//! the laser is not cycled at every sampled segment.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, info};

use crate::canvas::{GroupId, ShapeRecord};
use crate::shapes::{Point, Shape, GEOM_EPSILON};
use plotkit_core::{CanvasTransform, CommandClass, Error, GcodeCommand, Result, Units};

/// Parameters controlling program synthesis.
#[derive(Debug, Clone)]
pub struct OutputParams {
    pub transform: CanvasTransform,
    pub units: Units,
    /// Feed rate for drawing moves, units/min.
    pub draw_feed: f64,
    /// Spindle power for M3, 0-1000 on typical GRBL scales.
    pub laser_power: u32,
    /// Emit M3/M5 laser sequencing.
    pub laser_enabled: bool,
    /// Emit Z lift/plunge sequencing (pen or drag-knife machines).
    pub z_axis_enabled: bool,
    /// Z height for travel moves.
    pub travel_height: f64,
    /// Z height while drawing.
    pub draw_height: f64,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            transform: CanvasTransform::default(),
            units: Units::default(),
            draw_feed: 1000.0,
            laser_power: 300,
            laser_enabled: true,
            z_axis_enabled: false,
            travel_height: 5.0,
            draw_height: 0.0,
        }
    }
}

/// Accumulates classified commands for one program.
#[derive(Debug)]
pub struct ProgramBuilder {
    params: OutputParams,
    commands: Vec<GcodeCommand>,
}

impl ProgramBuilder {
    pub fn new(params: OutputParams) -> Self {
        let mut builder = Self {
            params,
            commands: Vec::new(),
        };
        builder.emit_header();
        builder
    }

    fn push(&mut self, class: CommandClass, text: String) {
        self.commands.push(GcodeCommand::new(text, class));
    }

    fn emit_header(&mut self) {
        let units_comment = match self.params.units {
            Units::Mm => "millimeter units",
            Units::In => "inch units",
        };
        self.push(
            CommandClass::Setup,
            format!("{} ; {}", self.params.units.gcode(), units_comment),
        );
        self.push(CommandClass::Setup, "G90 ; absolute positioning".to_string());
        self.push(CommandClass::Setup, "G17 ; XY plane".to_string());
    }

    fn emit_footer(&mut self) {
        if self.params.laser_enabled {
            self.push(CommandClass::LaserOff, "M5 ; laser off".to_string());
        }
        if self.params.z_axis_enabled {
            self.push(
                CommandClass::ZMove,
                format!("G0 Z{:.3}", self.params.travel_height),
            );
        }
        self.push(CommandClass::Rapid, "G0 X0.000 Y0.000 ; return home".to_string());
        self.push(CommandClass::Setup, "M2 ; program end".to_string());
    }

    /// Emits the full move sequence for one point chain in canvas
    /// space. Chains shorter than two points are skipped.
    fn emit_chain(&mut self, points: &[Point], closed: bool) {
        if points.len() < 2 {
            return;
        }
        let machine: Vec<(f64, f64)> = points
            .iter()
            .map(|p| self.params.transform.to_machine(p.x, p.y))
            .collect();

        if self.params.laser_enabled {
            self.push(CommandClass::LaserOff, "M5".to_string());
        }
        if self.params.z_axis_enabled {
            self.push(
                CommandClass::ZMove,
                format!("G0 Z{:.3}", self.params.travel_height),
            );
        }

        let (sx, sy) = machine[0];
        self.push(CommandClass::Rapid, format!("G0 X{sx:.3} Y{sy:.3}"));

        if self.params.z_axis_enabled {
            self.push(
                CommandClass::ZMove,
                format!("G1 Z{:.3} F{:.0}", self.params.draw_height, self.params.draw_feed),
            );
        }
        if self.params.laser_enabled {
            self.push(
                CommandClass::LaserOn,
                format!("M3 S{}", self.params.laser_power),
            );
        }

        let mut first_draw = true;
        for &(x, y) in &machine[1..] {
            let mut text = String::new();
            let _ = write!(text, "G1 X{x:.3} Y{y:.3}");
            if first_draw {
                let _ = write!(text, " F{:.0}", self.params.draw_feed);
                first_draw = false;
            }
            self.push(CommandClass::Draw, text);
        }
        if closed {
            self.push(CommandClass::Draw, format!("G1 X{sx:.3} Y{sy:.3}"));
        }

        if self.params.laser_enabled {
            self.push(CommandClass::LaserOff, "M5".to_string());
        }
        if self.params.z_axis_enabled {
            self.push(
                CommandClass::ZMove,
                format!("G0 Z{:.3}", self.params.travel_height),
            );
        }
    }

    /// Emits one standalone shape.
    pub fn emit_shape(&mut self, shape: &Shape) {
        self.emit_chain(&shape.flatten(), shape.is_closed());
    }

    /// Emits a whole canvas worth of records.
    ///
    /// Standard-role records only; line records sharing a group id are
    /// stitched into single chains first.
    pub fn emit_records<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a ShapeRecord>,
    {
        let mut pending_group: Option<(GroupId, Vec<Point>)> = None;

        for record in records {
            match (record.group_id, &record.shape) {
                (Some(gid), Shape::Line(l)) => {
                    match &mut pending_group {
                        Some((current, chain)) if *current == gid => {
                            append_segment(chain, l.start, l.end);
                        }
                        _ => {
                            if let Some((_, chain)) = pending_group.take() {
                                self.emit_chain(&chain, false);
                            }
                            pending_group = Some((gid, vec![l.start, l.end]));
                        }
                    }
                }
                _ => {
                    if let Some((_, chain)) = pending_group.take() {
                        self.emit_chain(&chain, false);
                    }
                    self.emit_shape(&record.shape);
                }
            }
        }
        if let Some((_, chain)) = pending_group.take() {
            self.emit_chain(&chain, false);
        }
    }

    /// Finalizes the program and returns the classified command list.
    pub fn finish(mut self) -> Vec<GcodeCommand> {
        self.emit_footer();
        debug!(commands = self.commands.len(), "program assembled");
        self.commands
    }
}

/// Appends a segment to a chain, flipping it when its end sits nearer
/// the chain tip than its start (freehand samples arrive unordered in
/// direction, not in sequence).
fn append_segment(chain: &mut Vec<Point>, start: Point, end: Point) {
    let tip = match chain.last() {
        Some(p) => *p,
        None => {
            chain.push(start);
            chain.push(end);
            return;
        }
    };
    let (near, far) = if tip.distance_to(&end) < tip.distance_to(&start) {
        (end, start)
    } else {
        (start, end)
    };
    if tip.distance_to(&near) > GEOM_EPSILON {
        chain.push(near);
    }
    chain.push(far);
}

/// Builds the complete program for a set of records.
pub fn build_program<'a, I>(records: I, params: &OutputParams) -> Vec<GcodeCommand>
where
    I: IntoIterator<Item = &'a ShapeRecord>,
{
    let mut builder = ProgramBuilder::new(params.clone());
    builder.emit_records(records);
    builder.finish()
}

/// Renders a command list as program text, one command per line.
pub fn program_text(commands: &[GcodeCommand]) -> String {
    let mut text = String::new();
    for cmd in commands {
        text.push_str(&cmd.text);
        text.push('\n');
    }
    text
}

/// Writes a command list to a file as program text.
pub fn write_program(commands: &[GcodeCommand], path: &Path) -> Result<()> {
    std::fs::write(path, program_text(commands)).map_err(Error::Io)?;
    info!(path = %path.display(), commands = commands.len(), "program written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Role, ShapeStore};
    use crate::shapes::{Circle, Line, Rectangle, Stroke};

    fn params() -> OutputParams {
        OutputParams {
            transform: CanvasTransform::new(100.0, 100.0, 200.0, 200.0),
            ..OutputParams::default()
        }
    }

    fn texts(commands: &[GcodeCommand]) -> Vec<&str> {
        commands.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn header_and_footer_bracket_the_program() {
        let builder = ProgramBuilder::new(params());
        let cmds = builder.finish();
        let t = texts(&cmds);
        assert!(t[0].starts_with("G21"));
        assert!(t[1].starts_with("G90"));
        assert!(t[2].starts_with("G17"));
        assert!(t.last().unwrap().starts_with("M2"));
    }

    #[test]
    fn line_emits_rapid_then_laser_then_draw() {
        let mut builder = ProgramBuilder::new(params());
        builder.emit_shape(&Shape::Line(Line::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
        )));
        let cmds = builder.finish();
        let t = texts(&cmds);

        // Canvas (10,10) maps to machine (20,180) with the Y flip.
        let rapid = t.iter().position(|s| *s == "G0 X20.000 Y180.000").unwrap();
        let laser_on = t.iter().position(|s| s.starts_with("M3 S")).unwrap();
        let draw = t
            .iter()
            .position(|s| s.starts_with("G1 X100.000 Y180.000"))
            .unwrap();
        let laser_off_after = t[draw..].iter().position(|s| *s == "M5").unwrap();
        assert!(rapid < laser_on && laser_on < draw);
        assert!(laser_off_after > 0);
    }

    #[test]
    fn first_draw_move_carries_the_feed_rate() {
        let mut builder = ProgramBuilder::new(params());
        builder.emit_shape(&Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let cmds = builder.finish();
        let draw = cmds
            .iter()
            .find(|c| c.class == CommandClass::Draw)
            .unwrap();
        assert!(draw.text.ends_with("F1000"));
    }

    #[test]
    fn closed_shapes_return_to_their_start_point() {
        let mut builder = ProgramBuilder::new(params());
        builder.emit_shape(&Shape::Rectangle(Rectangle::new(10.0, 10.0, 20.0, 20.0)));
        let cmds = builder.finish();

        let draws: Vec<_> = cmds
            .iter()
            .filter(|c| c.class == CommandClass::Draw)
            .collect();
        // Four corners: three edges plus the closing edge.
        assert_eq!(draws.len(), 4);
        let rapid = cmds
            .iter()
            .find(|c| c.class == CommandClass::Rapid && c.text.contains('X'))
            .unwrap();
        let target = rapid.text.trim_start_matches("G0 ").to_string();
        assert!(draws.last().unwrap().text.contains(&target));
    }

    #[test]
    fn z_sequencing_wraps_each_chain_when_enabled() {
        let mut p = params();
        p.z_axis_enabled = true;
        p.laser_enabled = false;
        let mut builder = ProgramBuilder::new(p);
        builder.emit_shape(&Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let cmds = builder.finish();
        let t = texts(&cmds);

        let lift = t.iter().position(|s| s.starts_with("G0 Z5.000")).unwrap();
        let plunge = t.iter().position(|s| s.starts_with("G1 Z0.000")).unwrap();
        assert!(lift < plunge);
        assert!(!t.iter().any(|s| s.starts_with("M3")));
    }

    #[test]
    fn laser_disabled_emits_no_spindle_commands() {
        let mut p = params();
        p.laser_enabled = false;
        let mut builder = ProgramBuilder::new(p);
        builder.emit_shape(&Shape::Circle(Circle::round(Point::new(50.0, 50.0), 10.0)));
        let cmds = builder.finish();
        assert!(cmds.iter().all(|c| {
            c.class != CommandClass::LaserOn && c.class != CommandClass::LaserOff
        }));
    }

    #[test]
    fn grouped_freehand_segments_form_one_chain() {
        let mut store = ShapeStore::new();
        let gid = store.allocate_group();
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.5),
            Point::new(3.0, 1.0),
        ];
        for w in pts.windows(2) {
            store.add_record(
                Shape::Line(Line::new(w[0], w[1])),
                Stroke::default(),
                Some(gid),
                Role::Standard,
            );
        }

        let cmds = build_program(store.records().iter(), &params());
        // One chain: exactly one laser-on cycle.
        let ons = cmds
            .iter()
            .filter(|c| c.class == CommandClass::LaserOn)
            .count();
        assert_eq!(ons, 1);
        let draws = cmds
            .iter()
            .filter(|c| c.class == CommandClass::Draw)
            .count();
        assert_eq!(draws, 3);
    }

    #[test]
    fn reversed_segment_in_a_group_is_flipped_into_the_chain() {
        let mut chain = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        // Segment recorded end-first relative to the chain tip.
        append_segment(&mut chain, Point::new(2.0, 0.0), Point::new(1.0, 0.0));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2], Point::new(2.0, 0.0));
    }

    #[test]
    fn marker_records_are_not_emitted() {
        let mut store = ShapeStore::new();
        store.add_record(
            Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0))),
            Stroke::default(),
            None,
            Role::Marker,
        );
        let cmds = build_program(
            store.records().iter().filter(|r| r.role == Role::Standard),
            &params(),
        );
        assert!(cmds.iter().all(|c| c.class != CommandClass::Draw));
    }

    #[test]
    fn program_text_is_newline_terminated() {
        let cmds = ProgramBuilder::new(params()).finish();
        let text = program_text(&cmds);
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), cmds.len());
    }
}
