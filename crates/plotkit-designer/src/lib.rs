//! # PlotKit Designer
//!
//! The 2D drawing engine: canvas shapes, construction-geometry
//! operations (fillet, chamfer, trim, extend, mirror, rotate), the
//! id-keyed shape store with snapshot undo, and G-code program
//! synthesis from canvas contents.

pub mod canvas;
pub mod fillet;
pub mod gcode_gen;
pub mod history;
pub mod intersect;
pub mod mirror_rotate;
pub mod shapes;
pub mod trim;

pub use canvas::{ActiveTool, EditorState, Role, ShapeDiff, ShapeId, ShapeRecord, ShapeStore};
pub use fillet::{chamfer, fillet, ChamferResult, FilletResult};
pub use gcode_gen::{build_program, program_text, write_program, OutputParams, ProgramBuilder};
pub use history::HistoryRing;
pub use intersect::{intersect_lines, intersect_segments};
pub use mirror_rotate::{flip_horizontal, flip_vertical, mirror_shape, rotate_shape, snap_angle};
pub use shapes::{Arc, Circle, Line, Point, Polygon, Polyline, Rectangle, Shape, ShapeType, Stroke, Vec2};
pub use trim::{extend, trim, trim_mid};
