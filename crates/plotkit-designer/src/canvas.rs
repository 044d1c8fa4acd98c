//! Canvas shape store and editor state.
//!
//! The store owns every shape on the canvas as an id-keyed record.
//! Editing operations never mutate records in place: each produces a
//! [`ShapeDiff`] (records removed, records added) which is applied
//! atomically, with a full snapshot pushed to the undo ring first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fillet::{chamfer, fillet};
use crate::history::HistoryRing;
use crate::mirror_rotate::{mirror_shape, rotate_shape};
use crate::shapes::{Line, Point, Shape, Stroke};
use crate::trim::{extend, trim, trim_mid};
use plotkit_core::{GeometryError, Result};

/// Identifier for a shape record, unique within a store's lifetime.
pub type ShapeId = u64;

/// Identifier tying freehand stroke segments into one chain.
pub type GroupId = u64;

/// Length of one arm of the center-marker cross, in screen units.
const MARKER_ARM_SCREEN: f64 = 3.0;

/// What a shape record is for.
///
/// Only `Standard` shapes participate in editing operations and
/// G-code output; markers and grid lines are display furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Standard,
    Marker,
    Grid,
}

/// One shape on the canvas with its styling and bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub shape: Shape,
    pub stroke: Stroke,
    /// Set for freehand stroke segments belonging to one gesture.
    pub group_id: Option<GroupId>,
    pub role: Role,
}

/// The outcome of an editing operation: records to remove and records
/// to add, applied as one atomic step.
#[derive(Debug, Clone, Default)]
pub struct ShapeDiff {
    pub removed: Vec<ShapeId>,
    pub added: Vec<ShapeRecord>,
}

impl ShapeDiff {
    /// Ids of the added records, in insertion order.
    pub fn added_ids(&self) -> Vec<ShapeId> {
        self.added.iter().map(|r| r.id).collect()
    }
}

/// Id-keyed container for everything on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeStore {
    records: Vec<ShapeRecord>,
    next_id: ShapeId,
    next_group: GroupId,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ShapeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reserves a fresh group id for a freehand gesture.
    pub fn allocate_group(&mut self) -> GroupId {
        let id = self.next_group;
        self.next_group += 1;
        id
    }

    /// Adds a standard shape and returns its id.
    pub fn add(&mut self, shape: Shape, stroke: Stroke) -> ShapeId {
        self.add_record(shape, stroke, None, Role::Standard)
    }

    pub fn add_record(
        &mut self,
        shape: Shape,
        stroke: Stroke,
        group_id: Option<GroupId>,
        role: Role,
    ) -> ShapeId {
        let id = self.allocate_id();
        self.records.push(ShapeRecord {
            id,
            shape,
            stroke,
            group_id,
            role,
        });
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records in z-order (insertion order).
    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    /// Standard-role records only, in z-order.
    pub fn standard_records(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.records.iter().filter(|r| r.role == Role::Standard)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<ShapeRecord> {
        let idx = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Fetches a record and requires it to be a standard line.
    fn line(&self, id: ShapeId) -> Result<(Line, Stroke)> {
        let record = self
            .get(id)
            .ok_or(GeometryError::UnknownShape { id })?;
        if record.role != Role::Standard {
            return Err(GeometryError::InvalidSelection {
                reason: format!("shape {id} is not editable"),
            }
            .into());
        }
        match &record.shape {
            Shape::Line(l) => Ok((*l, record.stroke.clone())),
            other => Err(GeometryError::InvalidSelection {
                reason: format!(
                    "shape {id} is a {:?}, this operation needs a line",
                    other.shape_type()
                ),
            }
            .into()),
        }
    }

    /// Builds a record with a fresh id without inserting it; used by
    /// diff construction so added records carry final ids.
    fn staged(
        &mut self,
        shape: Shape,
        stroke: Stroke,
        group_id: Option<GroupId>,
        role: Role,
    ) -> ShapeRecord {
        ShapeRecord {
            id: self.allocate_id(),
            shape,
            stroke,
            group_id,
            role,
        }
    }

    /// Applies a diff atomically: all removals, then all additions.
    pub fn apply(&mut self, diff: &ShapeDiff) {
        self.records.retain(|r| !diff.removed.contains(&r.id));
        self.records.extend(diff.added.iter().cloned());
        debug!(
            removed = diff.removed.len(),
            added = diff.added.len(),
            total = self.records.len(),
            "shape diff applied"
        );
    }
}

/// The tool currently armed in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Select,
    DrawLine,
    DrawRectangle,
    DrawCircle,
    DrawArc,
    Freehand,
    Fillet,
    Chamfer,
    Trim,
    TrimMid,
    Extend,
    Mirror,
    Rotate,
    LiveCarve,
}

/// Editor session state: the shape store, the undo ring, the armed
/// tool, and the current view scale.
///
/// Tool dimensions entered in screen units (fillet radius, marker
/// size) are divided by `view_scale` to land in canvas units.
#[derive(Debug)]
pub struct EditorState {
    pub store: ShapeStore,
    pub history: HistoryRing<ShapeStore>,
    pub active_tool: ActiveTool,
    pub view_scale: f64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            store: ShapeStore::new(),
            history: HistoryRing::default(),
            active_tool: ActiveTool::default(),
            view_scale: 1.0,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the store and applies the diff.
    fn commit(&mut self, diff: ShapeDiff) -> ShapeDiff {
        self.history.push(self.store.clone());
        self.store.apply(&diff);
        diff
    }

    /// Restores the previous snapshot, if any.
    pub fn undo(&mut self) -> bool {
        if let Some(prev) = self.history.undo(self.store.clone()) {
            self.store = prev;
            true
        } else {
            false
        }
    }

    /// Reapplies an undone step, if any.
    pub fn redo(&mut self) -> bool {
        if let Some(next) = self.history.redo(self.store.clone()) {
            self.store = next;
            true
        } else {
            false
        }
    }

    /// Adds a shape through the history mechanism.
    pub fn add_shape(&mut self, shape: Shape, stroke: Stroke) -> ShapeId {
        let record = self.store.staged(shape, stroke, None, Role::Standard);
        let id = record.id;
        self.commit(ShapeDiff {
            removed: Vec::new(),
            added: vec![record],
        });
        id
    }

    /// Deletes shapes through the history mechanism.
    pub fn delete_shapes(&mut self, ids: &[ShapeId]) -> ShapeDiff {
        self.commit(ShapeDiff {
            removed: ids.to_vec(),
            added: Vec::new(),
        })
    }

    /// Fillets the corner between two line shapes.
    ///
    /// `radius_screen` is in screen units and is converted to canvas
    /// units by the view scale. The two lines are replaced by their
    /// trimmed counterparts plus the tangent arc, and a small marker
    /// cross is dropped at the arc center.
    pub fn fillet_corner(
        &mut self,
        id_a: ShapeId,
        id_b: ShapeId,
        radius_screen: f64,
    ) -> Result<ShapeDiff> {
        let (la, stroke_a) = self.store.line(id_a)?;
        let (lb, stroke_b) = self.store.line(id_b)?;
        let radius = radius_screen / self.view_scale;
        let result = fillet(&la, &lb, radius)?;

        let mut added = vec![
            self.store
                .staged(Shape::Line(result.trimmed_a), stroke_a.clone(), None, Role::Standard),
            self.store
                .staged(Shape::Line(result.trimmed_b), stroke_b, None, Role::Standard),
            self.store
                .staged(Shape::Arc(result.arc), stroke_a, None, Role::Standard),
        ];
        added.extend(self.center_marker(result.arc.center));

        Ok(self.commit(ShapeDiff {
            removed: vec![id_a, id_b],
            added,
        }))
    }

    /// Chamfers the corner between two line shapes. The size is in
    /// screen units, like the fillet radius.
    pub fn chamfer_corner(
        &mut self,
        id_a: ShapeId,
        id_b: ShapeId,
        size_screen: f64,
    ) -> Result<ShapeDiff> {
        let (la, stroke_a) = self.store.line(id_a)?;
        let (lb, stroke_b) = self.store.line(id_b)?;
        let result = chamfer(&la, &lb, size_screen / self.view_scale)?;

        let added = vec![
            self.store
                .staged(Shape::Line(result.trimmed_a), stroke_a.clone(), None, Role::Standard),
            self.store
                .staged(Shape::Line(result.trimmed_b), stroke_b, None, Role::Standard),
            self.store
                .staged(Shape::Line(result.bevel), stroke_a, None, Role::Standard),
        ];

        Ok(self.commit(ShapeDiff {
            removed: vec![id_a, id_b],
            added,
        }))
    }

    /// Trims a line against a boundary line, keeping the clicked side.
    pub fn trim_line(
        &mut self,
        target_id: ShapeId,
        boundary_id: ShapeId,
        click: Point,
    ) -> Result<ShapeDiff> {
        let (target, stroke) = self.store.line(target_id)?;
        let (boundary, _) = self.store.line(boundary_id)?;
        let kept = trim(&target, &boundary, &click)?;

        let added = vec![self
            .store
            .staged(Shape::Line(kept), stroke, None, Role::Standard)];
        Ok(self.commit(ShapeDiff {
            removed: vec![target_id],
            added,
        }))
    }

    /// Removes the middle of a line between two boundary lines.
    pub fn trim_mid_line(
        &mut self,
        target_id: ShapeId,
        boundary_a: ShapeId,
        boundary_b: ShapeId,
    ) -> Result<ShapeDiff> {
        let (target, stroke) = self.store.line(target_id)?;
        let (b1, _) = self.store.line(boundary_a)?;
        let (b2, _) = self.store.line(boundary_b)?;
        let (left, right) = trim_mid(&target, &b1, &b2)?;

        let added = vec![
            self.store
                .staged(Shape::Line(left), stroke.clone(), None, Role::Standard),
            self.store
                .staged(Shape::Line(right), stroke, None, Role::Standard),
        ];
        Ok(self.commit(ShapeDiff {
            removed: vec![target_id],
            added,
        }))
    }

    /// Extends the clicked endpoint of a line to the nearest forward
    /// intersection among the given boundary lines.
    pub fn extend_line(
        &mut self,
        target_id: ShapeId,
        boundary_ids: &[ShapeId],
        click: Point,
    ) -> Result<ShapeDiff> {
        let (target, stroke) = self.store.line(target_id)?;
        let boundaries: Vec<Line> = boundary_ids
            .iter()
            .filter(|&&id| id != target_id)
            .map(|&id| self.store.line(id).map(|(l, _)| l))
            .collect::<Result<_>>()?;
        let extended = extend(&target, &boundaries, &click)?;

        let added = vec![self
            .store
            .staged(Shape::Line(extended), stroke, None, Role::Standard)];
        Ok(self.commit(ShapeDiff {
            removed: vec![target_id],
            added,
        }))
    }

    /// Mirrors shapes across an axis line. With `keep_original` the
    /// mirrored copies are added alongside the sources; otherwise the
    /// sources are replaced.
    pub fn mirror_shapes(
        &mut self,
        ids: &[ShapeId],
        axis: &Line,
        keep_original: bool,
    ) -> Result<ShapeDiff> {
        let mut added = Vec::with_capacity(ids.len());
        for &id in ids {
            let record = self
                .store
                .get(id)
                .ok_or(GeometryError::UnknownShape { id })?
                .clone();
            let mirrored = mirror_shape(&record.shape, axis)?;
            added.push(
                self.store
                    .staged(mirrored, record.stroke, record.group_id, record.role),
            );
        }
        Ok(self.commit(ShapeDiff {
            removed: if keep_original { Vec::new() } else { ids.to_vec() },
            added,
        }))
    }

    /// Rotates shapes about a pivot, optionally snapping to 5 degrees.
    pub fn rotate_shapes(
        &mut self,
        ids: &[ShapeId],
        pivot: Point,
        angle_deg: f64,
        snap: bool,
    ) -> Result<ShapeDiff> {
        let mut added = Vec::with_capacity(ids.len());
        for &id in ids {
            let record = self
                .store
                .get(id)
                .ok_or(GeometryError::UnknownShape { id })?
                .clone();
            let rotated = rotate_shape(&record.shape, &pivot, angle_deg, snap);
            added.push(
                self.store
                    .staged(rotated, record.stroke, record.group_id, record.role),
            );
        }
        Ok(self.commit(ShapeDiff {
            removed: ids.to_vec(),
            added,
        }))
    }

    /// Two short crossed marker lines at a point of interest.
    fn center_marker(&mut self, center: Point) -> Vec<ShapeRecord> {
        let arm = MARKER_ARM_SCREEN / self.view_scale;
        let stroke = Stroke {
            width: 1.0,
            color: "#cc0000".to_string(),
        };
        let h = Line::new(
            Point::new(center.x - arm, center.y),
            Point::new(center.x + arm, center.y),
        );
        let v = Line::new(
            Point::new(center.x, center.y - arm),
            Point::new(center.x, center.y + arm),
        );
        vec![
            self.store
                .staged(Shape::Line(h), stroke.clone(), None, Role::Marker),
            self.store.staged(Shape::Line(v), stroke, None, Role::Marker),
        ]
    }
}
