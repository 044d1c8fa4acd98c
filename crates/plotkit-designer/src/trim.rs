//! Trim and extend operations against boundary lines.

use crate::intersect::intersect_segments;
use crate::shapes::{Line, Point};
use plotkit_core::GeometryError;

/// How far an endpoint ray is extended when searching for a boundary.
pub const EXTEND_RAY_LENGTH: f64 = 10_000.0;

/// Parameter tolerance for "strictly inside the segment" tests.
const PARAM_EPSILON: f64 = 1e-9;

/// Trims a target line against one boundary line.
///
/// The target is cut at its intersection with the boundary; the side
/// of the cut containing the click point is kept (intersection to the
/// endpoint on the click side), the other side is discarded. The cut
/// must land on the boundary segment itself, not merely its carrier
/// line; trim, trim-mid, and extend all share this acceptance rule.
pub fn trim(target: &Line, boundary: &Line, click: &Point) -> Result<Line, GeometryError> {
    let ip = intersect_segments(target, boundary).ok_or(GeometryError::NoIntersection)?;
    let t_ip = target.project_param(&ip);
    if !(PARAM_EPSILON..=1.0 - PARAM_EPSILON).contains(&t_ip) {
        // Cut point outside the target segment leaves nothing to trim.
        return Err(GeometryError::NoIntersection);
    }

    let t_click = target.project_param(click);
    if t_click > t_ip {
        Ok(Line::new(ip, target.end))
    } else {
        Ok(Line::new(target.start, ip))
    }
}

/// Removes the middle of a crossing line between two boundary lines.
///
/// The crossing line must intersect both boundary segments at two
/// distinct points strictly inside the crossing segment (this is the
/// strict acceptance rule; see DESIGN.md). The two outer parts are
/// returned in original orientation: start to the first cut, second
/// cut to end.
pub fn trim_mid(target: &Line, b1: &Line, b2: &Line) -> Result<(Line, Line), GeometryError> {
    let p1 = intersect_segments(target, b1).ok_or(GeometryError::BoundaryMiss)?;
    let p2 = intersect_segments(target, b2).ok_or(GeometryError::BoundaryMiss)?;

    let t1 = target.project_param(&p1);
    let t2 = target.project_param(&p2);
    let interior = PARAM_EPSILON..=1.0 - PARAM_EPSILON;
    if !interior.contains(&t1) || !interior.contains(&t2) {
        return Err(GeometryError::BoundaryMiss);
    }
    if (t1 - t2).abs() < PARAM_EPSILON {
        return Err(GeometryError::BoundaryMiss);
    }

    let (first, second) = if t1 < t2 { (p1, p2) } else { (p2, p1) };
    Ok((
        Line::new(target.start, first),
        Line::new(second, target.end),
    ))
}

/// Extends the clicked endpoint of a target line to the nearest
/// forward boundary intersection.
///
/// The endpoint nearer the click is moved; the ray runs from that
/// endpoint away from the other endpoint, at most [`EXTEND_RAY_LENGTH`]
/// long. Only intersections ahead of the endpoint (positive dot with
/// the ray direction) that land on the boundary segment itself are
/// candidates; the nearest wins.
pub fn extend(
    target: &Line,
    boundaries: &[Line],
    click: &Point,
) -> Result<Line, GeometryError> {
    let from_start = click.distance_to(&target.start) <= click.distance_to(&target.end);
    let (moving, anchor) = if from_start {
        (target.start, target.end)
    } else {
        (target.end, target.start)
    };

    let dir = anchor
        .vector_to(&moving)
        .normalized()
        .ok_or_else(|| GeometryError::InvalidSelection {
            reason: "target line is degenerate".to_string(),
        })?;
    let ray = Line::new(moving, moving.offset(dir, EXTEND_RAY_LENGTH));

    let mut best: Option<(f64, Point)> = None;
    for boundary in boundaries {
        // Segment-restricted: the hit must lie on the search ray (which
        // caps the distance at EXTEND_RAY_LENGTH) and on the boundary
        // segment itself.
        let Some(ip) = intersect_segments(&ray, boundary) else {
            continue;
        };
        let ahead = moving.vector_to(&ip).dot(dir);
        if ahead <= PARAM_EPSILON {
            continue;
        }
        if best.map_or(true, |(d, _)| ahead < d) {
            best = Some((ahead, ip));
        }
    }

    let (_, ip) = best.ok_or(GeometryError::NoForwardIntersection)?;
    if from_start {
        Ok(Line::new(ip, target.end))
    } else {
        Ok(Line::new(target.start, ip))
    }
}
