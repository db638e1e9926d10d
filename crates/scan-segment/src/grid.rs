//! Axis-aligned slab splitting.
//!
//! The segmentation grid is built by splitting along one axis at a time:
//! X slabs first, then Y slabs within each X slab, then Z slabs within
//! each XY slab. [`split_along_axis`] is a pure function of its inputs;
//! each slab is carved out of the remainder left by its predecessor, so
//! the slabs tile the mesh without overlap.

use nalgebra::{Point3, Vector3};
use scan_types::ScanMesh;

use crate::cut::{cut_mesh, cut_mesh_exclusive};

/// A coordinate axis of the segmentation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }

    /// The coordinate of a point along the axis.
    #[must_use]
    pub fn coord(self, point: &Point3<f64>) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
            Self::Z => point.z,
        }
    }

    /// A point on the plane perpendicular to the axis at `offset`.
    #[must_use]
    pub fn plane_point(self, offset: f64) -> Point3<f64> {
        match self {
            Self::X => Point3::new(offset, 0.0, 0.0),
            Self::Y => Point3::new(0.0, offset, 0.0),
            Self::Z => Point3::new(0.0, 0.0, offset),
        }
    }
}

/// Cut boundaries along one axis of the grid.
///
/// Boundaries run `min + step, min + 2·step, …` up to the first value at
/// or past `max`, so the last partial slab (narrower than `step`) is
/// captured rather than dropped. A flat range needs no cut at all.
///
/// `step` must be positive; the segmenter validates that before calling.
///
/// # Example
///
/// ```
/// use scan_segment::axis_boundaries;
///
/// let bounds = axis_boundaries(0.0, 1.0, 0.5);
/// assert_eq!(bounds, vec![0.5, 1.0]);
///
/// // A trailing partial slab still gets a boundary past max
/// let bounds = axis_boundaries(0.0, 1.1, 0.5);
/// assert_eq!(bounds, vec![0.5, 1.0, 1.5]);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
// An integer boundary count avoids while-float accumulation; counts stay
// far below precision limits for any real scan
pub fn axis_boundaries(min: f64, max: f64, step: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span < 0.0 {
        return Vec::new();
    }

    let count = (span / step).ceil() as usize;
    (1..=count)
        .map(|i| (i as f64).mul_add(step, min))
        .collect()
}

/// Split a mesh into ordered slabs along one axis.
///
/// Returns `boundaries.len() + 1` slabs: slab `i` holds the geometry
/// between boundary `i-1` (or the mesh minimum) and boundary `i`, and the
/// final slab holds whatever lies past the last boundary (empty when the
/// boundaries cover the mesh, as [`axis_boundaries`] guarantees).
///
/// Each boundary makes two opposite half-space cuts against the same
/// remaining mesh, and the kept remainder feeds the next boundary, so
/// geometry is never duplicated or re-derived from the original.
///
/// Boundaries must be in increasing order.
#[must_use]
pub fn split_along_axis(mesh: &ScanMesh, axis: Axis, boundaries: &[f64]) -> Vec<ScanMesh> {
    let mut slabs = Vec::with_capacity(boundaries.len() + 1);
    let mut remainder = mesh.clone();

    for &b in boundaries {
        let plane = axis.plane_point(b);
        // The slab keeps the boundary plane inclusively; the remainder is
        // strict, so geometry lying exactly in the plane lands in one slab
        let slab = cut_mesh(&remainder, plane, -axis.unit());
        let rest = cut_mesh_exclusive(&remainder, plane, axis.unit());
        slabs.push(slab);
        remainder = rest;
    }

    slabs.push(remainder);
    slabs
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::unit_cube;

    #[test]
    fn boundaries_cover_exact_multiples() {
        let b = axis_boundaries(0.0, 2.0, 0.5);
        assert_eq!(b, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn boundaries_capture_trailing_partial_slab() {
        let b = axis_boundaries(0.0, 2.2, 0.5);
        assert_eq!(b.len(), 5);
        assert!((b[4] - 2.5).abs() < 1e-12);
        assert!(b[4] >= 2.2);
    }

    #[test]
    fn boundaries_for_flat_range() {
        // A mesh flat along one axis needs no cuts: one slab covers it
        let b = axis_boundaries(1.0, 1.0, 0.5);
        assert!(b.is_empty());
    }

    #[test]
    fn split_cube_into_halves() {
        let cube = unit_cube();
        let slabs = split_along_axis(&cube, Axis::X, &[0.5, 1.0]);

        assert_eq!(slabs.len(), 3);
        assert!(!slabs[0].is_empty());
        assert!(!slabs[1].is_empty());
        assert!(slabs[2].is_empty());

        assert!(slabs[0].vertices.iter().all(|v| v.position.x <= 0.5 + 1e-12));
        assert!(slabs[1].vertices.iter().all(|v| v.position.x >= 0.5 - 1e-12));
    }

    #[test]
    fn slabs_are_ordered_along_the_axis() {
        let cube = unit_cube();
        let slabs = split_along_axis(&cube, Axis::Z, &axis_boundaries(0.0, 1.0, 0.25));

        let mut last_max = f64::NEG_INFINITY;
        for slab in slabs.iter().filter(|s| !s.is_empty()) {
            let bounds = slab.bounds();
            assert!(bounds.min.z >= last_max - 1e-9);
            last_max = bounds.max.z;
        }
    }

    #[test]
    fn axis_helpers() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((Axis::X.coord(&p) - 1.0).abs() < f64::EPSILON);
        assert!((Axis::Y.coord(&p) - 2.0).abs() < f64::EPSILON);
        assert!((Axis::Z.coord(&p) - 3.0).abs() < f64::EPSILON);
        assert!((Axis::Y.plane_point(5.0).y - 5.0).abs() < f64::EPSILON);
        assert!((Axis::Z.unit() - Vector3::z()).norm() < f64::EPSILON);
    }
}
