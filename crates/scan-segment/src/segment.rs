//! Grid segmentation of a scanned mesh into display blocks.

use nalgebra::{Isometry3, Point3, Vector3};
use scan_types::{Aabb, ScanMesh, VertexColor};
use tracing::{debug, info};

use crate::compact::compact_mesh;
use crate::cut::{cut_mesh, cut_mesh_exclusive};
use crate::error::{SegmentError, SegmentResult};
use crate::grid::{axis_boundaries, split_along_axis, Axis};
use crate::normals::recompute_flat_normals;
use crate::params::SegmentParams;

/// Base intensity for depth-shaded gray blocks.
const DEPTH_SHADE_BASE: f64 = 200.0;

/// One display block of a segmented scan.
///
/// A segment owns its sub-mesh, a placement transform (identity under
/// the current segmentation — blocks stay where they were cut — but
/// honored by the exporter) and the display color the renderer applies
/// to both front and back faces, since blocks are viewed from either
/// side.
#[derive(Debug, Clone)]
pub struct Segment {
    /// The block's geometry, compacted and with recomputed normals.
    pub mesh: ScanMesh,

    /// Placement of the block in the scene.
    pub transform: Isometry3<f64>,

    /// Flat display color for the whole block.
    pub display_color: VertexColor,

    /// Whether this block is the isolated wall slab.
    pub is_wall: bool,
}

/// Cut a mesh into grid blocks, optionally isolating the wall first.
///
/// Rejects a non-positive or non-finite `block_size` and a mesh whose
/// color sequence is out of step with its vertices before any cutting
/// starts. An empty mesh yields an empty set.
///
/// When `split_wall` is set, everything within `wall_sensitivity` of the
/// minimum Z is cut away first into a single flat-red wall segment; this
/// is a heuristic that assumes the dominant flat surface faces -Z.
///
/// The rest is split into `block_size` cells along X, then Y, then Z.
/// Every slab is carved out of the remainder of its predecessor, so
/// blocks never overlap; the bound of each traversal runs one step past
/// the mesh maximum, so a trailing partial block is captured rather than
/// dropped. Grid cells with no surviving geometry are skipped; every
/// emitted segment is non-empty, compacted, and carries face-derived
/// normals and a display color (averaged vertex colors or depth-shaded
/// gray, see [`SegmentParams::interpolate_color`]).
///
/// # Errors
///
/// [`SegmentError::InvalidBlockSize`], or the validation errors of
/// [`validate_mesh`].
pub fn segment_mesh(mesh: &ScanMesh, params: &SegmentParams) -> SegmentResult<Vec<Segment>> {
    if !params.block_size.is_finite() || params.block_size <= 0.0 {
        return Err(SegmentError::InvalidBlockSize(params.block_size));
    }
    validate_mesh(mesh)?;

    let bounds = mesh.bounds();
    if mesh.is_empty() || bounds.is_empty() {
        return Ok(Vec::new());
    }

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        block_size = params.block_size,
        split_wall = params.split_wall,
        "Starting mesh segmentation"
    );

    let mut segments = Vec::new();
    let mut working = mesh.clone();

    if params.split_wall {
        let plane = Point3::new(0.0, 0.0, bounds.min.z + params.wall_sensitivity);
        let wall = cut_mesh(&working, plane, -Vector3::z());
        working = cut_mesh_exclusive(&working, plane, Vector3::z());

        if let Some(segment) = finish_block(wall, &bounds, params, BlockKind::Wall) {
            debug!(
                faces = segment.mesh.face_count(),
                "Isolated wall slab"
            );
            segments.push(segment);
        }
    }

    let x_bounds = axis_boundaries(bounds.min.x, bounds.max.x, params.block_size);
    let y_bounds = axis_boundaries(bounds.min.y, bounds.max.y, params.block_size);
    let z_bounds = axis_boundaries(bounds.min.z, bounds.max.z, params.block_size);

    for x_slab in split_along_axis(&working, Axis::X, &x_bounds) {
        if x_slab.is_empty() {
            continue;
        }
        for xy_slab in split_along_axis(&x_slab, Axis::Y, &y_bounds) {
            if xy_slab.is_empty() {
                continue;
            }
            for (zi, leaf) in split_along_axis(&xy_slab, Axis::Z, &z_bounds)
                .into_iter()
                .enumerate()
            {
                // The leaf slab's lower Z boundary drives depth shading
                let lower_z = if zi == 0 {
                    bounds.min.z
                } else {
                    z_bounds[zi - 1]
                };
                let kind = BlockKind::Grid { lower_z };
                if let Some(segment) = finish_block(leaf, &bounds, params, kind) {
                    segments.push(segment);
                }
            }
        }
    }

    info!(segments = segments.len(), "Segmentation complete");
    Ok(segments)
}

/// Check the color-alignment and index invariants of a mesh.
///
/// A broken invariant means mesh and colors were derived out of step
/// somewhere upstream; processing stops rather than produce misaligned
/// colors.
///
/// # Errors
///
/// [`SegmentError::ColorCountMismatch`] or [`SegmentError::InvalidIndex`].
pub fn validate_mesh(mesh: &ScanMesh) -> SegmentResult<()> {
    if let Some(colors) = &mesh.colors {
        if colors.len() != mesh.vertices.len() {
            return Err(SegmentError::ColorCountMismatch {
                vertices: mesh.vertices.len(),
                colors: colors.len(),
            });
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let vertex_count = mesh.vertices.len() as u32;
    for face in &mesh.faces {
        for &index in face {
            if index >= vertex_count {
                return Err(SegmentError::InvalidIndex {
                    index,
                    vertex_count: mesh.vertices.len(),
                });
            }
        }
    }

    Ok(())
}

/// How a finished block gets its display color.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BlockKind {
    /// A grid cell; `lower_z` is its slab's lower Z boundary.
    Grid { lower_z: f64 },
    /// The isolated wall slab, always flat red.
    Wall,
}

/// Finish a freshly cut block: recompute flat normals, compact away
/// stranded cut vertices, and assign the display color. Returns `None`
/// when nothing renderable survives, so no empty segment is ever
/// emitted.
pub(crate) fn finish_block(
    mut mesh: ScanMesh,
    scan_bounds: &Aabb,
    params: &SegmentParams,
    kind: BlockKind,
) -> Option<Segment> {
    if mesh.is_empty() {
        return None;
    }

    recompute_flat_normals(&mut mesh);
    compact_mesh(&mut mesh);
    if mesh.is_empty() {
        return None;
    }

    let display_color = match kind {
        BlockKind::Wall => VertexColor::RED,
        BlockKind::Grid { lower_z } => block_color(&mesh, lower_z, scan_bounds, params),
    };

    Some(Segment {
        mesh,
        transform: Isometry3::identity(),
        display_color,
        is_wall: matches!(kind, BlockKind::Wall),
    })
}

/// Display color for a grid block.
///
/// With `interpolate_color` and captured colors, the block shows the
/// channel-wise truncating average of its vertex colors. Otherwise it
/// shows a gray shaded by normalized depth within the scan.
fn block_color(
    mesh: &ScanMesh,
    lower_z: f64,
    scan_bounds: &Aabb,
    params: &SegmentParams,
) -> VertexColor {
    if params.interpolate_color {
        if let Some(colors) = &mesh.colors {
            if let Some(average) = VertexColor::average(colors.iter().copied()) {
                return average;
            }
        }
    }
    depth_shade(lower_z, scan_bounds)
}

/// Flat gray shaded by normalized depth:
/// `base * (z + |min_z|) / (max_z + |min_z|)`, truncated per channel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// The shade is clamped to [0, 255] before truncation
fn depth_shade(z: f64, scan_bounds: &Aabb) -> VertexColor {
    let offset = scan_bounds.min.z.abs();
    let denominator = scan_bounds.max.z + offset;
    let shade = if denominator.abs() < f64::EPSILON {
        DEPTH_SHADE_BASE
    } else {
        DEPTH_SHADE_BASE * (z + offset) / denominator
    };
    let channel = shade.clamp(0.0, 255.0) as u8;
    VertexColor::new(channel, channel, channel)
}
