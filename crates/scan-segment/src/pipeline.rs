//! End-to-end scan processing.
//!
//! Ties the stages together under one configuration surface: optional
//! deduplication, then either grid segmentation or a single whole-mesh
//! block, with color capture switchable off entirely.

use tracing::{debug, info};

use scan_types::ScanMesh;

use crate::dedup::dedup_mesh;
use crate::error::SegmentResult;
use crate::params::PipelineParams;
use crate::segment::{finish_block, segment_mesh, validate_mesh, BlockKind, Segment};

/// Process an ingested scan mesh into display segments.
///
/// Stages, in order:
///
/// 1. Validate the mesh invariants (fail fast on misaligned colors).
/// 2. Strip colors when `capture_color` is off; from here on the
///    pipeline does no color bookkeeping at all.
/// 3. Deduplicate when `reduce_vertices` is set.
/// 4. Either cut into grid blocks (`segment_grid`) or finish the whole
///    mesh as one block with the same per-block treatment (flat normals,
///    compaction, display color).
///
/// The input is consumed: segmentation replaces the mesh, and the
/// intermediate cut fragments are dropped as soon as their block is
/// finished.
///
/// # Errors
///
/// Configuration and validation errors from
/// [`segment_mesh`](crate::segment_mesh); geometric degeneracies are
/// absorbed, not reported.
///
/// # Example
///
/// ```
/// use scan_segment::{process_scan, PipelineParams};
/// use scan_types::unit_cube;
///
/// let params = PipelineParams::interactive().with_block_size(0.5);
/// let segments = process_scan(unit_cube(), &params).unwrap();
/// assert_eq!(segments.len(), 8);
/// ```
pub fn process_scan(mut mesh: ScanMesh, params: &PipelineParams) -> SegmentResult<Vec<Segment>> {
    validate_mesh(&mesh)?;

    if !params.capture_color {
        mesh.colors = None;
    }

    if params.reduce_vertices {
        let summary = dedup_mesh(&mut mesh, &params.dedup);
        debug!(%summary, "Reduced input mesh");
    }

    if params.segment_grid {
        return segment_mesh(&mesh, &params.segment);
    }

    // Whole mesh as a single block, finished like any grid cell
    let bounds = mesh.bounds();
    let lower_z = bounds.min.z;
    let segments: Vec<Segment> =
        finish_block(mesh, &bounds, &params.segment, BlockKind::Grid { lower_z })
            .into_iter()
            .collect();

    info!(segments = segments.len(), "Processed scan without gridding");
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::{unit_cube, Vertex, VertexColor};

    fn noisy_cube() -> ScanMesh {
        // A cube with one duplicated vertex and one duplicated face
        let mut cube = unit_cube();
        cube.vertices.push(Vertex::new(
            cube.vertices[0].position,
            cube.vertices[0].normal,
        ));
        cube.faces.push([0, 2, 1]);
        cube
    }

    #[test]
    fn full_pipeline_on_cube() {
        let params = PipelineParams::interactive().with_block_size(0.5);
        let segments = process_scan(noisy_cube(), &params).unwrap_or_default();
        assert_eq!(segments.len(), 8);
    }

    #[test]
    fn single_block_mode() {
        let params = PipelineParams::interactive()
            .with_segment_grid(false)
            .with_block_size(0.5);

        let segments = process_scan(unit_cube(), &params).unwrap_or_default();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].mesh.face_count(), 12);
        assert!(!segments[0].is_wall);
    }

    #[test]
    fn capture_color_off_strips_colors() {
        let mut cube = unit_cube();
        cube.colors = Some(vec![VertexColor::RED; 8]);

        let params = PipelineParams::interactive()
            .with_capture_color(false)
            .with_block_size(10.0);

        let segments = process_scan(cube, &params).unwrap_or_default();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].mesh.colors.is_none());
        // Without captured colors the block falls back to depth shading
        let c = segments[0].display_color;
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn reduce_vertices_removes_duplicates_before_cutting() {
        let params = PipelineParams::interactive()
            .with_segment_grid(false)
            .with_block_size(1.0);

        let segments = process_scan(noisy_cube(), &params).unwrap_or_default();
        assert_eq!(segments.len(), 1);
        // The duplicated vertex and face are gone
        assert_eq!(segments[0].mesh.vertex_count(), 8);
        assert_eq!(segments[0].mesh.face_count(), 12);
    }

    #[test]
    fn misaligned_colors_fail_fast() {
        let mut cube = unit_cube();
        cube.colors = Some(vec![VertexColor::RED; 2]);

        let result = process_scan(cube, &PipelineParams::interactive());
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let segments = process_scan(ScanMesh::new(), &PipelineParams::interactive());
        assert!(segments.is_ok());
        assert!(segments.unwrap_or_default().is_empty());
    }
}
