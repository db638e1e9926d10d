//! Recombination of segments into one exportable mesh.

use serde::{Deserialize, Serialize};
use tracing::info;

use scan_types::ScanMesh;

use crate::dedup::dedup_mesh;
use crate::params::DedupParams;
use crate::segment::Segment;

/// A flat, self-consistent mesh ready for serialization.
///
/// Parallel sequences the way export collaborators expect them: one
/// position and one normal per vertex, optional packed `0xRRGGBB` colors,
/// and triangle indices in consecutive triples. The file encoding itself
/// is out of scope here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatMesh {
    /// Vertex positions `[x, y, z]`.
    pub positions: Vec<[f64; 3]>,

    /// Vertex normals `[x, y, z]`.
    pub normals: Vec<[f64; 3]>,

    /// Packed `0xRRGGBB` vertex colors, when every segment carried them.
    pub colors: Option<Vec<u32>>,

    /// Triangle indices, three consecutive entries per triangle.
    pub indices: Vec<u32>,
}

impl FlatMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Merge all segments back into one flat mesh.
///
/// Applies each segment's placement transform to its vertices and
/// normals, concatenates everything with running index offsets, then
/// runs exact deduplication once over the concatenation: adjacent blocks
/// share bitwise-identical boundary vertices from the cutting process,
/// and this is where they merge back together.
///
/// Colors are carried only when every segment mesh still has its color
/// sequence; a mixed set exports without colors rather than guess
/// entries for the colorless part.
#[must_use]
pub fn export_segments(segments: &[Segment]) -> FlatMesh {
    let mut combined = ScanMesh::new();
    let with_colors = !segments.is_empty() && segments.iter().all(|s| s.mesh.has_colors());
    if with_colors {
        combined.colors = Some(Vec::new());
    }

    for segment in segments {
        let placed = segment.mesh.transformed(&segment.transform);
        combined.merge(&placed);
    }

    let summary = dedup_mesh(&mut combined, &DedupParams::exact());
    info!(
        segments = segments.len(),
        vertices = combined.vertex_count(),
        merged = summary.vertices_merged,
        "Exported segments"
    );

    let positions = combined
        .vertices
        .iter()
        .map(|v| [v.position.x, v.position.y, v.position.z])
        .collect();
    let normals = combined
        .vertices
        .iter()
        .map(|v| [v.normal.x, v.normal.y, v.normal.z])
        .collect();
    let colors = combined
        .colors
        .map(|colors| colors.into_iter().map(|c| c.to_packed()).collect());
    let indices = combined.faces.iter().flatten().copied().collect();

    FlatMesh {
        positions,
        normals,
        colors,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SegmentParams;
    use crate::segment::segment_mesh;
    use nalgebra::{Isometry3, Vector3};
    use scan_types::{unit_cube, VertexColor};

    fn segmented_cube(block_size: f64) -> Vec<Segment> {
        let cube = unit_cube();
        let params = SegmentParams::default()
            .with_block_size(block_size)
            .with_interpolate_color(false);
        segment_mesh(&cube, &params).unwrap_or_default()
    }

    #[test]
    fn empty_export() {
        let flat = export_segments(&[]);
        assert_eq!(flat.vertex_count(), 0);
        assert_eq!(flat.triangle_count(), 0);
        assert!(flat.colors.is_none());
    }

    #[test]
    fn export_remerges_boundary_vertices() {
        let segments = segmented_cube(0.5);
        let per_segment_total: usize = segments.iter().map(|s| s.mesh.vertex_count()).sum();

        let flat = export_segments(&segments);

        // Boundary vertices are shared between neighbors before dedup
        assert!(flat.vertex_count() < per_segment_total);
        assert!(flat.triangle_count() > 0);

        // Every index is valid
        #[allow(clippy::cast_possible_truncation)]
        let n = flat.vertex_count() as u32;
        assert!(flat.indices.iter().all(|&i| i < n));
        assert_eq!(flat.indices.len() % 3, 0);
    }

    #[test]
    fn export_of_single_block_roundtrips_the_cube() {
        let segments = segmented_cube(10.0);
        let flat = export_segments(&segments);

        assert_eq!(flat.vertex_count(), 8);
        assert_eq!(flat.triangle_count(), 12);
    }

    #[test]
    fn export_packs_colors_when_all_segments_have_them() {
        let mut cube = unit_cube();
        cube.colors = Some(vec![VertexColor::new(10, 20, 30); 8]);
        let params = SegmentParams::default().with_block_size(10.0);
        let segments = segment_mesh(&cube, &params).unwrap_or_default();

        let flat = export_segments(&segments);
        let colors = flat.colors.unwrap_or_default();
        assert_eq!(colors.len(), flat.positions.len());
        assert_eq!(colors[0], 0x000A_141E);
    }

    #[test]
    fn export_drops_colors_on_mixed_capture() {
        let mut segments = segmented_cube(10.0);
        let mut colored = segments[0].clone();
        colored.mesh.colors = Some(vec![VertexColor::WHITE; colored.mesh.vertex_count()]);
        segments.push(colored);

        let flat = export_segments(&segments);
        assert!(flat.colors.is_none());
    }

    #[test]
    fn export_honors_placement_transforms() {
        let mut segments = segmented_cube(10.0);
        segments[0].transform = Isometry3::translation(5.0, 0.0, 0.0);

        let flat = export_segments(&segments);
        assert!(flat.positions.iter().all(|p| p[0] >= 5.0 - 1e-12));
    }

    #[test]
    fn export_applies_dedup_across_segments() {
        // The same cube twice at the same placement collapses to one
        let segments = segmented_cube(10.0);
        let doubled: Vec<Segment> = segments
            .iter()
            .chain(segments.iter())
            .cloned()
            .collect();

        let flat = export_segments(&doubled);
        assert_eq!(flat.vertex_count(), 8);
        assert_eq!(flat.triangle_count(), 12);
    }

    #[test]
    fn flip_does_not_sneak_into_export() {
        // Normals survive the identity transform untouched
        let segments = segmented_cube(10.0);
        let flat = export_segments(&segments);
        for n in &flat.normals {
            let len = Vector3::new(n[0], n[1], n[2]).norm();
            assert!((len - 1.0).abs() < 1e-9);
        }
    }
}
