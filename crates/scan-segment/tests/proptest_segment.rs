//! Property-based tests for the segmentation pipeline.
//!
//! These tests use proptest to generate random meshes and verify
//! invariants that must hold for any input.
//!
//! Run with: cargo test -p scan-segment -- proptest

use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use scan_segment::{
    compact_mesh, cut_mesh, dedup_mesh, export_segments, process_scan, segment_mesh,
    DedupParams, PipelineParams, SegmentParams,
};
use scan_types::{ScanMesh, Vertex, VertexColor};

// =============================================================================
// Strategies for generating random meshes
// =============================================================================

/// Generate a random vertex position in a bounded range.
fn arb_position() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-10.0..10.0f64)
}

/// Generate a random vertex with a unit-ish normal.
fn arb_vertex() -> impl Strategy<Value = Vertex> {
    arb_position().prop_map(|[x, y, z]| Vertex::new(Point3::new(x, y, z), Vector3::z()))
}

/// Generate a random color.
fn arb_color() -> impl Strategy<Value = VertexColor> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| VertexColor::new(r, g, b))
}

/// Generate a valid mesh: all face indices in bounds, colors aligned.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = ScanMesh> {
    (3..=max_vertices).prop_flat_map(move |num_vertices| {
        let vertices = prop::collection::vec(arb_vertex(), num_vertices);
        let colors = prop::option::of(prop::collection::vec(arb_color(), num_vertices));

        (vertices, colors).prop_flat_map(move |(verts, colors)| {
            let n = verts.len() as u32;
            let face = prop::array::uniform3(0..n);
            let faces = prop::collection::vec(face, 0..=max_faces);

            faces.prop_map(move |f| ScanMesh {
                vertices: verts.clone(),
                faces: f,
                colors: colors.clone(),
            })
        })
    })
}

// =============================================================================
// Deduplication invariants
// =============================================================================

proptest! {
    #[test]
    fn dedup_is_idempotent(mut mesh in arb_mesh(40, 60)) {
        dedup_mesh(&mut mesh, &DedupParams::default());
        let first = mesh.clone();

        let summary = dedup_mesh(&mut mesh, &DedupParams::default());
        prop_assert!(!summary.had_changes());
        prop_assert_eq!(mesh, first);
    }

    #[test]
    fn dedup_never_grows_the_mesh(mut mesh in arb_mesh(40, 60)) {
        let vertices_before = mesh.vertex_count();
        let faces_before = mesh.face_count();

        dedup_mesh(&mut mesh, &DedupParams::default());

        prop_assert!(mesh.vertex_count() <= vertices_before);
        prop_assert!(mesh.face_count() <= faces_before);
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn dedup_leaves_no_degenerate_or_duplicate_faces(mut mesh in arb_mesh(30, 50)) {
        dedup_mesh(&mut mesh, &DedupParams::default());

        let mut seen = std::collections::HashSet::new();
        for face in &mesh.faces {
            prop_assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
            let mut key = *face;
            key.sort_unstable();
            prop_assert!(seen.insert(key));
        }
    }

    #[test]
    fn welding_dedup_keeps_colors_aligned(mut mesh in arb_mesh(30, 40)) {
        dedup_mesh(&mut mesh, &DedupParams::welding(0.5));
        prop_assert!(mesh.validate().is_ok());
        if let Some(colors) = &mesh.colors {
            prop_assert_eq!(colors.len(), mesh.vertex_count());
        }
    }
}

// =============================================================================
// Compaction invariants
// =============================================================================

proptest! {
    #[test]
    fn compaction_preserves_triangle_geometry(mut mesh in arb_mesh(40, 60)) {
        let before: Vec<_> = mesh.triangles().collect();
        compact_mesh(&mut mesh);
        let after: Vec<_> = mesh.triangles().collect();

        prop_assert_eq!(before, after);
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn compaction_keeps_exactly_the_referenced_vertices(mut mesh in arb_mesh(40, 60)) {
        let distinct_referenced: std::collections::HashSet<u32> =
            mesh.faces.iter().flatten().copied().collect();

        compact_mesh(&mut mesh);

        prop_assert_eq!(mesh.vertex_count(), distinct_referenced.len());
    }
}

// =============================================================================
// Cutting invariants
// =============================================================================

proptest! {
    #[test]
    fn cut_output_stays_on_the_kept_side(
        mesh in arb_mesh(30, 40),
        plane_x in -5.0..5.0f64,
    ) {
        let kept = cut_mesh(&mesh, Point3::new(plane_x, 0.0, 0.0), Vector3::x());

        prop_assert!(kept.validate().is_ok());
        for v in &kept.vertices {
            prop_assert!(v.position.x >= plane_x - 1e-9);
        }
    }

    #[test]
    fn opposing_cuts_do_not_lose_whole_triangles(
        mesh in arb_mesh(30, 40),
        plane_x in -5.0..5.0f64,
    ) {
        let plane = Point3::new(plane_x, 0.0, 0.0);
        let front = cut_mesh(&mesh, plane, Vector3::x());
        let back = cut_mesh(&mesh, plane, -Vector3::x());

        // Splitting can only add triangles; degenerate input faces may
        // be dropped by the zero-area guard on either side
        let degenerate = mesh
            .faces
            .iter()
            .filter(|f| {
                let p0 = mesh.vertices[f[0] as usize].position;
                let p1 = mesh.vertices[f[1] as usize].position;
                let p2 = mesh.vertices[f[2] as usize].position;
                p0 == p1 || p1 == p2 || p0 == p2
            })
            .count();
        prop_assert!(front.face_count() + back.face_count() >= mesh.face_count() - degenerate);
    }
}

// =============================================================================
// Segmentation and export invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn segmentation_emits_only_nonempty_aligned_blocks(
        mesh in arb_mesh(30, 40),
        block_size in 0.5..8.0f64,
    ) {
        let params = SegmentParams::default().with_block_size(block_size);
        let segments = segment_mesh(&mesh, &params);
        prop_assert!(segments.is_ok());

        for segment in segments.unwrap_or_default() {
            prop_assert!(!segment.mesh.is_empty());
            prop_assert!(segment.mesh.validate().is_ok());

            let size = segment.mesh.bounds().size();
            prop_assert!(size.x <= block_size + 1e-9);
            prop_assert!(size.y <= block_size + 1e-9);
            prop_assert!(size.z <= block_size + 1e-9);
        }
    }

    #[test]
    fn pipeline_then_export_produces_a_consistent_mesh(
        mesh in arb_mesh(25, 35),
        block_size in 0.5..8.0f64,
    ) {
        let params = PipelineParams::interactive().with_block_size(block_size);
        let segments = process_scan(mesh, &params);
        prop_assert!(segments.is_ok());
        let segments = segments.unwrap_or_default();

        let per_segment_total: usize =
            segments.iter().map(|s| s.mesh.vertex_count()).sum();
        let flat = export_segments(&segments);

        // Export dedup can only merge, never invent vertices
        prop_assert!(flat.vertex_count() <= per_segment_total);
        prop_assert_eq!(flat.indices.len() % 3, 0);

        let n = u32::try_from(flat.vertex_count()).unwrap_or(u32::MAX);
        prop_assert!(flat.indices.iter().all(|&i| i < n));

        if let Some(colors) = &flat.colors {
            prop_assert_eq!(colors.len(), flat.vertex_count());
        }
    }
}
