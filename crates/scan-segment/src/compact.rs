//! Unreferenced-vertex removal.
//!
//! Plane cuts classify every vertex but only re-emit the ones their kept
//! triangles still use, so freshly cut blocks carry stranded vertices.
//! Left in place they skew any centroid or bounding-box computed from
//! the block; compaction drops them and renumbers the faces.

use hashbrown::HashSet;
use scan_types::ScanMesh;

/// Remove vertices referenced by no face, preserving relative order.
///
/// Faces are remapped to the compacted numbering. The color sequence,
/// when present, is compacted in the same pass; a color-less mesh is a
/// fully supported mode, not an error. Returns the number of vertices
/// removed.
///
/// # Example
///
/// ```
/// use scan_segment::compact_mesh;
/// use scan_types::{ScanMesh, Vertex};
///
/// let mut mesh = ScanMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0)); // stranded
/// mesh.faces.push([0, 1, 2]);
///
/// let removed = compact_mesh(&mut mesh);
/// assert_eq!(removed, 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: u32 indices support ~4 billion vertices by design
pub fn compact_mesh(mesh: &mut ScanMesh) -> usize {
    let original_count = mesh.vertices.len();

    let mut referenced: HashSet<u32> = HashSet::with_capacity(original_count);
    for face in &mesh.faces {
        referenced.insert(face[0]);
        referenced.insert(face[1]);
        referenced.insert(face[2]);
    }

    if referenced.len() == original_count {
        return 0;
    }

    // u32::MAX marks an unreferenced slot; valid meshes never reach it
    let mut remap = vec![u32::MAX; original_count];
    let mut vertices = Vec::with_capacity(referenced.len());
    let mut colors = mesh
        .colors
        .as_ref()
        .map(|_| Vec::with_capacity(referenced.len()));

    for (old_idx, vertex) in mesh.vertices.iter().enumerate() {
        if referenced.contains(&(old_idx as u32)) {
            remap[old_idx] = vertices.len() as u32;
            vertices.push(*vertex);
            if let (Some(out), Some(src)) = (colors.as_mut(), mesh.colors.as_ref()) {
                out.push(src[old_idx]);
            }
        }
    }

    for face in &mut mesh.faces {
        face[0] = remap[face[0] as usize];
        face[1] = remap[face[1] as usize];
        face[2] = remap[face[2] as usize];
    }

    let removed = original_count - vertices.len();
    mesh.vertices = vertices;
    mesh.colors = colors;
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::{Vertex, VertexColor};

    fn stranded_mesh() -> ScanMesh {
        let mut mesh = ScanMesh::new();
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0)); // stranded
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(6.0, 6.0, 6.0)); // stranded
        mesh.faces.push([1, 2, 3]);
        mesh
    }

    #[test]
    fn removes_stranded_vertices() {
        let mut mesh = stranded_mesh();
        let removed = compact_mesh(&mut mesh);

        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn preserves_triangle_geometry() {
        let mut mesh = stranded_mesh();
        let before: Vec<_> = mesh.triangles().collect();
        compact_mesh(&mut mesh);
        let after: Vec<_> = mesh.triangles().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn fully_referenced_mesh_untouched() {
        let mut mesh = stranded_mesh();
        compact_mesh(&mut mesh);
        let snapshot = mesh.clone();

        let removed = compact_mesh(&mut mesh);
        assert_eq!(removed, 0);
        assert_eq!(mesh, snapshot);
    }

    #[test]
    fn colors_compact_in_lockstep() {
        let mut mesh = stranded_mesh();
        mesh.colors = Some(vec![
            VertexColor::new(1, 0, 0),
            VertexColor::new(2, 0, 0),
            VertexColor::new(3, 0, 0),
            VertexColor::new(4, 0, 0),
            VertexColor::new(5, 0, 0),
        ]);

        compact_mesh(&mut mesh);

        assert_eq!(
            mesh.colors,
            Some(vec![
                VertexColor::new(2, 0, 0),
                VertexColor::new(3, 0, 0),
                VertexColor::new(4, 0, 0),
            ])
        );
    }

    #[test]
    fn colorless_mode_supported() {
        let mut mesh = stranded_mesh();
        mesh.colors = None;
        let removed = compact_mesh(&mut mesh);
        assert_eq!(removed, 2);
        assert!(mesh.colors.is_none());
    }

    #[test]
    fn faceless_mesh_empties() {
        let mut mesh = ScanMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        let removed = compact_mesh(&mut mesh);
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertex_count(), 0);
    }
}
