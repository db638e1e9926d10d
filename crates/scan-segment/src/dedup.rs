//! Vertex and triangle deduplication.
//!
//! Scanner output repeats vertices freely: the same surface point shows
//! up once per incident triangle, and whole triangles can arrive twice.
//! Deduplication collapses geometrically identical vertices, then drops
//! degenerate and duplicate triangles, remapping indices and the color
//! sequence in lockstep.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use scan_types::{ScanMesh, Vertex};

use crate::params::DedupParams;

/// Result of a deduplication pass.
#[derive(Debug, Clone, Default)]
pub struct DedupSummary {
    /// Number of vertices before deduplication.
    pub initial_vertices: usize,
    /// Number of vertices after deduplication.
    pub final_vertices: usize,
    /// Number of faces before deduplication.
    pub initial_faces: usize,
    /// Number of faces after deduplication.
    pub final_faces: usize,
    /// Number of vertices merged into an earlier occurrence.
    pub vertices_merged: usize,
    /// Number of faces dropped because two indices coincided.
    pub degenerate_faces_removed: usize,
    /// Number of faces dropped as duplicates of an earlier face.
    pub duplicate_faces_removed: usize,
}

impl DedupSummary {
    /// Check if the pass changed anything.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.vertices_merged > 0
            || self.degenerate_faces_removed > 0
            || self.duplicate_faces_removed > 0
    }
}

impl std::fmt::Display for DedupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dedup: {} verts ({} merged), {} faces ({} degenerate, {} duplicate)",
            self.final_vertices,
            self.vertices_merged,
            self.final_faces,
            self.degenerate_faces_removed,
            self.duplicate_faces_removed
        )
    }
}

/// Merge identical vertices and drop degenerate/duplicate faces.
///
/// Two passes:
///
/// 1. **Vertex pass** - buckets positions for near-O(n) lookup and emits
///    each first-seen unique vertex (position, normal, color) once, in
///    first-seen order, building an old-index → new-index remap. With
///    `tolerance == 0.0` only exactly equal positions merge; a positive
///    tolerance welds vertices closer than that distance.
/// 2. **Triangle pass** - remaps every face, drops faces with two equal
///    remapped indices, and drops faces whose sorted index triple was
///    already emitted (duplicates regardless of winding).
///
/// Output order is a stable function of input order, so repeated runs on
/// identical input produce identical meshes and a second run on the
/// output is a no-op.
///
/// # Example
///
/// ```
/// use scan_segment::{dedup_mesh, DedupParams};
/// use scan_types::{ScanMesh, Vertex};
///
/// let mut mesh = ScanMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // repeat of 0
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([3, 1, 2]); // same triangle through the repeat
///
/// let summary = dedup_mesh(&mut mesh, &DedupParams::default());
/// assert_eq!(summary.vertices_merged, 1);
/// assert_eq!(summary.duplicate_faces_removed, 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: u32 indices support ~4 billion vertices by design
pub fn dedup_mesh(mesh: &mut ScanMesh, params: &DedupParams) -> DedupSummary {
    let initial_vertices = mesh.vertices.len();
    let initial_faces = mesh.faces.len();

    let remap = if params.tolerance > 0.0 {
        merge_vertices_welding(mesh, params.tolerance)
    } else {
        merge_vertices_exact(mesh)
    };

    let mut degenerate_faces_removed = 0usize;
    let mut duplicate_faces_removed = 0usize;
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(mesh.faces.len());
    let mut faces = Vec::with_capacity(mesh.faces.len());

    for face in &mesh.faces {
        let mapped = [
            remap[face[0] as usize],
            remap[face[1] as usize],
            remap[face[2] as usize],
        ];

        if mapped[0] == mapped[1] || mapped[1] == mapped[2] || mapped[0] == mapped[2] {
            degenerate_faces_removed += 1;
            continue;
        }

        let mut key = mapped;
        key.sort_unstable();
        if seen.insert(key) {
            faces.push(mapped);
        } else {
            duplicate_faces_removed += 1;
        }
    }
    mesh.faces = faces;

    DedupSummary {
        initial_vertices,
        final_vertices: mesh.vertices.len(),
        initial_faces,
        final_faces: mesh.faces.len(),
        vertices_merged: initial_vertices - mesh.vertices.len(),
        degenerate_faces_removed,
        duplicate_faces_removed,
    }
}

/// Key a position for exact-equality bucketing.
///
/// Adding 0.0 normalizes -0.0 to 0.0 so the two (equal) values share a
/// bucket; scan data contains no NaNs.
fn position_key(p: &Point3<f64>) -> (u64, u64, u64) {
    (
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    )
}

/// Vertex pass for `tolerance == 0.0`: exact position equality.
#[allow(clippy::cast_possible_truncation)]
fn merge_vertices_exact(mesh: &mut ScanMesh) -> Vec<u32> {
    let mut slots: HashMap<(u64, u64, u64), u32> = HashMap::with_capacity(mesh.vertices.len());
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    let mut vertices = Vec::with_capacity(mesh.vertices.len());
    let mut colors = mesh
        .colors
        .as_ref()
        .map(|c| Vec::with_capacity(c.len()));

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let key = position_key(&vertex.position);
        let slot = *slots.entry(key).or_insert_with(|| {
            let new_idx = vertices.len() as u32;
            vertices.push(*vertex);
            if let (Some(out), Some(src)) = (colors.as_mut(), mesh.colors.as_ref()) {
                out.push(src[idx]);
            }
            new_idx
        });
        remap.push(slot);
    }

    mesh.vertices = vertices;
    mesh.colors = colors;
    remap
}

/// Vertex pass for a positive tolerance: spatial-hash welding.
///
/// Buckets vertices into cells of twice the tolerance and probes the
/// 3x3x3 neighborhood for an already-emitted representative within
/// range. First-seen representatives win, keeping the output order a
/// stable function of input order.
#[allow(clippy::cast_possible_truncation)]
fn merge_vertices_welding(mesh: &mut ScanMesh, tolerance: f64) -> Vec<u32> {
    let cell_size = tolerance * 2.0;
    let cell_of = |p: &Point3<f64>| -> (i64, i64, i64) {
        (
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        )
    };

    // Cell -> new indices of representatives stored in that cell
    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    let mut vertices: Vec<Vertex> = Vec::with_capacity(mesh.vertices.len());
    let mut colors = mesh
        .colors
        .as_ref()
        .map(|c| Vec::with_capacity(c.len()));

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        let cell = cell_of(&vertex.position);

        let mut found = None;
        'probe: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    if let Some(candidates) = buckets.get(&neighbor) {
                        for &rep in candidates {
                            let dist =
                                (vertex.position - vertices[rep as usize].position).norm();
                            if dist < tolerance {
                                found = Some(rep);
                                break 'probe;
                            }
                        }
                    }
                }
            }
        }

        let slot = found.unwrap_or_else(|| {
            let new_idx = vertices.len() as u32;
            vertices.push(*vertex);
            if let (Some(out), Some(src)) = (colors.as_mut(), mesh.colors.as_ref()) {
                out.push(src[idx]);
            }
            buckets.entry(cell).or_default().push(new_idx);
            new_idx
        });
        remap.push(slot);
    }

    mesh.vertices = vertices;
    mesh.colors = colors;
    remap
}
