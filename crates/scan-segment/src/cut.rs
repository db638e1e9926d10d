//! Half-space plane cutting.
//!
//! Splitting a mesh into grid blocks is built entirely out of one
//! operation: keep the part of a mesh on one side of a plane. Cutting
//! the same source with the opposite normal yields the complementary
//! half, so two calls produce a slab.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use scan_types::{ScanMesh, Vertex, VertexColor};

/// Keep the part of `mesh` on the positive side of a plane.
///
/// Every vertex is classified by its signed distance to the plane
/// through `plane_point` with direction `plane_normal`; distances `>= 0`
/// are kept, so a vertex exactly on the plane snaps to the kept side (an
/// expected degeneracy, silently absorbed — two opposing cuts then share
/// that vertex and export deduplication re-merges it).
///
/// Triangles fully on the kept side pass through with remapped indices;
/// fully discarded triangles are dropped. A triangle straddling the
/// plane is re-triangulated: each crossing edge gets one synthesized
/// vertex whose position, normal and color are linearly interpolated
/// with the same weight (the normal is re-normalized), giving one new
/// triangle when one corner survives and two when two corners survive,
/// with the source winding preserved. Synthesized vertices are cached
/// per source edge, so neighboring split triangles share them, and a
/// replacement triangle that collapses to zero area (the plane grazing a
/// corner) is dropped on the spot.
///
/// The output color sequence, when the source carries one, has the same
/// length and order as the output vertices.
///
/// Cutting does not remove vertices: a kept-side vertex whose triangles
/// were all discarded is simply never re-emitted, but stranded vertices
/// can remain; callers [`compact`](crate::compact_mesh) finished blocks
/// before using their bounds.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use scan_segment::cut_mesh;
/// use scan_types::unit_cube;
///
/// let cube = unit_cube();
/// let kept = cut_mesh(&cube, Point3::new(0.5, 0.0, 0.0), Vector3::x());
/// assert!(kept
///     .vertices
///     .iter()
///     .all(|v| v.position.x >= 0.5 - 1e-12));
/// ```
#[must_use]
pub fn cut_mesh(
    mesh: &ScanMesh,
    plane_point: Point3<f64>,
    plane_normal: Vector3<f64>,
) -> ScanMesh {
    cut_impl(mesh, plane_point, plane_normal, true)
}

/// Keep the part of `mesh` strictly past a plane (`d > 0`).
///
/// The complement of [`cut_mesh`] over the same plane: together the two
/// partition the triangles, with on-plane geometry going to the
/// inclusive side only. The grid traversal carves each slab inclusively
/// and carries the strict remainder forward, so a triangle lying exactly
/// in a grid plane lands in exactly one block.
#[must_use]
pub(crate) fn cut_mesh_exclusive(
    mesh: &ScanMesh,
    plane_point: Point3<f64>,
    plane_normal: Vector3<f64>,
) -> ScanMesh {
    cut_impl(mesh, plane_point, plane_normal, false)
}

fn cut_impl(
    mesh: &ScanMesh,
    plane_point: Point3<f64>,
    plane_normal: Vector3<f64>,
    include_boundary: bool,
) -> ScanMesh {
    let norm_sq = plane_normal.norm_squared();
    if norm_sq <= f64::EPSILON {
        // A zero normal defines no plane; keep everything
        return mesh.clone();
    }
    let normal = plane_normal / norm_sq.sqrt();

    let distances: Vec<f64> = mesh
        .vertices
        .iter()
        .map(|v| (v.position - plane_point).dot(&normal))
        .collect();

    let classify = |d: f64| {
        if include_boundary {
            d >= 0.0
        } else {
            d > 0.0
        }
    };

    let mut builder = CutBuilder::new(mesh, &distances);

    for face in &mesh.faces {
        let kept = [
            classify(distances[face[0] as usize]),
            classify(distances[face[1] as usize]),
            classify(distances[face[2] as usize]),
        ];

        match kept {
            [true, true, true] => builder.emit_whole(face),
            [false, false, false] => {}
            // One corner survives: rotate it to the front, keep winding
            [true, false, false] => builder.emit_corner(face[0], face[1], face[2]),
            [false, true, false] => builder.emit_corner(face[1], face[2], face[0]),
            [false, false, true] => builder.emit_corner(face[2], face[0], face[1]),
            // Two corners survive: rotate the lost one to the back
            [true, true, false] => builder.emit_quad(face[0], face[1], face[2]),
            [false, true, true] => builder.emit_quad(face[1], face[2], face[0]),
            [true, false, true] => builder.emit_quad(face[2], face[0], face[1]),
        }
    }

    builder.out
}

/// Incremental builder for the kept half of a cut.
struct CutBuilder<'a> {
    src: &'a ScanMesh,
    distances: &'a [f64],
    /// Old vertex index -> new index; `u32::MAX` means not yet emitted.
    remap: Vec<u32>,
    /// Synthesized vertex per crossing source edge (undirected key).
    edge_cache: HashMap<(u32, u32), u32>,
    out: ScanMesh,
}

impl<'a> CutBuilder<'a> {
    fn new(src: &'a ScanMesh, distances: &'a [f64]) -> Self {
        Self {
            src,
            distances,
            remap: vec![u32::MAX; src.vertices.len()],
            edge_cache: HashMap::new(),
            out: ScanMesh::with_capacity(
                src.vertices.len() / 2,
                src.faces.len() / 2,
                src.colors.is_some(),
            ),
        }
    }

    /// Append a vertex; `color` is `Some` exactly when the source mesh
    /// carries colors.
    fn push_vertex(&mut self, vertex: Vertex, color: Option<VertexColor>) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: u32 indices support ~4 billion vertices by design
        let idx = self.out.vertices.len() as u32;
        self.out.vertices.push(vertex);
        if let (Some(out), Some(color)) = (self.out.colors.as_mut(), color) {
            out.push(color);
        }
        idx
    }

    /// Emit a kept source vertex, reusing its slot on repeat visits.
    fn kept(&mut self, old: u32) -> u32 {
        let slot = self.remap[old as usize];
        if slot != u32::MAX {
            return slot;
        }
        let vertex = self.src.vertices[old as usize];
        let color = self.src.colors.as_ref().map(|c| c[old as usize]);
        let idx = self.push_vertex(vertex, color);
        self.remap[old as usize] = idx;
        idx
    }

    /// Emit the intersection vertex on the edge between a kept vertex
    /// and a discarded one, reusing it when the edge was already crossed.
    ///
    /// The interpolation always runs from the lower-indexed endpoint:
    /// `t = d_a / (d_a - d_b)` is unchanged when every distance flips
    /// sign, so the two opposing cuts of a slab synthesize bitwise
    /// identical vertices on their shared plane and exact deduplication
    /// can re-merge them after export.
    fn crossing(&mut self, from: u32, to: u32) -> u32 {
        let key = (from.min(to), from.max(to));
        if let Some(&idx) = self.edge_cache.get(&key) {
            return idx;
        }

        let (a, b) = key;
        let d_a = self.distances[a as usize];
        let d_b = self.distances[b as usize];
        // The endpoints sit on opposite sides, so the denominator is
        // nonzero; an endpoint exactly on the plane clamps to a bitwise
        // copy of the source vertex
        let t = d_a / (d_a - d_b);

        let (vertex, color) = if t <= 0.0 {
            (
                self.src.vertices[a as usize],
                self.src.colors.as_ref().map(|c| c[a as usize]),
            )
        } else if t >= 1.0 {
            (
                self.src.vertices[b as usize],
                self.src.colors.as_ref().map(|c| c[b as usize]),
            )
        } else {
            (
                self.src.vertices[a as usize].lerp(&self.src.vertices[b as usize], t),
                self.src
                    .colors
                    .as_ref()
                    .map(|c| c[a as usize].lerp(c[b as usize], t)),
            )
        };

        let idx = self.push_vertex(vertex, color);
        self.edge_cache.insert(key, idx);
        idx
    }

    /// Push a face unless it has collapsed to zero area (two of its
    /// corners at the same position, which happens when the plane grazes
    /// a source vertex).
    fn push_face(&mut self, tri: [u32; 3]) {
        let p0 = self.out.vertices[tri[0] as usize].position;
        let p1 = self.out.vertices[tri[1] as usize].position;
        let p2 = self.out.vertices[tri[2] as usize].position;
        if p0 == p1 || p1 == p2 || p0 == p2 {
            return;
        }
        self.out.faces.push(tri);
    }

    fn emit_whole(&mut self, face: &[u32; 3]) {
        let tri = [self.kept(face[0]), self.kept(face[1]), self.kept(face[2])];
        self.push_face(tri);
    }

    /// `v0` kept, `v1` and `v2` discarded (in source winding order).
    fn emit_corner(&mut self, v0: u32, v1: u32, v2: u32) {
        let a = self.kept(v0);
        let i01 = self.crossing(v0, v1);
        let i02 = self.crossing(v0, v2);
        self.push_face([a, i01, i02]);
    }

    /// `v0` and `v1` kept, `v2` discarded (in source winding order).
    fn emit_quad(&mut self, v0: u32, v1: u32, v2: u32) {
        let a = self.kept(v0);
        let b = self.kept(v1);
        let i12 = self.crossing(v1, v2);
        let i02 = self.crossing(v0, v2);
        self.push_face([a, b, i12]);
        self.push_face([a, i12, i02]);
    }
}
