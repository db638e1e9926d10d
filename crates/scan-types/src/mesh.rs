//! Indexed triangle mesh with an optional color sequence.

use crate::{Aabb, Triangle, Vertex, VertexColor};
use nalgebra::{Isometry3, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh with an optional per-vertex color sequence.
///
/// This is the value every pipeline stage consumes and produces. The
/// `colors` field replaces the external color lookup table of older
/// designs: a mesh and its colors are one value, so a cut, dedup or
/// compaction can never leave the two out of step.
///
/// # Invariants
///
/// - Every face index is `< vertices.len()`.
/// - When `colors` is `Some`, its length equals `vertices.len()` and
///   entry `i` colors vertex `i`.
///
/// Use [`ScanMesh::validate`] to check both before handing a mesh to the
/// pipeline.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from
/// outside; normals point outward by the right-hand rule.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,

    /// Per-vertex colors, present only when color capture is enabled.
    pub colors: Option<Vec<VertexColor>>,
}

impl ScanMesh {
    /// Create a new empty mesh without colors.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            colors: None,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - Expected number of vertices
    /// * `face_count` - Expected number of faces
    /// * `with_colors` - Whether a color sequence should be allocated
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize, with_colors: bool) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            colors: with_colors.then(|| Vec::with_capacity(vertex_count)),
        }
    }

    /// Create a mesh from vertices, faces and an optional color sequence.
    #[inline]
    #[must_use]
    pub const fn from_parts(
        vertices: Vec<Vertex>,
        faces: Vec<[u32; 3]>,
        colors: Option<Vec<VertexColor>>,
    ) -> Self {
        Self {
            vertices,
            faces,
            colors,
        }
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no renderable content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check if the mesh carries a color sequence.
    #[inline]
    #[must_use]
    pub const fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Check the mesh invariants.
    ///
    /// Returns `Err` with a description when a face index is out of
    /// bounds or the color sequence length does not match the vertex
    /// count. Kept as a plain message so callers can wrap it in their
    /// own error types.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first violated
    /// invariant.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vertices.len() as u32;
        for (i, face) in self.faces.iter().enumerate() {
            for &idx in face {
                if idx >= n {
                    return Err(format!(
                        "face {i} references vertex {idx} but the mesh has {n} vertices"
                    ));
                }
            }
        }
        if let Some(colors) = &self.colors {
            if colors.len() != self.vertices.len() {
                return Err(format!(
                    "color sequence has {} entries for {} vertices",
                    colors.len(),
                    self.vertices.len()
                ));
            }
        }
        Ok(())
    }

    /// Get a triangle by face index with resolved vertex positions.
    ///
    /// Returns `None` if the face index is out of bounds.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        })
    }

    /// Iterate over all triangles with resolved vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        })
    }

    /// Compute the axis-aligned bounding box of all vertices.
    ///
    /// Returns an empty AABB for a mesh without vertices. Unreferenced
    /// vertices count, which is why blocks are compacted before any
    /// bounds-derived computation.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Merge another mesh into this one.
    ///
    /// The other mesh's vertices and faces are appended with face indices
    /// offset past the existing vertices. Colors survive only when both
    /// meshes carry them; merging a color-less mesh into a colored one
    /// drops the color sequence rather than invent entries.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: u32 indices support ~4 billion vertices by design
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().copied());
        for face in &other.faces {
            self.faces.push([
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]);
        }

        self.colors = match (self.colors.take(), &other.colors) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend(theirs.iter().copied());
                Some(mine)
            }
            _ => None,
        };
    }

    /// Return a copy with a rigid placement transform applied.
    ///
    /// Positions are transformed by the full isometry, normals by its
    /// rotation only. Faces and colors are unchanged.
    #[must_use]
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::new(transform * v.position, transform.rotation * v.normal))
            .collect();
        Self {
            vertices,
            faces: self.faces.clone(),
            colors: self.colors.clone(),
        }
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1) with CCW winding and vertex
/// normals pointing away from the cube center. No colors.
///
/// # Example
///
/// ```
/// use scan_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> ScanMesh {
    let mut mesh = ScanMesh::with_capacity(8, 12, false);

    let corners = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ];
    for (x, y, z) in corners {
        let position = Point3::new(x, y, z);
        let normal = (position - Point3::new(0.5, 0.5, 0.5)).normalize();
        mesh.vertices.push(Vertex::new(position, normal));
    }

    // 2 triangles per face, CCW when viewed from outside
    let faces: [[u32; 3]; 12] = [
        [0, 2, 1], // bottom (z=0), normal -Z
        [0, 3, 2],
        [4, 5, 6], // top (z=1), normal +Z
        [4, 6, 7],
        [0, 1, 5], // front (y=0), normal -Y
        [0, 5, 4],
        [3, 7, 6], // back (y=1), normal +Y
        [3, 6, 2],
        [0, 4, 7], // left (x=0), normal -X
        [0, 7, 3],
        [1, 2, 6], // right (x=1), normal +X
        [1, 6, 5],
    ];
    for f in faces {
        mesh.faces.push(f);
    }

    mesh
}
