//! Face-derived normal recomputation.
//!
//! Plane cuts synthesize vertices with interpolated normals, which blend
//! the two endpoint directions and carry no information about the new
//! cut face. Finished blocks therefore get their normals recomputed from
//! face geometry before display.

use nalgebra::Vector3;
use scan_types::ScanMesh;

/// Recompute every vertex normal from the incident faces.
///
/// Each face contributes its unnormalized face normal (area-weighted by
/// construction) to its three vertices; the sums are normalized at the
/// end. A vertex whose incident faces are coplanar — every interior
/// vertex of a cut face — comes out with exactly that plane's normal,
/// replacing the interpolation blend. Vertices with no incident faces or
/// only degenerate ones keep their previous normal.
///
/// # Example
///
/// ```
/// use scan_segment::recompute_flat_normals;
/// use scan_types::{ScanMesh, Vertex, Point3, Vector3};
///
/// let mut mesh = ScanMesh::new();
/// // A triangle in the XY plane with stale normals
/// mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::x()));
/// mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::x()));
/// mesh.vertices.push(Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::x()));
/// mesh.faces.push([0, 1, 2]);
///
/// recompute_flat_normals(&mut mesh);
/// assert!((mesh.vertices[0].normal - Vector3::z()).norm() < 1e-12);
/// ```
pub fn recompute_flat_normals(mesh: &mut ScanMesh) {
    let mut sums = vec![Vector3::zeros(); mesh.vertices.len()];

    for face in &mesh.faces {
        let v0 = mesh.vertices[face[0] as usize].position;
        let v1 = mesh.vertices[face[1] as usize].position;
        let v2 = mesh.vertices[face[2] as usize].position;
        let face_normal = (v1 - v0).cross(&(v2 - v0));

        for &idx in face {
            sums[idx as usize] += face_normal;
        }
    }

    for (vertex, sum) in mesh.vertices.iter_mut().zip(&sums) {
        if sum.norm_squared() > f64::EPSILON {
            vertex.normal = sum.normalize();
        }
    }
}
