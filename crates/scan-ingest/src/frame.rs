//! Raw sensor frame and its conversion into a mesh.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use scan_types::{ScanMesh, Vertex, VertexColor};

use crate::error::{IngestError, IngestResult};

/// A raw triangulated mesh as produced by the sensor/fusion pipeline.
///
/// All sequences are parallel: entry `i` of `positions`, `normals` and
/// (when present) `colors` describe the same vertex. `indices` holds
/// triangles as consecutive triples. Colors are packed `0xRRGGBB`
/// integers; the array is absent when color capture was disabled on the
/// device.
///
/// Coordinates are in the source sensor's frame; [`ScanFrame::into_mesh`]
/// converts them to display coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanFrame {
    /// Vertex positions `[x, y, z]` in the sensor frame.
    pub positions: Vec<[f64; 3]>,

    /// Vertex normals `[x, y, z]` in the sensor frame.
    pub normals: Vec<[f64; 3]>,

    /// Packed `0xRRGGBB` vertex colors, if color capture was enabled.
    pub colors: Option<Vec<u32>>,

    /// Triangle indices, three consecutive entries per triangle.
    pub indices: Vec<u32>,
}

impl ScanFrame {
    /// Check that the parallel sequences are consistent.
    ///
    /// Rejects, before any processing: a normals or colors array whose
    /// length differs from the positions array, an index list that is not
    /// whole triangles, and any index past the vertex count.
    ///
    /// # Errors
    ///
    /// Returns the first [`IngestError`] encountered.
    pub fn validate(&self) -> IngestResult<()> {
        let vertex_count = self.positions.len();

        if self.normals.len() != vertex_count {
            return Err(IngestError::NormalCountMismatch {
                positions: vertex_count,
                normals: self.normals.len(),
            });
        }

        if let Some(colors) = &self.colors {
            if colors.len() != vertex_count {
                return Err(IngestError::ColorCountMismatch {
                    positions: vertex_count,
                    colors: colors.len(),
                });
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(IngestError::IndexCountNotTriangles(self.indices.len()));
        }

        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(IngestError::IndexOutOfBounds {
                index,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Consume the frame into a [`ScanMesh`] in display coordinates.
    ///
    /// Validates first, then negates the Y and Z components of every
    /// position and normal (the sensor convention differs from the
    /// rendering convention on those two axes) and unpacks colors when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestError`] when [`ScanFrame::validate`] fails.
    pub fn into_mesh(self) -> IngestResult<ScanMesh> {
        self.validate()?;

        let vertices = self
            .positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| {
                Vertex::new(
                    Point3::new(p[0], -p[1], -p[2]),
                    Vector3::new(n[0], -n[1], -n[2]),
                )
            })
            .collect();

        let faces = self
            .indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let colors = self
            .colors
            .map(|packed| packed.into_iter().map(VertexColor::from_packed).collect());

        Ok(ScanMesh {
            vertices,
            faces,
            colors,
        })
    }
}
