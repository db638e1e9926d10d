//! Error types for segmentation operations.

use thiserror::Error;

/// Result type for segmentation operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur during mesh segmentation.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Block size must be a positive, finite edge length.
    #[error("invalid block size: {0} (must be > 0)")]
    InvalidBlockSize(f64),

    /// The color sequence does not match the vertex sequence.
    ///
    /// A mesh and its colors travel together through every
    /// transformation; a length mismatch means that invariant was broken
    /// upstream and processing must not continue with misaligned colors.
    #[error("color count mismatch: {vertices} vertices but {colors} colors")]
    ColorCountMismatch {
        /// Number of vertices in the mesh.
        vertices: usize,
        /// Number of entries in the color sequence.
        colors: usize,
    },

    /// A face references a vertex index past the end of the vertex array.
    #[error("invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// The invalid index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SegmentError::InvalidBlockSize(-0.5);
        assert!(format!("{err}").contains("-0.5"));

        let err = SegmentError::ColorCountMismatch {
            vertices: 8,
            colors: 7,
        };
        assert!(format!("{err}").contains("8 vertices"));
    }
}
