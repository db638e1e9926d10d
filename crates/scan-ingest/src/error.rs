//! Error types for scan ingestion.

use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur when ingesting a raw sensor frame.
///
/// All of these are detected before any processing begins and are not
/// recoverable locally; a frame that fails validation is rejected whole.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Normals array length does not match the positions array.
    #[error("normal count mismatch: {positions} positions but {normals} normals")]
    NormalCountMismatch {
        /// Number of positions in the frame.
        positions: usize,
        /// Number of normals in the frame.
        normals: usize,
    },

    /// Colors array length does not match the positions array.
    #[error("color count mismatch: {positions} positions but {colors} colors")]
    ColorCountMismatch {
        /// Number of positions in the frame.
        positions: usize,
        /// Number of colors in the frame.
        colors: usize,
    },

    /// Index list length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),

    /// A triangle index points past the end of the vertex arrays.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// The offending index value.
        index: u32,
        /// Number of vertices in the frame.
        vertex_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = IngestError::NormalCountMismatch {
            positions: 10,
            normals: 9,
        };
        assert!(format!("{err}").contains("10 positions"));

        let err = IngestError::IndexCountNotTriangles(7);
        assert!(format!("{err}").contains('7'));
    }
}
