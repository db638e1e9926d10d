//! Sensor-boundary ingestion for the scan segmentation pipeline.
//!
//! The sensor/fusion collaborator hands over a raw triangulated mesh as
//! parallel flat sequences: vertex positions, vertex normals, optional
//! packed per-vertex colors, and a triangle index list. This crate owns
//! that boundary:
//!
//! - [`ScanFrame`] - the raw parallel arrays, serde-serializable
//! - validation of the arrays before any processing begins
//! - conversion into a [`scan_types::ScanMesh`], including the mandatory
//!   Y/Z sign flip from the sensor convention into display coordinates
//!
//! # Coordinate Convention
//!
//! Sensor frames arrive with Y and Z axes opposite to the rendering
//! convention. [`ScanFrame::into_mesh`] negates the Y and Z components of
//! every position and normal; this is a required transform, not an
//! option.
//!
//! # Example
//!
//! ```
//! use scan_ingest::ScanFrame;
//!
//! let frame = ScanFrame {
//!     positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     normals: vec![[0.0, 0.0, 1.0]; 3],
//!     colors: Some(vec![0xFF0000, 0x00FF00, 0x0000FF]),
//!     indices: vec![0, 1, 2],
//! };
//!
//! let mesh = frame.into_mesh().unwrap();
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.face_count(), 1);
//! // Sensor +Y becomes display -Y
//! assert!((mesh.vertices[2].position.y - (-1.0)).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod frame;

pub use error::{IngestError, IngestResult};
pub use frame::ScanFrame;
