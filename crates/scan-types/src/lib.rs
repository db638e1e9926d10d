//! Core mesh types for the scan segmentation pipeline.
//!
//! This crate provides the foundational types shared by every stage of
//! the pipeline:
//!
//! - [`Vertex`] - A scanned surface point with position and normal
//! - [`VertexColor`] - A 24-bit RGB color with packed-integer conversions
//! - [`ScanMesh`] - A triangle mesh with an optional per-vertex color
//!   sequence that travels with it through every transformation
//! - [`Triangle`] - A concrete triangle with resolved vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up. Raw sensor frames
//! arrive in the source sensor's convention and are sign-flipped on
//! ingestion by `scan-ingest`; everything in this crate is already in
//! display coordinates.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Colors
//!
//! Color capture is optional per pipeline run. A [`ScanMesh`] either
//! carries one [`VertexColor`] per vertex or none at all; the two arrays
//! are never allowed to diverge in length or order.
//!
//! # Example
//!
//! ```
//! use scan_types::{ScanMesh, Vertex, Point3, Vector3};
//!
//! let mut mesh = ScanMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0), Vector3::z()));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{unit_cube, ScanMesh};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};
