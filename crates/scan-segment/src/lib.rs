//! Mesh cleanup, grid segmentation and export for 3D scans.
//!
//! This crate is the processing core of the scan pipeline. A raw scan
//! mesh (see `scan-ingest`) goes in; a set of compact, display-ready
//! blocks comes out, and the blocks can be recombined into one flat mesh
//! for export.
//!
//! # Stages
//!
//! - **Deduplication** ([`dedup_mesh`]) - merge identical vertices, drop
//!   degenerate and duplicate triangles
//! - **Plane cutting** ([`cut_mesh`]) - keep the half of a mesh on one
//!   side of an arbitrary plane, synthesizing interpolated vertices
//!   along the cut
//! - **Axis splitting** ([`split_along_axis`]) - slice a mesh into
//!   ordered slabs along a grid axis
//! - **Compaction** ([`compact_mesh`]) - drop vertices stranded by cuts
//! - **Segmentation** ([`segment_mesh`]) - the 3D grid traversal with
//!   optional wall isolation and per-block coloring
//! - **Export** ([`export_segments`]) - merge all blocks back into a
//!   single [`FlatMesh`]
//! - **Pipeline** ([`process_scan`]) - the configuration-driven
//!   end-to-end entry point
//!
//! # Example
//!
//! ```
//! use scan_segment::{export_segments, process_scan, PipelineParams};
//! use scan_types::unit_cube;
//!
//! let params = PipelineParams::interactive().with_block_size(0.5);
//! let segments = process_scan(unit_cube(), &params).unwrap();
//! assert_eq!(segments.len(), 8);
//!
//! let flat = export_segments(&segments);
//! assert!(flat.vertex_count() > 0);
//! ```
//!
//! # Invariants
//!
//! Every operation that derives a mesh derives its color sequence in the
//! same step; a mesh and its colors never diverge in length or order.
//! Misalignment on input is rejected up front
//! ([`SegmentError::ColorCountMismatch`]), never silently re-paired.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod compact;
mod cut;
mod dedup;
mod error;
mod export;
mod grid;
mod normals;
mod params;
mod pipeline;
mod segment;

pub use compact::compact_mesh;
pub use cut::cut_mesh;
pub use dedup::{dedup_mesh, DedupSummary};
pub use error::{SegmentError, SegmentResult};
pub use export::{export_segments, FlatMesh};
pub use grid::{axis_boundaries, split_along_axis, Axis};
pub use normals::recompute_flat_normals;
pub use params::{DedupParams, PipelineParams, SegmentParams};
pub use pipeline::process_scan;
pub use segment::{segment_mesh, validate_mesh, Segment};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};
