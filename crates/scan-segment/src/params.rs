//! Pipeline and segmentation parameters.

/// Parameters for vertex/triangle deduplication.
///
/// # Example
///
/// ```
/// use scan_segment::DedupParams;
///
/// // Exact-equality merging (the default)
/// let exact = DedupParams::default();
/// assert_eq!(exact.tolerance, 0.0);
///
/// // Proximity welding for noisy scans
/// let welding = DedupParams::welding(0.001);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupParams {
    /// Distance below which two vertices are considered the same.
    ///
    /// `0.0` merges only exactly equal positions, which preserves sharp
    /// seams and keeps cut-boundary vertices (bitwise copies of each
    /// other) mergeable without disturbing anything else. Positive values
    /// weld nearby vertices, absorbing floating-point noise from
    /// upstream processing.
    ///
    /// Default: `0.0`
    pub tolerance: f64,
}

impl DedupParams {
    /// Exact-equality deduplication.
    #[must_use]
    pub const fn exact() -> Self {
        Self { tolerance: 0.0 }
    }

    /// Proximity welding with the given distance tolerance.
    #[must_use]
    pub const fn welding(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

/// Parameters for grid segmentation.
#[derive(Debug, Clone)]
pub struct SegmentParams {
    /// Edge length of a grid cell. Must be positive and finite.
    ///
    /// Default: `0.25`
    pub block_size: f64,

    /// Run the wall isolation pre-pass before gridding.
    ///
    /// The wall cut is a heuristic: it slices everything within
    /// `wall_sensitivity` of the minimum Z into a flat-red wall segment.
    /// It only isolates a clean wall when the dominant flat surface faces
    /// -Z; it is not a general planar-surface detector.
    ///
    /// Default: `false`
    pub split_wall: bool,

    /// Z offset from the minimum Z defining the wall plane.
    ///
    /// Default: `0.05`
    pub wall_sensitivity: f64,

    /// Color blocks by averaging their captured vertex colors.
    ///
    /// When disabled, or when the mesh carries no colors, blocks get a
    /// flat gray shaded by normalized depth instead.
    ///
    /// Default: `true`
    pub interpolate_color: bool,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            block_size: 0.25,
            split_wall: false,
            wall_sensitivity: 0.05,
            interpolate_color: true,
        }
    }
}

impl SegmentParams {
    /// Set the grid cell edge length.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: f64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Enable or disable the wall isolation pre-pass.
    #[must_use]
    pub const fn with_split_wall(mut self, split_wall: bool) -> Self {
        self.split_wall = split_wall;
        self
    }

    /// Set the wall plane offset from the minimum Z.
    #[must_use]
    pub const fn with_wall_sensitivity(mut self, sensitivity: f64) -> Self {
        self.wall_sensitivity = sensitivity;
        self
    }

    /// Choose between averaged vertex colors and depth-shaded gray.
    #[must_use]
    pub const fn with_interpolate_color(mut self, interpolate: bool) -> Self {
        self.interpolate_color = interpolate;
        self
    }
}

/// Full configuration surface of the scan processing pipeline.
///
/// # Example
///
/// ```
/// use scan_segment::PipelineParams;
///
/// let params = PipelineParams::default()
///     .with_reduce_vertices(true)
///     .with_block_size(0.5);
/// assert!((params.segment.block_size - 0.5).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineParams {
    /// Run deduplication before segmentation.
    pub reduce_vertices: bool,

    /// Cut the mesh into grid blocks; when disabled the whole mesh
    /// becomes a single block.
    pub segment_grid: bool,

    /// Keep per-vertex colors through the pipeline. When disabled, any
    /// captured colors are stripped up front and no color bookkeeping is
    /// performed.
    pub capture_color: bool,

    /// Deduplication parameters.
    pub dedup: DedupParams,

    /// Grid segmentation parameters.
    pub segment: SegmentParams,
}

impl PipelineParams {
    /// The configuration used for interactive scan display: dedup,
    /// grid segmentation and color capture all on.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            reduce_vertices: true,
            segment_grid: true,
            capture_color: true,
            dedup: DedupParams::default(),
            segment: SegmentParams::default(),
        }
    }

    /// Enable or disable pre-segmentation deduplication.
    #[must_use]
    pub const fn with_reduce_vertices(mut self, reduce: bool) -> Self {
        self.reduce_vertices = reduce;
        self
    }

    /// Enable or disable grid segmentation.
    #[must_use]
    pub const fn with_segment_grid(mut self, segment: bool) -> Self {
        self.segment_grid = segment;
        self
    }

    /// Enable or disable color bookkeeping.
    #[must_use]
    pub const fn with_capture_color(mut self, capture: bool) -> Self {
        self.capture_color = capture;
        self
    }

    /// Set the grid cell edge length.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: f64) -> Self {
        self.segment.block_size = block_size;
        self
    }

    /// Enable or disable the wall isolation pre-pass.
    #[must_use]
    pub const fn with_split_wall(mut self, split_wall: bool) -> Self {
        self.segment.split_wall = split_wall;
        self
    }

    /// Set the dedup tolerance.
    #[must_use]
    pub const fn with_dedup_tolerance(mut self, tolerance: f64) -> Self {
        self.dedup.tolerance = tolerance;
        self
    }
}
