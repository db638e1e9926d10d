//! Vertex and color types.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB color with 8-bit components.
///
/// Scanners deliver colors as a single packed integer (`0xRRGGBB`, red in
/// the most significant byte). Modeling the channels as a distinct type
/// keeps all channel arithmetic explicit: averaging and interpolation
/// operate per channel, never on the packed representation.
///
/// # Example
///
/// ```
/// use scan_types::VertexColor;
///
/// let c = VertexColor::from_packed(0xFF8000);
/// assert_eq!(c.r, 255);
/// assert_eq!(c.g, 128);
/// assert_eq!(c.b, 0);
/// assert_eq!(c.to_packed(), 0xFF8000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexColor {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
}

impl VertexColor {
    /// Create a new color from RGB components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer into channels.
    ///
    /// Bits above the low 24 are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_types::VertexColor;
    ///
    /// let red = VertexColor::from_packed(0xFF0000);
    /// assert_eq!(red, VertexColor::RED);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is the point: each channel is masked to 8 bits first
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Pack the channels into a `0xRRGGBB` integer.
    #[inline]
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Interpolate linearly toward `other` by `t` in `[0, 1]`.
    ///
    /// Each channel is interpolated independently and truncated toward
    /// zero, the same weighting used for positions and normals when a
    /// plane cut synthesizes a vertex.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Channels stay within [0, 255] for t in [0, 1]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }

    /// Average a sequence of colors channel by channel.
    ///
    /// Each channel is summed and divided independently, truncating
    /// toward zero. Returns `None` for an empty sequence.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_types::VertexColor;
    ///
    /// let avg = VertexColor::average([
    ///     VertexColor::from_packed(0xFF0000),
    ///     VertexColor::from_packed(0x00FF00),
    /// ]);
    /// assert_eq!(avg.map(VertexColor::to_packed), Some(0x7F7F00));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Per-channel averages never exceed 255
    pub fn average(colors: impl IntoIterator<Item = Self>) -> Option<Self> {
        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        let mut count = 0u64;
        for c in colors {
            r += u64::from(c.r);
            g += u64::from(c.g);
            b += u64::from(c.b);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            r: (r / count) as u8,
            g: (g / count) as u8,
            b: (b / count) as u8,
        })
    }

    /// Black color (0, 0, 0).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White color (255, 255, 255).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Red color (255, 0, 0). Used as the wall material.
    pub const RED: Self = Self::new(255, 0, 0);
}

impl Default for VertexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A scanned surface point.
///
/// Every vertex carries a position and a normal: the scanner supplies
/// both, plane cuts interpolate both, and segmentation finishing
/// recomputes normals from face geometry. Colors are kept in a parallel
/// sequence on [`crate::ScanMesh`] because color capture is optional per
/// pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Surface normal. Not required to be unit length until the owning
    /// mesh has been through normal recomputation.
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Create a vertex from position and normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Create a vertex from raw coordinates with a zero normal.
    ///
    /// Useful in tests and for geometry whose normals will be recomputed
    /// from faces.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z), Vector3::zeros())
    }

    /// Interpolate linearly toward `other` by `t` in `[0, 1]`.
    ///
    /// The normal is re-normalized when the blend has usable length;
    /// opposing normals that cancel out fall back to this vertex's
    /// normal.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let position = self.position + (other.position - self.position) * t;
        let blended = self.normal + (other.normal - self.normal) * t;
        let normal = if blended.norm_squared() > f64::EPSILON {
            blended.normalize()
        } else {
            self.normal
        };
        Self { position, normal }
    }
}
