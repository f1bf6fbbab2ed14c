#![forbid(unsafe_code)]

//! Deterministic placement of neighbor ideas on a sphere shell.
//!
//! The focus idea sits at [`Vec3::ORIGIN`]; its neighbors are spread over a
//! sphere of fixed radius using the golden-angle spiral (Fibonacci sphere).
//! Placement is a pure function of `(index, total)`: no randomness and no
//! hidden state, so re-deriving a layout yields bit-identical coordinates.
//!
//! # Example
//!
//! ```
//! use ideaspace_layout::{SphereLayout, DEFAULT_RADIUS};
//!
//! let layout = SphereLayout::default();
//! let p = layout.position(0, 3);
//! assert!((p.length() - DEFAULT_RADIUS).abs() < 1e-9);
//! assert_eq!(p, layout.position(0, 3));
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Radius of the neighbor shell in scene units.
pub const DEFAULT_RADIUS: f64 = 2.5;

/// A point in 3D scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Where the focus node is pinned.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z).length()
    }

    /// Coordinates as an array, in `[x, y, z]` order.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Invalid placement requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("cannot place nodes among zero siblings")]
    EmptySet,

    #[error("index {index} out of range for {total} siblings")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("sphere radius must be finite and positive, got {radius}")]
    InvalidRadius { radius: f64 },
}

/// Place sibling `index` of `total` on a sphere of `radius`.
///
/// Callers guarantee `total >= 1` and `index < total`; use
/// [`SphereLayout::try_position`] when that is not known statically.
#[must_use]
pub fn sphere_position(index: usize, total: usize, radius: f64) -> Vec3 {
    debug_assert!(total > 0, "sphere_position called with total = 0");
    debug_assert!(index < total, "index {index} >= total {total}");

    let k = (index + 1) as f64;
    let n = total.max(1) as f64;
    // Polar angle walks the z axis in equal steps; clamp guards acos against
    // rounding just past -1.
    let phi = (1.0 - 2.0 * k / n).clamp(-1.0, 1.0).acos();
    // Azimuth advances by the golden angle each step.
    let theta = PI * (1.0 + 5.0_f64.sqrt()) * k;

    let sin_phi = phi.sin();
    Vec3::new(
        radius * theta.cos() * sin_phi,
        radius * theta.sin() * sin_phi,
        radius * phi.cos(),
    )
}

/// Sphere-shell layout with a fixed radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereLayout {
    radius: f64,
}

impl Default for SphereLayout {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
        }
    }
}

impl SphereLayout {
    /// Create a layout with a custom radius.
    pub fn new(radius: f64) -> Result<Self, LayoutError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(LayoutError::InvalidRadius { radius });
        }
        Ok(Self { radius })
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Position of sibling `index` among `total`.
    ///
    /// Same contract as [`sphere_position`].
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize, total: usize) -> Vec3 {
        sphere_position(index, total, self.radius)
    }

    /// Checked variant of [`position`](Self::position).
    pub fn try_position(&self, index: usize, total: usize) -> Result<Vec3, LayoutError> {
        if total == 0 {
            return Err(LayoutError::EmptySet);
        }
        if index >= total {
            return Err(LayoutError::IndexOutOfRange { index, total });
        }
        Ok(self.position(index, total))
    }

    /// Positions for every sibling of a set of `total`, in index order.
    ///
    /// Returns an empty vector for `total == 0`.
    #[must_use]
    pub fn positions(&self, total: usize) -> Vec<Vec3> {
        (0..total).map(|i| self.position(i, total)).collect()
    }
}

/// Smallest pairwise distance in `points`, or `None` with fewer than two.
#[must_use]
pub fn nearest_pair_distance(points: &[Vec3]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance(*b);
            best = Some(best.map_or(d, |cur| cur.min(d)));
        }
    }
    best
}
