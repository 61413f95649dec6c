//! Axis-aligned bounding extents.

use crate::error::EnvelopeError;
use std::fmt;

/// An axis-aligned bounding extent in dataset coordinates.
///
/// Envelopes describe feature extents, per-tile processed areas, and the
/// extent of an entire verification run. Bounds are inclusive on both
/// axes; degenerate envelopes (zero width or height) are legal and
/// describe point or line features.
///
/// Construction validates that every ordinate is finite and that
/// `min <= max` on both axes, so every `Envelope` in circulation is
/// well-formed.
///
/// # Examples
///
/// ```
/// use cairn_core::Envelope;
///
/// let tile = Envelope::new(0.0, 0.0, 50.0, 50.0).unwrap();
/// let feature = Envelope::new(10.0, 10.0, 20.0, 20.0).unwrap();
///
/// assert!(tile.contains(&feature));
/// assert!(tile.intersects(&feature));
/// assert_eq!(feature.width(), 10.0);
///
/// // Intersection clips to the shared area.
/// let east = Envelope::new(40.0, 0.0, 60.0, 50.0).unwrap();
/// let clipped = tile.intersection(&east).unwrap();
/// assert_eq!(clipped, Envelope::new(40.0, 0.0, 50.0, 50.0).unwrap());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Envelope {
    /// Create a new envelope from its corner ordinates.
    ///
    /// Returns `Err(EnvelopeError::NonFinite)` if any ordinate is NaN or
    /// infinite, or `Err(EnvelopeError::Inverted)` if `min > max` on
    /// either axis.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, EnvelopeError> {
        for (ordinate, value) in [
            ("x_min", x_min),
            ("y_min", y_min),
            ("x_max", x_max),
            ("y_max", y_max),
        ] {
            if !value.is_finite() {
                return Err(EnvelopeError::NonFinite { ordinate, value });
            }
        }
        if x_min > x_max {
            return Err(EnvelopeError::Inverted {
                axis: "x",
                min: x_min,
                max: x_max,
            });
        }
        if y_min > y_max {
            return Err(EnvelopeError::Inverted {
                axis: "y",
                min: y_min,
                max: y_max,
            });
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Minimum x ordinate.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Minimum y ordinate.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum x ordinate.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Maximum y ordinate.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Extent along the x axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the y axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// Bounds are inclusive: an envelope contains itself, and an
    /// envelope touching the boundary from the inside is contained.
    pub fn contains(&self, other: &Envelope) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Returns `true` if `self` and `other` share any point.
    ///
    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &Envelope) -> bool {
        other.x_min <= self.x_max
            && other.x_max >= self.x_min
            && other.y_min <= self.y_max
            && other.y_max >= self.y_min
    }

    /// The shared extent of `self` and `other`, or `None` if disjoint.
    ///
    /// Touching edges produce a degenerate (zero-area) envelope rather
    /// than `None`.
    pub fn intersection(&self, other: &Envelope) -> Option<Envelope> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            x_min: self.x_min.max(other.x_min),
            y_min: self.y_min.max(other.y_min),
            x_max: self.x_max.min(other.x_max),
            y_max: self.y_max.min(other.y_max),
        })
    }

    /// The smallest envelope covering both `self` and `other`.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Grow the envelope outward by `margin` on every side.
    ///
    /// Used to turn a feature extent into a search extent (the area
    /// within which a neighbor could still be relevant).
    ///
    /// # Panics
    ///
    /// Panics if `margin` is negative or not finite. Callers validate
    /// search distances at rule construction time.
    pub fn expand_by(&self, margin: f64) -> Envelope {
        assert!(
            margin.is_finite() && margin >= 0.0,
            "expand_by margin must be finite and non-negative, got {margin}"
        );
        Self {
            x_min: self.x_min - margin,
            y_min: self.y_min - margin,
            x_max: self.x_max + margin,
            y_max: self.y_max + margin,
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}
