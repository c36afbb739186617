//! Fitting raw room coordinates into a bounded viewport.
//!
//! One uniform scale factor is used for both axes (the smaller of the two
//! candidates), so the farm keeps its aspect ratio and never overflows the
//! margins.

use crate::graph::Point;

/// Target drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Empty border kept on every side
    pub margin: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            margin: 50,
        }
    }
}

/// A computed scale + translation from raw to viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Lower-left corner of the raw bounding box
    pub min: Point,
    pub scale: f64,
    pub margin: i64,
}

impl Fit {
    /// Map one raw point into the viewport.
    #[inline]
    pub fn apply(&self, raw: Point) -> Point {
        Point::new(
            (span(self.min.x, raw.x) * self.scale + self.margin as f64) as i64,
            (span(self.min.y, raw.y) * self.scale + self.margin as f64) as i64,
        )
    }
}

/// `hi - lo` without overflow, for any pair of `i64` coordinates.
#[inline]
fn span(lo: i64, hi: i64) -> f64 {
    (hi as i128 - lo as i128) as f64
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: u32, height: u32, margin: u32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Compute the fit for a set of raw points, or `None` if there are none.
    pub fn fit_for(&self, raw: &[Point]) -> Option<Fit> {
        let first = raw.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in raw {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        // A flat axis counts as one unit wide.
        let extent_x = span(min.x, max.x).max(1.0);
        let extent_y = span(min.y, max.y).max(1.0);
        let margin = self.margin as i64;
        let scale_x = (self.width as i64 - 2 * margin) as f64 / extent_x;
        let scale_y = (self.height as i64 - 2 * margin) as f64 / extent_y;

        Some(Fit {
            min,
            scale: scale_x.min(scale_y),
            margin,
        })
    }

    /// Map every raw point into the viewport. Empty in, empty out.
    pub fn fit(&self, raw: &[Point]) -> Vec<Point> {
        match self.fit_for(raw) {
            Some(fit) => raw.iter().map(|&p| fit.apply(p)).collect(),
            None => Vec::new(),
        }
    }
}
