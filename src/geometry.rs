//! Geometric primitives in page space.
//!
//! Origin is the bottom-left corner of the page, units are points
//! (1/72 inch). Nothing in the pipeline flips or rescales this space.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the bottom-left corner
    pub x: f32,
    /// Y coordinate of the bottom-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_paper::geometry::Rect;
    ///
    /// let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
    /// assert_eq!(rect.right(), 110.0);
    /// assert_eq!(rect.top(), 70.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Corner coordinates `(x0, y0, x1, y1)`.
    pub fn corners(&self) -> (f32, f32, f32, f32) {
        (self.left(), self.bottom(), self.right(), self.top())
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.bottom().min(other.bottom());
        let x1 = self.right().max(other.right());
        let y1 = self.top().max(other.top());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether this rectangle lies entirely inside `bounds`.
    pub fn is_within(&self, bounds: &Rect) -> bool {
        self.left() >= bounds.left()
            && self.bottom() >= bounds.bottom()
            && self.right() <= bounds.right()
            && self.top() <= bounds.top()
    }
}
