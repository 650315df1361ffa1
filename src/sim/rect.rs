//! Axis-aligned rectangle geometry
//!
//! Every physical entity occupies an axis-aligned rect described by a center
//! point and half extents. Coordinates are screen-style: x grows rightward,
//! y grows downward, so a rect's `top` is its smallest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle: center point plus half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Build a rect whose bottom-edge midpoint sits at `midbottom`
    pub fn from_midbottom(midbottom: Vec2, size: Vec2) -> Self {
        Self::new(midbottom - Vec2::new(0.0, size.y * 0.5), size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Midpoint of the top edge
    #[inline]
    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.center.x, self.top())
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Coarse overlap test; touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half.x && (p.y - self.center.y).abs() <= self.half.y
    }

    /// True if this rect lies inside `bounds` without touching any edge
    pub fn strictly_inside(&self, bounds: &Rect) -> bool {
        self.left() > bounds.left()
            && self.right() < bounds.right()
            && self.top() > bounds.top()
            && self.bottom() < bounds.bottom()
    }

    /// Move the rect the minimum amount needed to sit fully inside `bounds`.
    /// A rect larger than `bounds` on an axis is centered on that axis.
    pub fn clamp_to(&mut self, bounds: &Rect) {
        let min = bounds.center - bounds.half + self.half;
        let max = bounds.center + bounds.half - self.half;
        self.center.x = if min.x <= max.x {
            self.center.x.clamp(min.x, max.x)
        } else {
            bounds.center.x
        };
        self.center.y = if min.y <= max.y {
            self.center.y.clamp(min.y, max.y)
        } else {
            bounds.center.y
        };
    }
}
