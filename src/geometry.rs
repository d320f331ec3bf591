//! Shared geometric primitives used by the selection, chrome and menu modules.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2dF {
    pub x: f32,
    pub y: f32,
}

impl Vector2dF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Integer rectangle, used for top-level window bounds in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Offset that moves screen coordinates into this rectangle's space.
    pub fn origin_offset(self) -> Vector2dF {
        Vector2dF::new(self.x as f32, self.y as f32)
    }
}

/// Float rectangle. Empty means zero (or negative) width or height; an empty
/// rectangle still has a meaningful origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: PointF, size: SizeF) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Smallest rectangle containing both points.
    pub fn bounding(a: PointF, b: PointF) -> Self {
        Self::enclosing(&[a, b])
    }

    /// Smallest rectangle containing every point. Degenerate (zero width or
    /// height) results are kept, unlike [`RectF::union`].
    pub fn enclosing(points: &[PointF]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for point in rest {
            left = left.min(point.x);
            top = top.min(point.y);
            right = right.max(point.x);
            bottom = bottom.max(point.y);
        }
        Self::new(left, top, right - left, bottom - top)
    }

    pub const fn origin(self) -> PointF {
        PointF::new(self.x, self.y)
    }

    pub const fn size(self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    pub fn right(self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(self) -> bool {
        self.size().is_empty()
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Grows `self` to cover `other`. Empty rectangles do not contribute, and
    /// an empty `self` is replaced outright.
    pub fn union(&mut self, other: RectF) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        *self = Self::new(left, top, right - left, bottom - top);
    }

    pub fn union_with(mut self, other: RectF) -> Self {
        self.union(other);
        self
    }
}

impl Add<Vector2dF> for RectF {
    type Output = RectF;

    fn add(self, offset: Vector2dF) -> RectF {
        RectF::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

impl Sub<Vector2dF> for RectF {
    type Output = RectF;

    fn sub(self, offset: Vector2dF) -> RectF {
        RectF::new(self.x - offset.x, self.y - offset.y, self.width, self.height)
    }
}
