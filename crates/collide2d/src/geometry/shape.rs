//! Bounding shape abstractions
//!
//! Actors expose one [`BoundingShape`]; the broad phase works on its
//! axis-aligned bounding rectangle and the narrow phase uses the precise
//! pairwise tests below (rect-rect, circle-circle, rect-circle).

use super::rect::Rect;
use crate::foundation::math::Vec2;

/// A bounding circle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// The center position of the circle in world space
    pub center: Vec2,
    /// The radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this circle intersects with another
    pub fn intersects(&self, other: &Circle) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Check if this circle intersects a rectangle
    ///
    /// Clamps the circle center to the rectangle to find the closest point,
    /// then compares its distance against the radius.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = Vec2::new(
            self.center.x.clamp(rect.min.x, rect.max.x),
            self.center.y.clamp(rect.min.y, rect.max.y),
        );
        (closest - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Check if this circle contains a point
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Get the axis-aligned bounding rectangle of this circle
    pub fn bounding_rect(&self) -> Rect {
        let extents = Vec2::new(self.radius, self.radius);
        Rect::from_center_extents(self.center, extents)
    }
}

/// Bounding shape exposed by a collision actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingShape {
    /// An axis-aligned rectangular shape
    Rect(Rect),
    /// A circular shape
    Circle(Circle),
}

impl BoundingShape {
    /// Get the axis-aligned bounding rectangle of this shape
    ///
    /// For rectangles this is the shape itself; for circles it is the
    /// tightest enclosing rectangle.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Circle(circle) => circle.bounding_rect(),
        }
    }

    /// Get the center of this shape
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Rect(rect) => rect.center(),
            Self::Circle(circle) => circle.center,
        }
    }

    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &BoundingShape) -> bool {
        match (self, other) {
            (Self::Rect(a), Self::Rect(b)) => a.intersects(b),
            (Self::Circle(a), Self::Circle(b)) => a.intersects(b),
            (Self::Rect(rect), Self::Circle(circle))
            | (Self::Circle(circle), Self::Rect(rect)) => circle.intersects_rect(rect),
        }
    }
}
