//! Math utilities and types
//!
//! Provides fundamental math types for 2D collision detection.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;
