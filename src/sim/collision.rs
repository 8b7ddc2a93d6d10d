//! Collision geometry
//!
//! The player is a circle; obstacles are axis-aligned rectangles shrunk by a
//! margin so near misses stay near misses.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::TRACK_Y;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Shrink on every side; never inverts
    pub fn shrink(self, margin: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        Self {
            min: (self.min + Vec2::splat(margin)).min(center),
            max: (self.max - Vec2::splat(margin)).max(center),
        }
    }

    /// Closest point inside the rectangle
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Visual rectangle of an obstacle
pub fn obstacle_rect(obstacle: &Obstacle) -> Rect {
    Rect::new(
        Vec2::new(obstacle.x, TRACK_Y - obstacle.height()),
        Vec2::new(obstacle.x + obstacle.width, TRACK_Y),
    )
}

/// Circle against rectangle; touching edges do not count
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Point within `radius` of `center`
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance(point) < radius
}

/// Player hitbox against an obstacle's collidable rectangle
pub fn player_hits_obstacle(center: Vec2, radius: f32, obstacle: &Obstacle, margin: f32) -> bool {
    circle_rect_overlap(center, radius, &obstacle_rect(obstacle).shrink(margin))
}
