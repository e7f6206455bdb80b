use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f32 {
        self.norm2().sqrt()
    }

    pub fn norm2(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).norm()
    }

    pub fn distance2(self, other: Vec2) -> f32 {
        (other - self).norm2()
    }

    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Component-wise product.
    pub fn scale_by(self, other: Vec2) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise reciprocal. Zero components stay zero.
    pub fn inv(self) -> Self {
        let inv = |value: f32| if value == 0.0 { 0.0 } else { 1.0 / value };
        Self::new(inv(self.x), inv(self.y))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle: `(x, y)` is the top-left corner, `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn end_x(&self) -> f32 {
        self.x + self.w
    }

    pub fn end_y(&self) -> f32 {
        self.y + self.h
    }

    pub fn end_pos(&self) -> Vec2 {
        Vec2::new(self.end_x(), self.end_y())
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.w = size.x;
        self.h = size.y;
    }

    pub fn shift(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.end_x() && point.y >= self.y && point.y <= self.end_y()
    }

    /// True if this rectangle lies entirely within `other`.
    pub fn inside(&self, other: &Rect) -> bool {
        other.contains(self.pos()) && other.contains(self.end_pos())
    }

    /// True on any overlap, including one rectangle containing the other.
    pub fn collides(&self, other: &Rect) -> bool {
        self.x <= other.end_x()
            && other.x <= self.end_x()
            && self.y <= other.end_y()
            && other.y <= self.end_y()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.end_x().min(other.end_x());
        let bottom = self.end_y().min(other.end_y());
        if left > right || top > bottom {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Signed size difference: positive on an axis where `self` is larger.
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        Vec2::new(self.w - other.w, self.h - other.h)
    }

    /// Component-wise scale of both position and size.
    pub fn scale_by(&self, factor: Vec2) -> Rect {
        Rect::new(
            self.x * factor.x,
            self.y * factor.y,
            self.w * factor.x,
            self.h * factor.y,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub centre: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(centre: Vec2, radius: f32) -> Self {
        Self { centre, radius }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            self.centre.x - self.radius,
            self.centre.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn collides(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.centre.distance2(other.centre) <= reach * reach
    }

    pub fn collides_rect(&self, area: &Rect) -> bool {
        self.bounding_box().collides(area)
    }

    pub fn inside(&self, area: &Rect) -> bool {
        self.bounding_box().inside(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic_is_component_wise() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);

        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(a / 2.0, Vec2::new(1.5, 2.0));
        assert_eq!(a.scale_by(b), Vec2::new(3.0, -8.0));
        assert!((a.norm() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn inverse_leaves_zero_components_at_zero() {
        assert_eq!(Vec2::new(4.0, 0.0).inv(), Vec2::new(0.25, 0.0));
    }

    #[test]
    fn rect_contains_is_edge_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(rect.contains(Vec2::new(10.0, 5.0)));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(!rect.contains(Vec2::new(10.1, 2.0)));
    }

    #[test]
    fn rect_intersection_clips_to_shared_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 0.0, 5.0, 5.0)));
        assert_eq!(a.intersection(&Rect::new(20.0, 20.0, 1.0, 1.0)), None);
    }

    #[test]
    fn rect_collides_when_nested() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 5.0, 5.0);

        assert!(outer.collides(&inner));
        assert!(inner.collides(&outer));
        assert!(inner.inside(&outer));
        assert!(!outer.inside(&inner));
    }

    #[test]
    fn overlap_is_signed_size_difference() {
        let view = Rect::new(0.0, 0.0, 200.0, 50.0);
        let bounds = Rect::new(30.0, 30.0, 100.0, 100.0);
        assert_eq!(view.overlap(&bounds), Vec2::new(100.0, -50.0));
    }

    #[test]
    fn circle_collision_uses_combined_radius() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 0.5);
        let c = Circle::new(Vec2::new(3.0, 0.0), 0.5);

        assert!(a.collides(&b));
        assert!(!a.collides(&c));
        assert!(a.inside(&Rect::new(-2.0, -2.0, 4.0, 4.0)));
        assert!(c.collides_rect(&Rect::new(3.4, -1.0, 1.0, 2.0)));
    }
}
