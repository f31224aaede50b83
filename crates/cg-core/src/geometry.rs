//! Plain geometry types in canvas (grid) units.
//!
//! `Position` is a point, `Vector` a displacement. Keeping them apart makes the
//! sign conventions of the interaction math explicit: a drag delta is
//! `(last - current) / zoom`, and a node moves to `position - delta`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ─── Points & vectors ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Position) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    /// True when `other` lies within `radius` of this point (inclusive).
    pub fn is_within_radius(self, other: Position, radius: f32) -> bool {
        self.distance_squared(other) <= radius * radius
    }
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Sub for Position {
    type Output = Vector;
    fn sub(self, rhs: Position) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Vector> for Position {
    type Output = Position;
    fn sub(self, rhs: Vector) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Position {
    type Output = Position;
    fn add(self, rhs: Vector) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector {
    type Output = Vector;
    fn div(self, rhs: f32) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

// ─── Sizes & rectangles ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned box. Edges are half-open for overlap tests, closed for
/// point containment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.w, size.h)
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `other` lies entirely inside this box (shared edges allowed).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// AABB overlap. Boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Translate by `offset` (used to lift container-local boxes to canvas space).
    pub fn offset_by(&self, offset: Position) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGB color. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// CSS-style triplet, e.g. `255, 0, 0`.
    pub fn to_css_triplet(self) -> String {
        format!("{}, {}, {}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_minus_vector_is_position() {
        let p = Position::new(10.0, 5.0) - Vector::new(3.0, -2.0);
        assert_eq!(p, Position::new(7.0, 7.0));
    }

    #[test]
    fn overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let touching = Rect::new(100.0, 0.0, 50.0, 50.0);
        let inside = Rect::new(90.0, 50.0, 50.0, 50.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn contains_rect_allows_shared_edges() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(0.0, 50.0, 100.0, 50.0)));
        assert!(!outer.contains_rect(&Rect::new(-1.0, 0.0, 10.0, 10.0)));
        assert!(!outer.contains_rect(&Rect::new(95.0, 95.0, 10.0, 10.0)));
    }

    #[test]
    fn radius_check_is_inclusive() {
        let a = Position::new(0.0, 0.0);
        assert!(a.is_within_radius(Position::new(3.0, 4.0), 5.0));
        assert!(!a.is_within_radius(Position::new(3.0, 4.1), 5.0));
    }

    #[test]
    fn rgb_serializes_as_array() {
        let json = serde_json::to_string(&Rgb(255, 0, 10)).unwrap();
        assert_eq!(json, "[255,0,10]");
    }
}
