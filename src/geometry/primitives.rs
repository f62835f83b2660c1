use crate::geometry::vector::{MathError, Vector3};
use crate::geometry::vertex::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// 8位RGB颜色，通道天然位于 [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 单色灰度
    pub const fn mono(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// 由面索引生成确定性的伪随机颜色（相同索引得到相同颜色）
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(rng.random(), rng.random(), rng.random())
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// 线段图元
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
    pub color: Color,
}

impl Line {
    /// 默认白色线段
    pub fn new(p1: Point, p2: Point) -> Self {
        Self::with_color(p1, p2, Color::WHITE)
    }

    pub fn with_color(p1: Point, p2: Point, color: Color) -> Self {
        Self { p1, p2, color }
    }

    pub fn from_vectors(p1: Vector3, p2: Vector3) -> Self {
        Self::new(p1.into(), p2.into())
    }
}

/// 三角形图元
///
/// 面法线在构造时由 (p2-p1) × (p3-p1) 计算并归一化一次；
/// 三点共线的退化三角形无法构造。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub normal: Vector3,
    pub color: Color,
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point, color: Color) -> Result<Self, MathError> {
        let a = p1.world_position;
        let normal = (p2.world_position - a)
            .cross(&(p3.world_position - a))
            .normalized()?;
        Ok(Self {
            p1,
            p2,
            p3,
            normal,
            color,
        })
    }

    /// 使用由 `face_index` 决定的伪随机面颜色
    pub fn with_face_color(
        p1: Point,
        p2: Point,
        p3: Point,
        face_index: u64,
    ) -> Result<Self, MathError> {
        Self::new(p1, p2, p3, Color::from_seed(face_index))
    }

    pub fn from_vectors(
        p1: Vector3,
        p2: Vector3,
        p3: Vector3,
        color: Color,
    ) -> Result<Self, MathError> {
        Self::new(p1.into(), p2.into(), p3.into(), color)
    }

    pub fn points(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_unit_and_right_handed() {
        let tri = Triangle::from_vectors(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
            Color::WHITE,
        )
        .unwrap();
        assert!((tri.normal - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn collinear_triangle_is_rejected() {
        let result = Triangle::from_vectors(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(2.0, 2.0, 2.0),
            Color::WHITE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn face_colors_are_deterministic() {
        assert_eq!(Color::from_seed(7), Color::from_seed(7));
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(0.0, 1.0, 0.0);
        let c = Point::new(0.0, 0.0, 1.0);
        let t1 = Triangle::with_face_color(a, b, c, 3).unwrap();
        let t2 = Triangle::with_face_color(a, b, c, 3).unwrap();
        assert_eq!(t1.color, t2.color);
    }

    #[test]
    fn lines_default_to_white() {
        let line = Line::from_vectors(Vector3::ZERO, Vector3::X);
        assert_eq!(line.color, Color::WHITE);
    }
}
