use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 向量运算的定义域错误
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    /// 对零长度向量做归一化或求夹角
    #[error("零长度向量无法{0}")]
    ZeroLength(&'static str),
}

/// 三维向量，值类型，可自由复制
///
/// 坐标约定：相机空间中 +X 为前方，+Y 为左方，+Z 为上方。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    /// 相机局部前方向
    pub const X: Vector3 = Vector3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 向量长度 sqrt(x²+y²+z²)
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// 原地归一化；零长度向量返回错误且不修改自身
    pub fn normalize(&mut self) -> Result<(), MathError> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            return Err(MathError::ZeroLength("归一化"));
        }
        *self /= mag;
        Ok(())
    }

    /// 返回归一化后的副本
    pub fn normalized(mut self) -> Result<Vector3, MathError> {
        self.normalize()?;
        Ok(self)
    }

    /// 与另一向量的夹角（弧度）
    pub fn angle_with(&self, other: &Vector3) -> Result<f32, MathError> {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            return Err(MathError::ZeroLength("求夹角"));
        }
        // 浮点误差可能让余弦略微越过 [-1, 1]
        Ok((self.dot(other) / denom).clamp(-1.0, 1.0).acos())
    }

    // ===== 轴旋转 =====

    /// 绕Z轴旋转（偏航），只影响 X/Y 分量
    pub fn rotate_z(&mut self, theta_z: f32) {
        let (sin, cos) = theta_z.sin_cos();
        let orig = *self;
        self.x = orig.x * cos - orig.y * sin;
        self.y = orig.x * sin + orig.y * cos;
    }

    /// 绕Y轴旋转（俯仰），只影响 X/Z 分量
    pub fn rotate_y(&mut self, theta_y: f32) {
        let (sin, cos) = theta_y.sin_cos();
        let orig = *self;
        self.x = orig.x * cos - orig.z * sin;
        self.z = orig.x * sin + orig.z * cos;
    }

    /// 先绕Z轴再绕Y轴旋转，顺序不可交换：Y旋转使用已经过Z旋转的X分量
    pub fn rotate(&mut self, theta_z: f32, theta_y: f32) {
        self.rotate_z(theta_z);
        self.rotate_y(theta_y);
    }

    /// `rotate` 的按值版本
    pub fn rotated(mut self, theta_z: f32, theta_y: f32) -> Vector3 {
        self.rotate(theta_z, theta_y);
        self
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}, {:.6}", self.x, self.y, self.z)
    }
}

// ===== 运算符重载 =====

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, scalar: f32) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;
    fn mul(self, vec: Vector3) -> Vector3 {
        vec * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;
    fn div(self, scalar: f32) -> Vector3 {
        let inv = 1.0 / scalar;
        Vector3::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, other: Vector3) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, other: Vector3) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
    }
}

impl DivAssign<f32> for Vector3 {
    fn div_assign(&mut self, scalar: f32) {
        self.x /= scalar;
        self.y /= scalar;
        self.z /= scalar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    fn approx(a: Vector3, b: Vector3) -> bool {
        (a - b).magnitude() < EPS
    }

    #[test]
    fn normalize_yields_unit_length_same_direction() {
        for v in [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(-0.1, 2.5, 7.0),
            Vector3::new(1e-3, -1e-3, 5e-4),
        ] {
            let n = v.normalized().unwrap();
            assert!((n.magnitude() - 1.0).abs() < EPS);
            // 同向：叉积为零且点积为正
            assert!(n.cross(&v).magnitude() < 1e-4 * v.magnitude());
            assert!(n.dot(&v) > 0.0);
        }
    }

    #[test]
    fn normalize_zero_vector_is_domain_error() {
        let mut v = Vector3::ZERO;
        assert_eq!(v.normalize(), Err(MathError::ZeroLength("归一化")));
        assert_eq!(v, Vector3::ZERO);
        assert!(Vector3::ZERO.angle_with(&Vector3::X).is_err());
    }

    #[test]
    fn rotations_are_invertible() {
        let orig = Vector3::new(1.5, -2.0, 0.75);
        for theta in [0.0, 0.3, FRAC_PI_2, 2.0, -PI, 5.5] {
            let mut v = orig;
            v.rotate_z(theta);
            v.rotate_z(-theta);
            assert!(approx(v, orig));

            let mut v = orig;
            v.rotate_y(theta);
            v.rotate_y(-theta);
            assert!(approx(v, orig));
        }
    }

    #[test]
    fn rotate_applies_z_before_y() {
        // 偏航90°把 +X 转到 +Y，随后的俯仰不再影响它
        let v = Vector3::X.rotated(FRAC_PI_2, FRAC_PI_2);
        assert!(approx(v, Vector3::new(0.0, 1.0, 0.0)));

        // 反过来的顺序结果不同
        let mut w = Vector3::X;
        w.rotate_y(FRAC_PI_2);
        w.rotate_z(FRAC_PI_2);
        assert!(approx(w, Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn cross_is_orthogonal_to_operands() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 2.0);
        let c = a.cross(&b);
        assert!(c.dot(&a).abs() < 1e-4);
        assert!(c.dot(&b).abs() < 1e-4);
    }

    #[test]
    fn scalar_operators_commute() {
        let v = Vector3::new(1.0, -2.0, 4.0);
        assert_eq!(2.0 * v, v * 2.0);
        assert!(approx(v / 4.0, Vector3::new(0.25, -0.5, 1.0)));

        let mut w = v;
        w += Vector3::new(1.0, 1.0, 1.0);
        w *= 2.0;
        w -= Vector3::new(4.0, -2.0, 10.0);
        w /= 2.0;
        assert!(approx(w, Vector3::ZERO));
    }

    #[test]
    fn angle_between_axes() {
        let angle = Vector3::X.angle_with(&Vector3::new(0.0, 3.0, 0.0)).unwrap();
        assert!((angle - FRAC_PI_2).abs() < EPS);
        assert!(Vector3::X.angle_with(&Vector3::X).unwrap().abs() < 1e-3);
    }
}
