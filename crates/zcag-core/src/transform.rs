//! 二维仿射变换
//!
//! 六参数仿射矩阵（缩放 / 旋转 / 错切 / 平移），底层使用 nalgebra `Matrix3`：
//!
//! ```text
//! | m00 m01 m02 |
//! | m10 m11 m12 |
//! |  0   0   1  |
//! ```

use crate::math::Point2;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// 按列顺序 (m00, m10, m01, m11, m02, m12) 构造
    pub fn new(m00: f64, m10: f64, m01: f64, m11: f64, m02: f64, m12: f64) -> Self {
        Self {
            matrix: Matrix3::new(m00, m01, m02, m10, m11, m12, 0.0, 0.0, 1.0),
        }
    }

    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// 逆时针旋转（弧度）
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn shear(shx: f64, shy: f64) -> Self {
        Self::new(1.0, shy, shx, 1.0, 0.0, 0.0)
    }

    /// 先应用 `self`，再应用 `next`
    pub fn then(&self, next: &Transform2D) -> Transform2D {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    pub fn inverse(&self) -> Option<Transform2D> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    pub fn scale_x(&self) -> f64 {
        self.matrix[(0, 0)]
    }

    pub fn shear_y(&self) -> f64 {
        self.matrix[(1, 0)]
    }

    pub fn shear_x(&self) -> f64 {
        self.matrix[(0, 1)]
    }

    pub fn scale_y(&self) -> f64 {
        self.matrix[(1, 1)]
    }

    pub fn translate_x(&self) -> f64 {
        self.matrix[(0, 2)]
    }

    pub fn translate_y(&self) -> f64 {
        self.matrix[(1, 2)]
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// 是否包含错切或旋转分量
    pub fn has_shear(&self) -> bool {
        self.shear_x() != 0.0 || self.shear_y() != 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.scale_x() * x + self.shear_x() * y + self.translate_x(),
            self.shear_y() * x + self.scale_y() * y + self.translate_y(),
        )
    }

    pub fn transform_point(&self, p: &Point2) -> Point2 {
        let (x, y) = self.apply(p.x, p.y);
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let t = Transform2D::identity();
        assert!(t.is_identity());
        assert!(!t.has_shear());
        assert_eq!(t.apply(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_translation_then_scale() {
        let t = Transform2D::translation(1.0, 2.0).then(&Transform2D::scaling(2.0, 3.0));
        let (x, y) = t.apply(1.0, 1.0);
        assert_relative_eq!(x, 4.0);
        assert_relative_eq!(y, 9.0);
    }

    #[test]
    fn test_rotation() {
        let t = Transform2D::rotation(std::f64::consts::FRAC_PI_2);
        let p = t.transform_point(&Point2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert!(t.has_shear());
    }

    #[test]
    fn test_inverse() {
        let t = Transform2D::new(2.0, 0.5, -1.0, 3.0, 4.0, -2.0);
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply(7.0, -3.0);
        let (bx, by) = inv.apply(x, y);
        assert_relative_eq!(bx, 7.0, epsilon = 1e-9);
        assert_relative_eq!(by, -3.0, epsilon = 1e-9);
        assert!(Transform2D::scaling(0.0, 1.0).inverse().is_none());
    }
}
