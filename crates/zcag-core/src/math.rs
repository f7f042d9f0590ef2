//! 基础数学类型
//!
//! - `Point2` / `Vector2`：nalgebra 二维点与向量别名
//! - `BoundingBox2`：轴对齐包围盒

use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 几何比较的默认容差
pub const EPSILON: f64 = 1e-10;

/// 二维轴对齐包围盒
///
/// `empty()` 产生一个不含任何点的包围盒（min > max），
/// 第一次 `expand_to_include` 之后才变为有效。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::new(Point2::origin(), Point2::origin())
    }
}

impl BoundingBox2 {
    /// 由任意两个角点创建（自动归一化）
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(Point2::new(x, y), Point2::new(x + w, y + h))
    }

    /// 空包围盒
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point2]) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(p);
        }
        bbox
    }

    /// 是否不含任何点
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// 宽高是否都大于零
    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.add_xy(p.x, p.y);
    }

    pub fn add_xy(&mut self, x: f64, y: f64) {
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
    }

    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// 点包含测试（左上闭、右下开）
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min.x && y >= self.min.y && x < self.max.x && y < self.max.y
    }

    /// 矩形是否完全位于包围盒内；退化矩形一律返回 false
    pub fn contains_rect(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if !self.has_area() || w <= 0.0 || h <= 0.0 {
            return false;
        }
        x >= self.min.x && y >= self.min.y && x + w <= self.max.x && y + h <= self.max.y
    }

    /// 矩形内部是否与包围盒内部相交
    pub fn intersects_rect(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if !self.has_area() || w <= 0.0 || h <= 0.0 {
            return false;
        }
        x + w > self.min.x && y + h > self.min.y && x < self.max.x && y < self.max.y
    }

    /// 闭区间相交（边界接触也算相交）
    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// 向外取整后的整数包围盒
    pub fn to_integer_bounds(&self) -> BoundingBox2 {
        if self.is_empty() {
            return BoundingBox2::default();
        }
        Self {
            min: Point2::new(self.min.x.floor(), self.min.y.floor()),
            max: Point2::new(self.max.x.ceil(), self.max.y.ceil()),
        }
    }

    /// 变换四个角点后重新求包围盒
    pub fn transformed(&self, transform: &Transform2D) -> BoundingBox2 {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            transform.transform_point(&self.min),
            transform.transform_point(&Point2::new(self.max.x, self.min.y)),
            transform.transform_point(&self.max),
            transform.transform_point(&Point2::new(self.min.x, self.max.y)),
        ];
        Self::from_points(&corners)
    }

    /// 在容差范围内比较
    pub fn approx_eq(&self, other: &BoundingBox2, tolerance: f64) -> bool {
        (self.min.x - other.min.x).abs() <= tolerance
            && (self.min.y - other.min.y).abs() <= tolerance
            && (self.max.x - other.max.x).abs() <= tolerance
            && (self.max.y - other.max.y).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bbox_from_points() {
        let bbox = BoundingBox2::from_points(&[
            Point2::new(3.0, -1.0),
            Point2::new(-2.0, 4.0),
            Point2::new(0.5, 0.5),
        ]);
        assert_relative_eq!(bbox.width(), 5.0);
        assert_relative_eq!(bbox.height(), 5.0);
        assert_relative_eq!(bbox.center().x, 0.5);
    }

    #[test]
    fn test_empty_bbox() {
        let bbox = BoundingBox2::empty();
        assert!(bbox.is_empty());
        assert!(!bbox.intersects(&BoundingBox2::from_xywh(0.0, 0.0, 1.0, 1.0)));
        let merged = bbox.union(&BoundingBox2::from_xywh(1.0, 1.0, 2.0, 2.0));
        assert_eq!(merged, BoundingBox2::from_xywh(1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn test_contains_point_half_open() {
        let bbox = BoundingBox2::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(0.0, 0.0));
        assert!(bbox.contains_point(5.0, 9.999));
        assert!(!bbox.contains_point(10.0, 5.0));
        assert!(!bbox.contains_point(5.0, 10.0));
    }

    #[test]
    fn test_rect_queries() {
        let bbox = BoundingBox2::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_rect(1.0, 1.0, 9.0, 9.0));
        assert!(!bbox.contains_rect(1.0, 1.0, 10.0, 1.0));
        assert!(bbox.intersects_rect(9.0, 9.0, 5.0, 5.0));
        assert!(!bbox.intersects_rect(10.0, 0.0, 5.0, 5.0));
        assert!(!bbox.intersects_rect(1.0, 1.0, 0.0, 5.0));
    }

    #[test]
    fn test_integer_bounds() {
        let bbox = BoundingBox2::from_xywh(0.5, -0.25, 2.0, 1.0);
        let ib = bbox.to_integer_bounds();
        assert_eq!(ib.min, Point2::new(0.0, -1.0));
        assert_eq!(ib.max, Point2::new(3.0, 1.0));
    }
}
