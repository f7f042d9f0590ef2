//! 一阶单调曲线（直线）

use super::Direction;
use crate::crossings::Crossings;
use crate::math::BoundingBox2;
use std::cmp::Ordering;

/// 上端点在前存储的直线，`direction` 记录原始路径走向
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCurve {
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
    xmin: f64,
    xmax: f64,
    pub(crate) direction: Direction,
}

impl LineCurve {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, direction: Direction) -> Self {
        let (xmin, xmax) = if x0 < x1 { (x0, x1) } else { (x1, x0) };
        Self {
            x0,
            y0,
            x1,
            y1,
            xmin,
            xmax,
            direction,
        }
    }

    pub fn x_min(&self) -> f64 {
        self.xmin
    }

    pub fn x_max(&self) -> f64 {
        self.xmax
    }

    pub fn x_for_y(&self, y: f64) -> f64 {
        if self.x0 == self.x1 || y <= self.y0 {
            return self.x0;
        }
        if y >= self.y1 {
            return self.x1;
        }
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }

    pub fn t_for_y(&self, y: f64) -> f64 {
        if y <= self.y0 {
            return 0.0;
        }
        if y >= self.y1 {
            return 1.0;
        }
        (y - self.y0) / (self.y1 - self.y0)
    }

    pub fn x_for_t(&self, t: f64) -> f64 {
        self.x0 + t * (self.x1 - self.x0)
    }

    pub fn y_for_t(&self, t: f64) -> f64 {
        self.y0 + t * (self.y1 - self.y0)
    }

    /// 直线只需判断两端在矩形内外的位置
    pub fn accumulate_crossings(&self, c: &mut Crossings) -> bool {
        let (xlo, ylo, xhi, yhi) = (c.xlo(), c.ylo(), c.xhi(), c.yhi());
        if self.xmin >= xhi {
            return false;
        }
        let (xstart, ystart) = if self.y0 < ylo {
            if self.y1 <= ylo {
                return false;
            }
            (self.x_for_y(ylo), ylo)
        } else {
            if self.y0 >= yhi {
                return false;
            }
            (self.x0, self.y0)
        };
        let (xend, yend) = if self.y1 > yhi {
            (self.x_for_y(yhi), yhi)
        } else {
            (self.x1, self.y1)
        };
        if xstart >= xhi && xend >= xhi {
            return false;
        }
        if xstart > xlo || xend > xlo {
            return true;
        }
        c.record(ystart, yend, self.direction);
        false
    }

    pub fn enlarge(&self, r: &mut BoundingBox2) {
        r.add_xy(self.x0, self.y0);
        r.add_xy(self.x1, self.y1);
    }

    pub fn sub_curve(&self, ystart: f64, yend: f64, dir: Direction) -> LineCurve {
        if ystart == self.y0 && yend == self.y1 {
            return self.with_direction(dir);
        }
        if self.x0 == self.x1 {
            return LineCurve::new(self.x0, ystart, self.x1, yend, dir);
        }
        let num = self.x0 - self.x1;
        let denom = self.y0 - self.y1;
        let xstart = self.x0 + (ystart - self.y0) * num / denom;
        let xend = self.x0 + (yend - self.y0) * num / denom;
        LineCurve::new(xstart, ystart, xend, yend, dir)
    }

    pub fn with_direction(&self, dir: Direction) -> LineCurve {
        LineCurve { direction: dir, ..*self }
    }

    /// 两条直线的解析比较：求交点 y，交点落在区间内时收缩 `yrange[1]`
    pub fn compare_lines(&self, other: &LineCurve, yrange: &mut [f64; 2]) -> Ordering {
        yrange[1] = yrange[1].min(self.y1).min(other.y1);
        if self.xmax <= other.xmin {
            return if self.xmin == other.xmax {
                Ordering::Equal
            } else {
                Ordering::Less
            };
        }
        if self.xmin >= other.xmax {
            return Ordering::Greater;
        }
        let dxa = self.x1 - self.x0;
        let dya = self.y1 - self.y0;
        let dxb = other.x1 - other.x0;
        let dyb = other.y1 - other.y0;
        let denom = dxb * dya - dxa * dyb;
        let y = if denom != 0.0 {
            let num = (self.x0 - other.x0) * dya * dyb - self.y0 * dxa * dyb + other.y0 * dxb * dya;
            let y = num / denom;
            if y <= yrange[0] {
                // 交点在区间上方，取共同的最低点比较
                self.y1.min(other.y1)
            } else {
                if y < yrange[1] {
                    yrange[1] = y;
                }
                self.y0.max(other.y0)
            }
        } else {
            // 平行线取任意共同 y，端点最快
            self.y0.max(other.y0)
        };
        super::order_of(self.x_for_y(y), other.x_for_y(y))
    }

    /// 仅缩放 + 平移下的变换；y 翻转时交换上下端点
    pub fn scaled(&self, sx: f64, tx: f64, sy: f64, ty: f64) -> LineCurve {
        let (x0, y0) = (self.x0 * sx + tx, self.y0 * sy + ty);
        let (x1, y1) = (self.x1 * sx + tx, self.y1 * sy + ty);
        if sy > 0.0 {
            LineCurve::new(x0, y0, x1, y1, self.direction)
        } else {
            LineCurve::new(x1, y1, x0, y0, self.direction.reversed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_x_for_y_clamps() {
        let line = LineCurve::new(0.0, 0.0, 10.0, 10.0, Direction::Increasing);
        assert_relative_eq!(line.x_for_y(5.0), 5.0);
        assert_eq!(line.x_for_y(-1.0), 0.0);
        assert_eq!(line.x_for_y(11.0), 10.0);
    }

    #[test]
    fn test_sub_curve_interpolates() {
        let line = LineCurve::new(0.0, 0.0, 4.0, 8.0, Direction::Increasing);
        let sub = line.sub_curve(2.0, 6.0, Direction::Decreasing);
        assert_relative_eq!(sub.x0, 1.0);
        assert_relative_eq!(sub.x1, 3.0);
        assert_eq!(sub.direction, Direction::Decreasing);
    }

    #[test]
    fn test_compare_crossing_lines_shrinks_range() {
        let a = LineCurve::new(0.0, 0.0, 10.0, 10.0, Direction::Increasing);
        let b = LineCurve::new(10.0, 0.0, 0.0, 10.0, Direction::Increasing);
        let mut yrange = [0.0, 10.0];
        assert_eq!(a.compare_lines(&b, &mut yrange), Ordering::Less);
        assert_relative_eq!(yrange[1], 5.0);
    }

    #[test]
    fn test_scaled_flip_reverses_direction() {
        let line = LineCurve::new(0.0, 0.0, 2.0, 4.0, Direction::Increasing);
        let flipped = line.scaled(1.0, 0.0, -1.0, 0.0);
        assert_eq!(flipped.y0, -4.0);
        assert_eq!(flipped.x0, 2.0);
        assert_eq!(flipped.direction, Direction::Decreasing);
    }
}
