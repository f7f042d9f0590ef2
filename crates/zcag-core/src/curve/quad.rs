//! 二次单调曲线

use super::Direction;
use crate::math::BoundingBox2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) cx0: f64,
    pub(crate) cy0: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
    xmin: f64,
    xmax: f64,
    xcoeff: [f64; 3],
    ycoeff: [f64; 3],
    pub(crate) direction: Direction,
}

impl QuadCurve {
    /// 控制点 y 会被夹到端点范围内，求根误差最多带来一个尾数位的越界
    pub fn new(x0: f64, y0: f64, cx0: f64, cy0: f64, x1: f64, y1: f64, direction: Direction) -> Self {
        let cy0 = if cy0 < y0 {
            y0
        } else if cy0 > y1 {
            y1
        } else {
            cy0
        };
        Self {
            x0,
            y0,
            cx0,
            cy0,
            x1,
            y1,
            xmin: x0.min(x1).min(cx0),
            xmax: x0.max(x1).max(cx0),
            xcoeff: [x0, cx0 + cx0 - x0 - x0, x0 - cx0 - cx0 + x1],
            ycoeff: [y0, cy0 + cy0 - y0 - y0, y0 - cy0 - cy0 + y1],
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
        if y <= self.y0 {
            return self.x0;
        }
        if y >= self.y1 {
            return self.x1;
        }
        self.x_for_t(self.t_for_y(y))
    }

    pub fn t_for_y(&self, y: f64) -> f64 {
        if y <= self.y0 {
            return 0.0;
        }
        if y >= self.y1 {
            return 1.0;
        }
        t_for_y_coeffs(y, self.ycoeff[0], self.ycoeff[1], self.ycoeff[2])
    }

    pub fn x_for_t(&self, t: f64) -> f64 {
        let [c0, c1, c2] = self.xcoeff;
        (c2 * t + c1) * t + c0
    }

    pub fn y_for_t(&self, t: f64) -> f64 {
        let [c0, c1, c2] = self.ycoeff;
        (c2 * t + c1) * t + c0
    }

    pub fn next_vertical(&self, t0: f64, t1: f64) -> f64 {
        let t = -self.xcoeff[1] / (2.0 * self.xcoeff[2]);
        if t > t0 && t < t1 {
            t
        } else {
            t1
        }
    }

    pub fn enlarge(&self, r: &mut BoundingBox2) {
        r.add_xy(self.x0, self.y0);
        let t = -self.xcoeff[1] / (2.0 * self.xcoeff[2]);
        if t > 0.0 && t < 1.0 {
            r.add_xy(self.x_for_t(t), self.y_for_t(t));
        }
        r.add_xy(self.x1, self.y1);
    }

    pub fn sub_curve(&self, ystart: f64, yend: f64, dir: Direction) -> QuadCurve {
        let t0 = if ystart <= self.y0 {
            if yend >= self.y1 {
                return self.with_direction(dir);
            }
            0.0
        } else {
            t_for_y_coeffs(ystart, self.ycoeff[0], self.ycoeff[1], self.ycoeff[2])
        };
        let t1 = if yend >= self.y1 {
            1.0
        } else {
            t_for_y_coeffs(yend, self.ycoeff[0], self.ycoeff[1], self.ycoeff[2])
        };
        let mut pts = [self.x0, self.y0, self.cx0, self.cy0, self.x1, self.y1];
        if t1 < 1.0 {
            pts = split(pts, t1).0;
        }
        if t0 > 0.0 {
            pts = split(pts, t0 / t1).1;
        }
        QuadCurve::new(pts[0], ystart, pts[2], pts[3], pts[4], yend, dir)
    }

    pub fn with_direction(&self, dir: Direction) -> QuadCurve {
        QuadCurve { direction: dir, ..*self }
    }

    pub fn scaled(&self, sx: f64, tx: f64, sy: f64, ty: f64) -> QuadCurve {
        let (x0, y0) = (self.x0 * sx + tx, self.y0 * sy + ty);
        let (cx, cy) = (self.cx0 * sx + tx, self.cy0 * sy + ty);
        let (x1, y1) = (self.x1 * sx + tx, self.y1 * sy + ty);
        if sy > 0.0 {
            QuadCurve::new(x0, y0, cx, cy, x1, y1, self.direction)
        } else {
            QuadCurve::new(x1, y1, cx, cy, x0, y0, self.direction.reversed())
        }
    }
}

/// 求单调二次曲线 y(t) = y 在 [0,1] 内的根
///
/// 系数计算与端点坐标之间可能差几位精度，找不到区间内的根时
/// 取更靠近的端点。
pub(crate) fn t_for_y_coeffs(y: f64, ycoeff0: f64, ycoeff1: f64, ycoeff2: f64) -> f64 {
    let c0 = ycoeff0 - y;
    if ycoeff2 == 0.0 {
        let root = -c0 / ycoeff1;
        if (0.0..=1.0).contains(&root) {
            return root;
        }
    } else {
        let mut d = ycoeff1 * ycoeff1 - 4.0 * ycoeff2 * c0;
        if d >= 0.0 {
            d = d.sqrt();
            if ycoeff1 < 0.0 {
                d = -d;
            }
            let q = (ycoeff1 + d) / -2.0;
            let root = q / ycoeff2;
            if (0.0..=1.0).contains(&root) {
                return root;
            }
            if q != 0.0 {
                let root = c0 / q;
                if (0.0..=1.0).contains(&root) {
                    return root;
                }
            }
        }
    }
    let y0 = c0;
    let y1 = c0 + ycoeff1 + ycoeff2;
    if 0.0 < (y0 + y1) / 2.0 {
        0.0
    } else {
        1.0
    }
}

/// y 方向的极值参数（不含 0 和 1）
pub(crate) fn horizontal_param(c0: f64, cp: f64, c1: f64) -> Option<f64> {
    if c0 <= cp && cp <= c1 {
        return None;
    }
    let c0 = c0 - cp;
    let c1 = c1 - cp;
    let denom = c0 + c1;
    if denom == 0.0 {
        return None;
    }
    let t = c0 / denom;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    Some(t)
}

/// de Casteljau 分割，返回前后两半
pub(crate) fn split(pts: [f64; 6], t: f64) -> ([f64; 6], [f64; 6]) {
    let [x0, y0, cx, cy, x1, y1] = pts;
    let ax = x0 + (cx - x0) * t;
    let ay = y0 + (cy - y0) * t;
    let bx = cx + (x1 - cx) * t;
    let by = cy + (y1 - cy) * t;
    let mx = ax + (bx - ax) * t;
    let my = ay + (by - ay) * t;
    ([x0, y0, ax, ay, mx, my], [mx, my, bx, by, x1, y1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_t_for_y_monotonic() {
        let q = QuadCurve::new(0.0, 0.0, 5.0, 5.0, 10.0, 10.0, Direction::Increasing);
        let t = q.t_for_y(2.5);
        assert_relative_eq!(q.y_for_t(t), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_horizontal_param() {
        assert_eq!(horizontal_param(0.0, 5.0, 10.0), None);
        let t = horizontal_param(0.0, 10.0, 0.0).unwrap();
        assert_relative_eq!(t, 0.5);
    }

    #[test]
    fn test_split_midpoint() {
        let (a, b) = split([0.0, 0.0, 5.0, 10.0, 10.0, 0.0], 0.5);
        assert_relative_eq!(a[4], 5.0);
        assert_relative_eq!(a[5], 5.0);
        assert_eq!(&a[4..6], &b[0..2]);
    }

    #[test]
    fn test_sub_curve_endpoints() {
        let q = QuadCurve::new(0.0, 0.0, 10.0, 5.0, 0.0, 10.0, Direction::Increasing);
        let sub = q.sub_curve(2.0, 8.0, Direction::Increasing);
        assert_eq!(sub.y0, 2.0);
        assert_eq!(sub.y1, 8.0);
        assert_relative_eq!(sub.x0, q.x_for_y(2.0), epsilon = 1e-9);
        assert_relative_eq!(sub.x1, q.x_for_y(8.0), epsilon = 1e-9);
    }

    #[test]
    fn test_enlarge_includes_extremum() {
        let q = QuadCurve::new(0.0, 0.0, 10.0, 5.0, 0.0, 10.0, Direction::Increasing);
        let mut r = BoundingBox2::from_xywh(0.0, 0.0, 0.0, 0.0);
        q.enlarge(&mut r);
        assert_relative_eq!(r.max.x, 5.0);
    }
}
