//! 三次单调曲线

use super::quad;
use super::Direction;
use crate::math::BoundingBox2;
use crate::roots::solve_quadratic;
use arrayvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub(crate) x0: f64,
    pub(crate) y0: f64,
    pub(crate) cx0: f64,
    pub(crate) cy0: f64,
    pub(crate) cx1: f64,
    pub(crate) cy1: f64,
    pub(crate) x1: f64,
    pub(crate) y1: f64,
    xmin: f64,
    xmax: f64,
    xcoeff: [f64; 4],
    ycoeff: [f64; 4],
    pub(crate) direction: Direction,
}

impl CubicCurve {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x0: f64,
        y0: f64,
        cx0: f64,
        cy0: f64,
        cx1: f64,
        cy1: f64,
        x1: f64,
        y1: f64,
        direction: Direction,
    ) -> Self {
        let cy0 = cy0.max(y0);
        let cy1 = cy1.min(y1);
        Self {
            x0,
            y0,
            cx0,
            cy0,
            cx1,
            cy1,
            x1,
            y1,
            xmin: x0.min(x1).min(cx0.min(cx1)),
            xmax: x0.max(x1).max(cx0.max(cx1)),
            xcoeff: [
                x0,
                (cx0 - x0) * 3.0,
                (cx1 - cx0 - cx0 + x0) * 3.0,
                x1 - (cx1 - cx0) * 3.0 - x0,
            ],
            ycoeff: [
                y0,
                (cy0 - y0) * 3.0,
                (cy1 - cy0 - cy0 + y0) * 3.0,
                y1 - (cy1 - cy0) * 3.0 - y0,
            ],
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

    /// 求 y(t) = y 在 [0,1] 内的第一个根
    ///
    /// 三角 / Cardano 公式给初值，牛顿迭代修正；都失败时退回二分。
    pub fn t_for_y(&self, y: f64) -> f64 {
        if y <= self.y0 {
            return 0.0;
        }
        if y >= self.y1 {
            return 1.0;
        }
        let [c0, c1, c2, c3] = self.ycoeff;
        if c3 == 0.0 {
            return quad::t_for_y_coeffs(y, c0, c1, c2);
        }
        let a = c2 / c3;
        let b = c1 / c3;
        let c = (c0 - y) / c3;
        let q = (a * a - 3.0 * b) / 9.0;
        let mut r = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 54.0;
        let r2 = r * r;
        let q3 = q * q * q;
        let a_3 = a / 3.0;
        let mut t;
        if r2 < q3 {
            let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
            let m = -2.0 * q.sqrt();
            let tau = std::f64::consts::PI * 2.0;
            t = self.refine(y, m * (theta / 3.0).cos() - a_3);
            if t < 0.0 {
                t = self.refine(y, m * ((theta + tau) / 3.0).cos() - a_3);
            }
            if t < 0.0 {
                t = self.refine(y, m * ((theta - tau) / 3.0).cos() - a_3);
            }
        } else {
            let neg = r < 0.0;
            let s = (r2 - q3).sqrt();
            if neg {
                r = -r;
            }
            let mut big_a = (r + s).cbrt();
            if !neg {
                big_a = -big_a;
            }
            let big_b = if big_a == 0.0 { 0.0 } else { q / big_a };
            t = self.refine(y, (big_a + big_b) - a_3);
        }
        if t < 0.0 {
            let (mut t0, mut t1) = (0.0, 1.0);
            loop {
                t = (t0 + t1) / 2.0;
                if t == t0 || t == t1 {
                    break;
                }
                let yt = self.y_for_t(t);
                if yt < y {
                    t0 = t;
                } else if yt > y {
                    t1 = t;
                } else {
                    break;
                }
            }
        }
        t
    }

    /// 牛顿迭代，斜率失效时切换为二分；初值明显越界返回 -1
    fn refine(&self, target: f64, mut t: f64) -> f64 {
        if !(-0.1..=1.1).contains(&t) {
            return -1.0;
        }
        let mut y = self.y_for_t(t);
        let (mut t0, mut t1) = if y < target { (t, 1.0) } else { (0.0, t) };
        let mut use_slope = true;
        while y != target {
            if use_slope {
                let slope = self.dy_for_t(t);
                if slope == 0.0 {
                    use_slope = false;
                    continue;
                }
                let t2 = t + (target - y) / slope;
                if t2 == t || t2 <= t0 || t2 >= t1 {
                    use_slope = false;
                    continue;
                }
                t = t2;
            } else {
                let t2 = (t0 + t1) / 2.0;
                if t2 == t0 || t2 == t1 {
                    break;
                }
                t = t2;
            }
            y = self.y_for_t(t);
            if y < target {
                t0 = t;
            } else if y > target {
                t1 = t;
            } else {
                break;
            }
        }
        if t > 1.0 {
            -1.0
        } else {
            t
        }
    }

    pub fn x_for_t(&self, t: f64) -> f64 {
        let [c0, c1, c2, c3] = self.xcoeff;
        ((c3 * t + c2) * t + c1) * t + c0
    }

    pub fn y_for_t(&self, t: f64) -> f64 {
        let [c0, c1, c2, c3] = self.ycoeff;
        ((c3 * t + c2) * t + c1) * t + c0
    }

    fn dy_for_t(&self, t: f64) -> f64 {
        let [_, c1, c2, c3] = self.ycoeff;
        (3.0 * c3 * t + 2.0 * c2) * t + c1
    }

    fn x_extrema(&self) -> ArrayVec<f64, 2> {
        let [_, c1, c2, c3] = self.xcoeff;
        solve_quadratic(3.0 * c3, 2.0 * c2, c1)
    }

    pub fn next_vertical(&self, t0: f64, mut t1: f64) -> f64 {
        for t in self.x_extrema() {
            if t > t0 && t < t1 {
                t1 = t;
            }
        }
        t1
    }

    pub fn enlarge(&self, r: &mut BoundingBox2) {
        r.add_xy(self.x0, self.y0);
        for t in self.x_extrema() {
            if t > 0.0 && t < 1.0 {
                r.add_xy(self.x_for_t(t), self.y_for_t(t));
            }
        }
        r.add_xy(self.x1, self.y1);
    }

    pub fn sub_curve(&self, ystart: f64, yend: f64, dir: Direction) -> CubicCurve {
        if ystart <= self.y0 && yend >= self.y1 {
            return self.with_direction(dir);
        }
        let mut t0 = self.t_for_y(ystart);
        let mut t1 = self.t_for_y(yend);
        if t0 > t1 {
            // ystart 与 yend 极近时两次求根可能反序，交换后截取极小的一段
            std::mem::swap(&mut t0, &mut t1);
        }
        let mut pts = [
            self.x0, self.y0, self.cx0, self.cy0, self.cx1, self.cy1, self.x1, self.y1,
        ];
        if t1 < 1.0 {
            pts = split(pts, t1).0;
        }
        if t0 > 0.0 {
            pts = split(pts, t0 / t1).1;
        }
        CubicCurve::new(pts[0], ystart, pts[2], pts[3], pts[4], pts[5], pts[6], yend, dir)
    }

    pub fn with_direction(&self, dir: Direction) -> CubicCurve {
        CubicCurve { direction: dir, ..*self }
    }

    pub fn scaled(&self, sx: f64, tx: f64, sy: f64, ty: f64) -> CubicCurve {
        let map = |x: f64, y: f64| (x * sx + tx, y * sy + ty);
        let (x0, y0) = map(self.x0, self.y0);
        let (cx0, cy0) = map(self.cx0, self.cy0);
        let (cx1, cy1) = map(self.cx1, self.cy1);
        let (x1, y1) = map(self.x1, self.y1);
        if sy > 0.0 {
            CubicCurve::new(x0, y0, cx0, cy0, cx1, cy1, x1, y1, self.direction)
        } else {
            CubicCurve::new(x1, y1, cx1, cy1, cx0, cy0, x0, y0, self.direction.reversed())
        }
    }
}

/// y 方向的极值参数，升序，不含 0 和 1
pub(crate) fn horizontal_params(c0: f64, cp0: f64, cp1: f64, c1: f64) -> ArrayVec<f64, 2> {
    let mut params = ArrayVec::new();
    if c0 <= cp0 && cp0 <= cp1 && cp1 <= c1 {
        return params;
    }
    let c1 = c1 - cp1;
    let cp1 = cp1 - cp0;
    let cp0 = cp0 - c0;
    for t in solve_quadratic(c1 - cp1 - cp1 + cp0, (cp1 - cp0) * 2.0, cp0) {
        if t > 0.0 && t < 1.0 {
            params.push(t);
        }
    }
    params.sort_by(f64::total_cmp);
    params
}

/// de Casteljau 分割，返回前后两半
pub(crate) fn split(pts: [f64; 8], t: f64) -> ([f64; 8], [f64; 8]) {
    let [x0, y0, cx0, cy0, cx1, cy1, x1, y1] = pts;
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    let (ax, ay) = (lerp(x0, cx0), lerp(y0, cy0));
    let (bx, by) = (lerp(cx0, cx1), lerp(cy0, cy1));
    let (cx, cy) = (lerp(cx1, x1), lerp(cy1, y1));
    let (dx, dy) = (lerp(ax, bx), lerp(ay, by));
    let (ex, ey) = (lerp(bx, cx), lerp(by, cy));
    let (mx, my) = (lerp(dx, ex), lerp(dy, ey));
    (
        [x0, y0, ax, ay, dx, dy, mx, my],
        [mx, my, ex, ey, cx, cy, x1, y1],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn s_curve() -> CubicCurve {
        CubicCurve::new(0.0, 0.0, 10.0, 3.0, -10.0, 7.0, 0.0, 10.0, Direction::Increasing)
    }

    #[test]
    fn test_t_for_y_inverts_y_for_t() {
        let c = s_curve();
        for y in [0.5, 2.0, 5.0, 7.5, 9.9] {
            let t = c.t_for_y(y);
            assert_relative_eq!(c.y_for_t(t), y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_horizontal_params_sorted() {
        let params = horizontal_params(0.0, 10.0, -10.0, 0.0);
        assert_eq!(params.len(), 2);
        assert!(params[0] < params[1]);
        assert!(horizontal_params(0.0, 1.0, 2.0, 3.0).is_empty());
    }

    #[test]
    fn test_next_vertical_stops_at_extremum() {
        let c = s_curve();
        let t = c.next_vertical(0.0, 1.0);
        assert!(t > 0.0 && t < 1.0);
        let next = c.next_vertical(t, 1.0);
        assert!(next > t);
    }

    #[test]
    fn test_sub_curve_endpoints() {
        let c = s_curve();
        let sub = c.sub_curve(3.0, 6.0, Direction::Decreasing);
        assert_eq!(sub.y0, 3.0);
        assert_eq!(sub.y1, 6.0);
        assert_relative_eq!(sub.x0, c.x_for_y(3.0), epsilon = 1e-9);
        assert_relative_eq!(sub.x1, c.x_for_y(6.0), epsilon = 1e-9);
        assert_eq!(sub.direction, Direction::Decreasing);
    }

    #[test]
    fn test_split_preserves_endpoints() {
        let pts = [0.0, 0.0, 1.0, 3.0, 2.0, 3.0, 3.0, 0.0];
        let (a, b) = split(pts, 0.25);
        assert_eq!(&a[0..2], &pts[0..2]);
        assert_eq!(&b[6..8], &pts[6..8]);
        assert_eq!(&a[6..8], &b[0..2]);
    }
}
